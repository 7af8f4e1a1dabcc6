//! FSK modulation parameters and the register arithmetic behind them.

use embedded_hal::digital::v2::OutputPin;
use embedded_hal_async::{digital::Wait, spi::SpiBus};

use super::registers::*;
use super::{Rfm9x, Rfm9xError};

/// Gaussian shaping filter selection (RegPaRamp 6:5, FSK mode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum PulseShape {
    Off = 0,
    Bt1p0 = 1,
    Bt0p5 = 2,
    Bt0p3 = 3,
}

impl PulseShape {
    /// Map a BT product expressed in tenths (10 -> BT 1.0, 5 -> BT 0.5, 3 -> BT 0.3).
    /// Anything else lands on the nearest supported filter, 0 disables shaping.
    pub fn from_bt_tenths(value: u32) -> PulseShape {
        match value {
            0 => PulseShape::Off,
            1..=3 => PulseShape::Bt0p3,
            4..=7 => PulseShape::Bt0p5,
            _ => PulseShape::Bt1p0,
        }
    }

    /// BT product in tenths (0 when shaping is off)
    pub fn bt_tenths(self) -> u8 {
        match self {
            PulseShape::Off => 0,
            PulseShape::Bt1p0 => 10,
            PulseShape::Bt0p5 => 5,
            PulseShape::Bt0p3 => 3,
        }
    }
}

impl From<u8> for PulseShape {
    fn from(bits: u8) -> Self {
        match bits & 3 {
            0 => PulseShape::Off,
            1 => PulseShape::Bt1p0,
            2 => PulseShape::Bt0p5,
            _ => PulseShape::Bt0p3,
        }
    }
}

/// Temperature change threshold triggering a new image calibration (RegImageCal 2:1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum TempThreshold {
    Deg5 = 0,
    Deg10 = 1,
    Deg15 = 2,
    Deg20 = 3,
}

impl TempThreshold {
    /// Map a threshold in degrees Celsius on the register steps (5/10/15/20)
    pub fn from_degrees(value: u32) -> TempThreshold {
        match value {
            0..=5 => TempThreshold::Deg5,
            6..=10 => TempThreshold::Deg10,
            11..=15 => TempThreshold::Deg15,
            _ => TempThreshold::Deg20,
        }
    }

    pub fn degrees(self) -> u8 {
        match self {
            TempThreshold::Deg5 => 5,
            TempThreshold::Deg10 => 10,
            TempThreshold::Deg15 => 15,
            TempThreshold::Deg20 => 20,
        }
    }
}

impl From<u8> for TempThreshold {
    fn from(bits: u8) -> Self {
        match bits & 3 {
            0 => TempThreshold::Deg5,
            1 => TempThreshold::Deg10,
            2 => TempThreshold::Deg15,
            _ => TempThreshold::Deg20,
        }
    }
}

/// Bitrate register value: BitRate(15,0) = FXOSC / bitrate, rounded
pub fn bitrate_reg(bps: u32) -> u16 {
    let bps = bps.clamp(1_200, 300_000);
    ((FXOSC + bps / 2) / bps) as u16
}

/// Effective bitrate for a register value
pub fn bitrate_from_reg(reg: u16) -> u32 {
    if reg == 0 {
        return 0;
    }
    FXOSC / reg as u32
}

/// Frequency deviation register value: Fdev(13,0) in Fstep units (FXOSC / 2^19)
pub fn fdev_reg(hz: u32) -> u16 {
    (((hz as u64) << 19) / FXOSC as u64) as u16 & 0x3FFF
}

/// Carrier frequency register value: Frf(23,0) in Fstep units
pub fn frf_reg(hz: u32) -> u32 {
    (((hz as u64) << 19) / FXOSC as u64) as u32
}

impl<O, SPI, IRQ> Rfm9x<O, SPI, IRQ>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    IRQ: Wait,
{
    /// Set the raw bitrate (bit/s). Supported range 1.2k-300k for FSK
    pub async fn set_bitrate(&mut self, bps: u32) -> Result<(), Rfm9xError> {
        let reg = bitrate_reg(bps);
        self.wr_reg(REG_BITRATE_MSB, (reg >> 8) as u8).await?;
        self.wr_reg(REG_BITRATE_LSB, (reg & 0xFF) as u8).await
    }

    /// Currently configured bitrate (bit/s)
    pub async fn bitrate(&mut self) -> Result<u32, Rfm9xError> {
        let msb = self.rd_reg(REG_BITRATE_MSB).await?;
        let lsb = self.rd_reg(REG_BITRATE_LSB).await?;
        Ok(bitrate_from_reg(((msb as u16) << 8) | lsb as u16))
    }

    /// Set the frequency deviation (Hz)
    pub async fn set_fdev(&mut self, hz: u32) -> Result<(), Rfm9xError> {
        let reg = fdev_reg(hz);
        self.wr_reg(REG_FDEV_MSB, (reg >> 8) as u8).await?;
        self.wr_reg(REG_FDEV_LSB, (reg & 0xFF) as u8).await
    }

    /// Select the gaussian shaping filter
    pub async fn set_pulse_shape(&mut self, shape: PulseShape) -> Result<(), Rfm9xError> {
        let ramp = self.rd_reg(REG_PA_RAMP).await?;
        let val = (ramp & !PA_RAMP_SHAPING_MASK) | ((shape as u8) << PA_RAMP_SHAPING_SHIFT);
        self.wr_reg(REG_PA_RAMP, val).await
    }

    /// Currently configured gaussian shaping filter
    pub async fn pulse_shape(&mut self) -> Result<PulseShape, Rfm9xError> {
        let ramp = self.rd_reg(REG_PA_RAMP).await?;
        Ok(PulseShape::from(ramp >> PA_RAMP_SHAPING_SHIFT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitrate_reg_values() {
        // Datasheet default: 4.8kbps <-> 0x1A0B
        assert_eq!(bitrate_reg(4_800), 0x1A0B);
        assert_eq!(bitrate_reg(250_000), 128);
        // Out of range requests are clamped instead of overflowing the register
        assert_eq!(bitrate_reg(100), bitrate_reg(1_200));
    }

    #[test]
    fn bitrate_roundtrip_error_is_small() {
        for bps in [2_400, 4_800, 9_600, 38_400, 250_000] {
            let eff = bitrate_from_reg(bitrate_reg(bps));
            let err = eff.abs_diff(bps);
            assert!(err * 100 < bps, "{bps} -> {eff}");
        }
    }

    #[test]
    fn frf_steps() {
        // 915MHz in 61.035Hz steps
        assert_eq!(frf_reg(915_000_000), 14_991_360);
        assert_eq!(fdev_reg(25_000), 409);
    }

    #[test]
    fn pulse_shape_mapping() {
        assert_eq!(PulseShape::from_bt_tenths(10), PulseShape::Bt1p0);
        assert_eq!(PulseShape::from_bt_tenths(5), PulseShape::Bt0p5);
        assert_eq!(PulseShape::from_bt_tenths(3), PulseShape::Bt0p3);
        assert_eq!(PulseShape::from_bt_tenths(0), PulseShape::Off);
        assert_eq!(PulseShape::from_bt_tenths(99), PulseShape::Bt1p0);
        for s in [PulseShape::Off, PulseShape::Bt1p0, PulseShape::Bt0p5, PulseShape::Bt0p3] {
            assert_eq!(PulseShape::from(s as u8), s);
        }
    }

    #[test]
    fn temp_threshold_mapping() {
        assert_eq!(TempThreshold::from_degrees(5), TempThreshold::Deg5);
        assert_eq!(TempThreshold::from_degrees(7), TempThreshold::Deg10);
        assert_eq!(TempThreshold::from_degrees(15), TempThreshold::Deg15);
        assert_eq!(TempThreshold::from_degrees(100), TempThreshold::Deg20);
        assert_eq!(TempThreshold::Deg15.degrees(), 15);
    }
}
