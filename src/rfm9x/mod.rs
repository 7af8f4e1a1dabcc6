use defmt::debug;
use embassy_time::{Duration, Instant, Timer};
use embedded_hal::digital::v2::OutputPin;
use embedded_hal_async::{digital::Wait, spi::SpiBus};

use status::Mode;

pub mod fsk;
pub mod radio;
pub mod registers;
pub mod status;

pub use fsk::{PulseShape, TempThreshold};

use registers::*;

/// Largest payload accepted by send(): one 64-byte FIFO minus the length byte
pub const MAX_PAYLOAD: usize = 63;

/// RFM9x device in FSK mode
pub struct Rfm9x<O, SPI, IRQ> {
    // Pins
    nreset: O,
    nss: O,
    /// DIO0, mapped to PacketSent while transmitting
    dio0: IRQ,
    spi: SPI,
    /// Scratch buffer for FIFO writes: address byte plus length byte plus payload
    buffer: [u8; MAX_PAYLOAD + 2],
}

/// Error using the RFM9x
#[derive(defmt::Format, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rfm9xError {
    /// Unable to set/get a pin level
    Pin,
    /// Unable to use SPI
    Spi,
    /// Silicon revision register did not read back as expected
    BadVersion,
    /// Timeout while waiting for a mode change or TX completion
    Timeout,
    /// Payload larger than the TX FIFO
    PayloadTooLong,
}

impl<O, SPI, IRQ> Rfm9x<O, SPI, IRQ>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    IRQ: Wait,
{
    /// Create a RFM9x device
    pub fn new(nreset: O, dio0: IRQ, spi: SPI, nss: O) -> Self {
        Self {
            nreset,
            nss,
            dio0,
            spi,
            buffer: [0; MAX_PAYLOAD + 2],
        }
    }

    /// Reset the chip: 1ms low pulse, 5ms settle
    pub async fn reset(&mut self) -> Result<(), Rfm9xError> {
        self.nreset.set_low().map_err(|_| Rfm9xError::Pin)?;
        Timer::after_millis(1).await;
        self.nreset.set_high().map_err(|_| Rfm9xError::Pin)?;
        Timer::after_millis(5).await;
        debug!("Reset done");
        Ok(())
    }

    /// Read a single register
    pub async fn rd_reg(&mut self, addr: u8) -> Result<u8, Rfm9xError> {
        let mut buf = [addr & !WNR_WRITE, 0];
        self.nss.set_low().map_err(|_| Rfm9xError::Pin)?;
        let res = self.spi.transfer_in_place(&mut buf).await;
        self.nss.set_high().map_err(|_| Rfm9xError::Pin)?;
        res.map_err(|_| Rfm9xError::Spi)?;
        Ok(buf[1])
    }

    /// Write a single register
    pub async fn wr_reg(&mut self, addr: u8, value: u8) -> Result<(), Rfm9xError> {
        let buf = [addr | WNR_WRITE, value];
        self.nss.set_low().map_err(|_| Rfm9xError::Pin)?;
        let res = self.spi.write(&buf).await;
        self.nss.set_high().map_err(|_| Rfm9xError::Pin)?;
        res.map_err(|_| Rfm9xError::Spi)
    }

    /// Update some bits of a register (read-modify-write)
    pub async fn upd_reg(&mut self, addr: u8, mask: u8, value: u8) -> Result<(), Rfm9xError> {
        let old = self.rd_reg(addr).await?;
        self.wr_reg(addr, (old & !mask) | (value & mask)).await
    }

    /// Burst-write the TX FIFO with a length byte followed by the payload
    pub async fn wr_fifo(&mut self, payload: &[u8]) -> Result<(), Rfm9xError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(Rfm9xError::PayloadTooLong);
        }
        let len = payload.len();
        self.buffer[0] = REG_FIFO | WNR_WRITE;
        self.buffer[1] = len as u8;
        self.buffer[2..2 + len].copy_from_slice(payload);
        self.nss.set_low().map_err(|_| Rfm9xError::Pin)?;
        let res = self.spi.write(&self.buffer[..2 + len]).await;
        self.nss.set_high().map_err(|_| Rfm9xError::Pin)?;
        res.map_err(|_| Rfm9xError::Spi)
    }

    /// Silicon revision (0x12 on SX1276/RFM9x)
    pub async fn version(&mut self) -> Result<u8, Rfm9xError> {
        self.rd_reg(REG_VERSION).await
    }

    /// Current operating mode
    pub async fn mode(&mut self) -> Result<Mode, Rfm9xError> {
        Ok(Mode::from(self.rd_reg(REG_OP_MODE).await?))
    }

    /// Request an operating mode, keeping modulation/band settings untouched
    pub async fn set_mode(&mut self, mode: Mode) -> Result<(), Rfm9xError> {
        self.upd_reg(REG_OP_MODE, OP_MODE_MASK, mode.bits()).await
    }

    /// Request a mode and poll IrqFlags1.ModeReady until the transition completes
    pub async fn set_mode_ready(&mut self, mode: Mode) -> Result<(), Rfm9xError> {
        self.set_mode(mode).await?;
        let start = Instant::now();
        loop {
            let flags = self.irq_flags().await?;
            if flags.mode_ready() {
                return Ok(());
            }
            if start.elapsed() >= Duration::from_millis(10) {
                return Err(Rfm9xError::Timeout);
            }
            Timer::after_micros(100).await;
        }
    }

    /// Read both IRQ flag registers
    pub async fn irq_flags(&mut self) -> Result<status::IrqFlags, Rfm9xError> {
        let f1 = self.rd_reg(REG_IRQ_FLAGS1).await?;
        let f2 = self.rd_reg(REG_IRQ_FLAGS2).await?;
        Ok(status::IrqFlags::from_slice(&[f1, f2]))
    }

    /// Bring the chip into FSK packet mode on the given carrier
    ///
    /// Checks the silicon revision, then configures 25kHz deviation, 8-byte
    /// preamble, the 0x2D/0xD4 syncword, variable length packets with CRC and
    /// TX start on FIFO-not-empty. Modulation shaping, bitrate and TX power
    /// keep their reset defaults until configured explicitly.
    pub async fn init(&mut self, freq_hz: u32) -> Result<(), Rfm9xError> {
        let version = self.version().await?;
        if version != VERSION_SX1276 {
            defmt::error!("Unexpected version {=u8:02x}", version);
            return Err(Rfm9xError::BadVersion);
        }
        // FSK selection requires going through sleep to clear LongRangeMode
        self.wr_reg(REG_OP_MODE, Mode::Sleep.bits()).await?;
        Timer::after_millis(1).await;
        self.set_mode_ready(Mode::Standby).await?;

        self.set_rf(freq_hz).await?;
        self.set_fdev(25_000).await?;

        self.wr_reg(REG_PREAMBLE_MSB, 0).await?;
        self.wr_reg(REG_PREAMBLE_LSB, 8).await?;
        self.wr_reg(
            REG_SYNC_CONFIG,
            SYNC_CONFIG_AUTO_RESTART_ON | SYNC_CONFIG_SYNC_ON | 0x01,
        )
        .await?;
        self.wr_reg(REG_SYNC_VALUE1, 0x2D).await?;
        self.wr_reg(REG_SYNC_VALUE2, 0xD4).await?;

        self.wr_reg(
            REG_PACKET_CONFIG1,
            PACKET_CONFIG1_VARIABLE_LEN | PACKET_CONFIG1_CRC_ON,
        )
        .await?;
        self.wr_reg(REG_PACKET_CONFIG2, PACKET_CONFIG2_PACKET_MODE).await?;
        self.wr_reg(REG_PAYLOAD_LENGTH, (MAX_PAYLOAD + 1) as u8).await?;
        self.wr_fifo_thresh().await?;
        debug!("FSK init done at {=u32}Hz", freq_hz);
        Ok(())
    }

    async fn wr_fifo_thresh(&mut self) -> Result<(), Rfm9xError> {
        self.wr_reg(REG_FIFO_THRESH, FIFO_THRESH_TX_START_NOT_EMPTY | 0x0F)
            .await
    }
}
