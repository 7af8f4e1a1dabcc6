use super::registers::OP_MODE_MASK;

/// Transceiver operating mode (RegOpMode 2:0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Mode {
    Sleep = 0,
    Standby = 1,
    FsTx = 2,
    Tx = 3,
    FsRx = 4,
    Rx = 5,
    Unknown = 8,
}

impl Mode {
    pub fn bits(self) -> u8 {
        (self as u8) & OP_MODE_MASK
    }
}

impl From<u8> for Mode {
    fn from(value: u8) -> Self {
        match value & OP_MODE_MASK {
            0 => Mode::Sleep,
            1 => Mode::Standby,
            2 => Mode::FsTx,
            3 => Mode::Tx,
            4 => Mode::FsRx,
            5 => Mode::Rx,
            _ => Mode::Unknown,
        }
    }
}

/// IRQ flags read from RegIrqFlags1/RegIrqFlags2
/// B0 : 7 ModeReady, 6 RxReady, 5 TxReady, 4 PllLock, 1 PreambleDetect, 0 SyncAddressMatch
/// B1 : 7 FifoFull, 6 FifoEmpty, 5 FifoLevel, 4 FifoOverrun, 3 PacketSent, 2 PayloadReady, 1 CrcOk
#[derive(Default)]
pub struct IrqFlags([u8; 2]);

impl IrqFlags {
    /// Create the flags from up to 2 bytes
    pub fn from_slice(bytes: &[u8]) -> IrqFlags {
        let mut arr = [0; 2];
        if bytes.len() > 2 {
            arr.copy_from_slice(&bytes[..2]);
        } else {
            arr[..bytes.len()].copy_from_slice(bytes);
        }
        IrqFlags(arr)
    }

    pub fn mode_ready(&self) -> bool {
        (self.0[0] & 0x80) != 0
    }

    pub fn rx_ready(&self) -> bool {
        (self.0[0] & 0x40) != 0
    }

    pub fn tx_ready(&self) -> bool {
        (self.0[0] & 0x20) != 0
    }

    pub fn pll_lock(&self) -> bool {
        (self.0[0] & 0x10) != 0
    }

    pub fn fifo_full(&self) -> bool {
        (self.0[1] & 0x80) != 0
    }

    pub fn fifo_empty(&self) -> bool {
        (self.0[1] & 0x40) != 0
    }

    pub fn fifo_overrun(&self) -> bool {
        (self.0[1] & 0x10) != 0
    }

    pub fn packet_sent(&self) -> bool {
        (self.0[1] & 0x08) != 0
    }

    pub fn payload_ready(&self) -> bool {
        (self.0[1] & 0x04) != 0
    }

    pub fn crc_ok(&self) -> bool {
        (self.0[1] & 0x02) != 0
    }
}

impl defmt::Format for IrqFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "IrqFlags {=u8:b}|{=u8:b}", self.0[0], self.0[1]);
        if self.mode_ready() {
            defmt::write!(fmt, " ModeReady");
        }
        if self.tx_ready() {
            defmt::write!(fmt, " TxReady");
        }
        if self.packet_sent() {
            defmt::write!(fmt, " PacketSent");
        }
        if self.payload_ready() {
            defmt::write!(fmt, " PayloadReady");
        }
        if self.fifo_overrun() {
            defmt::write!(fmt, " FifoOverrun");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_roundtrip() {
        for m in [Mode::Sleep, Mode::Standby, Mode::FsTx, Mode::Tx, Mode::FsRx, Mode::Rx] {
            assert_eq!(Mode::from(m.bits()), m);
        }
        // Upper bits of RegOpMode must not leak into the mode
        assert_eq!(Mode::from(0xE0 | 1), Mode::Standby);
    }

    #[test]
    fn flags_decode() {
        let flags = IrqFlags::from_slice(&[0x80, 0x48]);
        assert!(flags.mode_ready());
        assert!(flags.packet_sent());
        assert!(flags.fifo_empty());
        assert!(!flags.tx_ready());
        assert!(!flags.payload_ready());
    }

    #[test]
    fn flags_from_short_slice() {
        let flags = IrqFlags::from_slice(&[0xA0]);
        assert!(flags.mode_ready());
        assert!(flags.tx_ready());
        assert!(!flags.packet_sent());
    }
}
