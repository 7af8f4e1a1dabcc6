//! SX1276/RFM9x register map, FSK/OOK mode.
//!
//! Addresses are 7 bits on the SPI bus: bit 7 of the address byte selects
//! write (1) or read (0) access.

/// FIFO read/write access
pub const REG_FIFO: u8 = 0x00;
/// Operating mode, modulation type and LoRa/FSK selection
pub const REG_OP_MODE: u8 = 0x01;
/// Bit rate setting, MSB (BitRate = FXOSC / reg)
pub const REG_BITRATE_MSB: u8 = 0x02;
pub const REG_BITRATE_LSB: u8 = 0x03;
/// Frequency deviation setting, MSB (Fdev = Fstep * reg)
pub const REG_FDEV_MSB: u8 = 0x04;
pub const REG_FDEV_LSB: u8 = 0x05;
/// RF carrier frequency, MSB (Frf = Fstep * reg)
pub const REG_FRF_MSB: u8 = 0x06;
pub const REG_FRF_MID: u8 = 0x07;
pub const REG_FRF_LSB: u8 = 0x08;
/// PA selection and output power
pub const REG_PA_CONFIG: u8 = 0x09;
/// PA ramp time, gaussian shaping filter selection
pub const REG_PA_RAMP: u8 = 0x0A;
/// Over-current protection
pub const REG_OCP: u8 = 0x0B;
/// LNA gain
pub const REG_LNA: u8 = 0x0C;

/// Preamble length, MSB
pub const REG_PREAMBLE_MSB: u8 = 0x25;
pub const REG_PREAMBLE_LSB: u8 = 0x26;
/// Syncword recognition control
pub const REG_SYNC_CONFIG: u8 = 0x27;
/// First syncword byte (up to 8, at consecutive addresses)
pub const REG_SYNC_VALUE1: u8 = 0x28;
pub const REG_SYNC_VALUE2: u8 = 0x29;
/// Packet format, DC-free encoding, CRC control
pub const REG_PACKET_CONFIG1: u8 = 0x30;
/// Packet mode select
pub const REG_PACKET_CONFIG2: u8 = 0x31;
/// Payload length (max length in variable format)
pub const REG_PAYLOAD_LENGTH: u8 = 0x32;
/// FIFO threshold and TX start condition
pub const REG_FIFO_THRESH: u8 = 0x35;

/// Image calibration and temperature monitoring control
pub const REG_IMAGE_CAL: u8 = 0x3B;
/// Temperature measurement, 2's complement, -1 degree/LSB
pub const REG_TEMP: u8 = 0x3C;
/// Mode-ready/TX-ready flags
pub const REG_IRQ_FLAGS1: u8 = 0x3E;
/// FIFO and packet flags
pub const REG_IRQ_FLAGS2: u8 = 0x3F;
/// DIO0..DIO3 mapping
pub const REG_DIO_MAPPING1: u8 = 0x40;
/// Silicon revision (0x12 expected)
pub const REG_VERSION: u8 = 0x42;
/// High power (+20dBm) PA control
pub const REG_PA_DAC: u8 = 0x4D;

/// Write access flag, OR-ed in the address byte
pub const WNR_WRITE: u8 = 0x80;

/// Expected content of REG_VERSION
pub const VERSION_SX1276: u8 = 0x12;

// RegOpMode fields
pub const OP_MODE_LONG_RANGE: u8 = 0x80;
pub const OP_MODE_MODULATION_MASK: u8 = 0x60;
pub const OP_MODE_MASK: u8 = 0x07;

// RegPaConfig / RegPaDac fields
pub const PA_CONFIG_PA_SELECT: u8 = 0x80;
pub const PA_CONFIG_MAX_POWER: u8 = 0x70;
pub const PA_DAC_DEFAULT: u8 = 0x84;
pub const PA_DAC_HIGH_POWER: u8 = 0x87;

// RegPaRamp: bits 6:5 select the gaussian shaping filter in FSK mode
pub const PA_RAMP_SHAPING_MASK: u8 = 0x60;
pub const PA_RAMP_SHAPING_SHIFT: u8 = 5;

// RegSyncConfig fields
pub const SYNC_CONFIG_AUTO_RESTART_ON: u8 = 0x40;
pub const SYNC_CONFIG_SYNC_ON: u8 = 0x10;

// RegPacketConfig1 fields
pub const PACKET_CONFIG1_VARIABLE_LEN: u8 = 0x80;
pub const PACKET_CONFIG1_CRC_ON: u8 = 0x10;

// RegPacketConfig2 fields
pub const PACKET_CONFIG2_PACKET_MODE: u8 = 0x40;

// RegFifoThresh fields
pub const FIFO_THRESH_TX_START_NOT_EMPTY: u8 = 0x80;

// RegImageCal fields
pub const IMAGE_CAL_AUTO_ON: u8 = 0x80;
pub const IMAGE_CAL_TEMP_CHANGE: u8 = 0x08;
pub const IMAGE_CAL_TEMP_THRESHOLD_MASK: u8 = 0x06;
pub const IMAGE_CAL_TEMP_THRESHOLD_SHIFT: u8 = 1;
pub const IMAGE_CAL_TEMP_MONITOR_OFF: u8 = 0x01;

// RegDioMapping1: DIO0 mapping in bits 7:6, 00 = PacketSent while in TX
pub const DIO0_PACKET_SENT: u8 = 0x00;

/// Crystal oscillator frequency (Hz), common to all RFM9x modules
pub const FXOSC: u32 = 32_000_000;
