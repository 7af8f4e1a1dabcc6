use defmt::info;
use embassy_executor::Spawner;
use embassy_stm32::{
    bind_interrupts,
    exti::ExtiInput,
    gpio::{Level, Output, Pull, Speed},
    mode::Async,
    spi::{Config as SpiConfig, Spi},
    time::Hertz,
    usart::{Config as UartConfig, Uart},
};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::{Duration, Timer};

use crate::rfm9x::Rfm9x;

bind_interrupts!(struct UartIrqs {
    USART2 => embassy_stm32::usart::InterruptHandler<embassy_stm32::peripherals::USART2>;
});

pub type Rfm9xNucleo = Rfm9x<Output<'static>, SpiWrapper, ExtiInput<'static>>;

pub struct BoardNucleoL476Rg {
    pub rfm9x: Rfm9xNucleo,
    pub uart: Uart<'static, Async>,
}

/// Led modes
static LED_TX_MODE: SignalLedMode = Signal::new();
static LED_STATUS_MODE: SignalLedMode = Signal::new();

impl BoardNucleoL476Rg {
    // Pin mapping for the RFM9x module
    // Name  | Connector | Nucleo
    // RESET | CN8 A0    | PA0
    // SCK   | CN5 D13   | PA5
    // MISO  | CN5 D12   | PA6
    // MOSI  | CN5 D11   | PA7
    // NSS   | CN9 D7    | PA8
    // DIO0  | CN8 A3    | PB0
    // LEDTX | CN8 A5    | PC0
    // LEDST | CN8 A4    | PC1

    pub async fn init(spawner: &Spawner) -> BoardNucleoL476Rg {
        let mut config = embassy_stm32::Config::default();

        // Run the system clock at 80MHz from the 16MHz HSI:
        // (HSI * PLLN) / (PLLM * PLLR) = (16MHz * 10) / (1 * 2)
        config.rcc.hsi = true;
        config.rcc.pll = Some(embassy_stm32::rcc::Pll {
            source: embassy_stm32::rcc::PllSource::HSI,
            prediv: embassy_stm32::rcc::PllPreDiv::DIV1,
            mul: embassy_stm32::rcc::PllMul::MUL10,
            divp: None,
            divq: None,
            divr: Some(embassy_stm32::rcc::PllRDiv::DIV2),
        });
        config.rcc.sys = embassy_stm32::rcc::Sysclk::PLL1_R;
        let p = embassy_stm32::init(config);

        // Leds driven through signals so apps just set a mode
        let led_tx = Output::new(p.PC0, Level::Low, Speed::Low);
        let led_status = Output::new(p.PC1, Level::Low, Speed::Low);
        spawner.spawn(blink(led_tx, &LED_TX_MODE)).unwrap();
        spawner.spawn(blink(led_status, &LED_STATUS_MODE)).unwrap();
        LED_TX_MODE.signal(LedMode::Off);
        LED_STATUS_MODE.signal(LedMode::BlinkSlow);

        // Control pins
        let nreset = Output::new(p.PA0, Level::High, Speed::Low);
        let dio0 = ExtiInput::new(p.PB0, p.EXTI0, Pull::None);

        // UART on the ST-Link virtual com: 115200bauds, 1 stop bit, no parity
        let mut uart_config = UartConfig::default();
        uart_config.baudrate = 115_200;
        let uart = Uart::new(p.USART2, p.PA3, p.PA2, UartIrqs, p.DMA1_CH7, p.DMA1_CH6, uart_config).unwrap();

        // SPI: the RFM9x supports up to 10MHz, stay well below
        let mut spi_config = SpiConfig::default();
        spi_config.frequency = Hertz(4_000_000);
        let spi = SpiWrapper(Spi::new_blocking(p.SPI1, p.PA5, p.PA7, p.PA6, spi_config));
        let nss = Output::new(p.PA8, Level::High, Speed::VeryHigh);

        // Create driver and reset the module
        let mut rfm9x = Rfm9x::new(nreset, dio0, spi, nss);
        rfm9x.reset().await.expect("Resetting chip !");

        let version = rfm9x.version().await.expect("Reading silicon revision !");
        info!("RFM9x silicon revision {=u8:02x}", version);
        BoardNucleoL476Rg { rfm9x, uart }
    }

    pub fn led_tx_set(mode: LedMode) {
        LED_TX_MODE.signal(mode)
    }

    pub fn led_status_set(mode: LedMode) {
        LED_STATUS_MODE.signal(mode)
    }
}

/// Led Mode
#[derive(Debug, Clone, Copy, defmt::Format, PartialEq)]
pub enum LedMode {
    Off,
    On,
    BlinkSlow,
    /// Short burst of fast toggles, then back to the previous mode
    Flash,
}

impl LedMode {
    /// Blinking half period
    pub fn delay(&self) -> Duration {
        match self {
            LedMode::BlinkSlow => Duration::from_millis(500),
            LedMode::Flash => Duration::from_millis(60),
            _ => Duration::from_ticks(0),
        }
    }

    pub fn is_blink(&self) -> bool {
        matches!(self, LedMode::BlinkSlow | LedMode::Flash)
    }
}

pub type SignalLedMode = Signal<CriticalSectionRawMutex, LedMode>;

/// Task pool controlling the two board leds
#[embassy_executor::task(pool_size = 2)]
pub async fn blink(mut led: Output<'static>, signal: &'static SignalLedMode) {
    let mut mode = LedMode::Off;
    let mut prev_mode = LedMode::Off;
    let mut burst_cnt: u8 = 0;
    loop {
        if let Some(next_mode) = signal.try_take() {
            if mode != LedMode::Flash {
                prev_mode = mode;
            }
            mode = next_mode;
            if mode == LedMode::Flash {
                burst_cnt = 4;
            }
        }
        if mode.is_blink() {
            Timer::after(mode.delay()).await;
            led.toggle();
            if burst_cnt > 0 {
                burst_cnt -= 1;
                if burst_cnt == 0 {
                    mode = prev_mode;
                }
            }
        } else {
            burst_cnt = 0;
            if mode == LedMode::On {
                led.set_high();
            } else {
                led.set_low();
            }
            prev_mode = mode;
            mode = signal.wait().await;
            if mode == LedMode::Flash {
                burst_cnt = 4;
            }
        }
    }
}

// Wrapper around blocking SPI to use the non-DMA SPI with the RFM9x driver
pub struct SpiWrapper(pub Spi<'static, embassy_stm32::mode::Blocking>);

impl embedded_hal_1::spi::ErrorType for SpiWrapper {
    type Error = embassy_stm32::spi::Error;
}

impl<W: embassy_stm32::spi::Word> embedded_hal_async::spi::SpiBus<W> for SpiWrapper {
    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn write(&mut self, words: &[W]) -> Result<(), Self::Error> {
        self.0.blocking_write(words)
    }

    async fn read(&mut self, words: &mut [W]) -> Result<(), Self::Error> {
        self.0.blocking_read(words)
    }

    async fn transfer(&mut self, read: &mut [W], write: &[W]) -> Result<(), Self::Error> {
        self.0.blocking_transfer(read, write)
    }

    async fn transfer_in_place(&mut self, words: &mut [W]) -> Result<(), Self::Error> {
        self.0.blocking_transfer_in_place(words)
    }
}
