#![no_std]
#![no_main]

//! Silicon revision probe: read RegVersion on every user button press.
//! RFM9x modules based on the SX1276 report 0x12.

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_stm32::spi::{Config, Spi};
use embassy_stm32::time::Hertz;
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use rfm9x_apps::board::SpiWrapper;
use rfm9x_apps::rfm9x::registers::VERSION_SX1276;
use rfm9x_apps::rfm9x::Rfm9x;

/// Task to blink up to two leds
#[embassy_executor::task(pool_size = 2)]
async fn blink(mut led: Output<'static>, delay: u64) {
    loop {
        led.set_high();
        Timer::after_millis(delay).await;
        led.set_low();
        Timer::after_millis(delay).await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());
    info!("Starting get_version");

    // Get an interrupt on the button pin to wait
    let mut button = ExtiInput::new(p.PC13, p.EXTI13, Pull::Up);

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

    // Blink both leds to confirm the pin mapping
    let led_tx = Output::new(p.PC0, Level::High, Speed::Low);
    spawner.spawn(blink(led_tx, 500)).unwrap();

    let led_status = Output::new(p.PC1, Level::High, Speed::Low);
    spawner.spawn(blink(led_status, 125)).unwrap();

    let nreset = Output::new(p.PA0, Level::High, Speed::Low);
    let dio0 = ExtiInput::new(p.PB0, p.EXTI0, Pull::None);

    // SPI
    let mut spi_config = Config::default();
    spi_config.frequency = Hertz(4_000_000);
    let spi = SpiWrapper(Spi::new_blocking(p.SPI1, p.PA5, p.PA7, p.PA6, spi_config));
    let nss = Output::new(p.PA8, Level::High, Speed::VeryHigh);

    let mut rfm9x = Rfm9x::new(nreset, dio0, spi, nss);
    rfm9x.reset().await.expect("Resetting chip !");

    // Request the chip version when the button is pressed
    loop {
        button.wait_for_low().await;
        match rfm9x.version().await {
            Ok(VERSION_SX1276) => info!("Version {=u8:02x} (SX1276)", VERSION_SX1276),
            Ok(v) => warn!("Unexpected version {=u8:02x}", v),
            Err(e) => error!("Version read failed: {}", e),
        }
        // Wait for button release
        button.wait_for_high().await;
    }
}
