#![no_std]
#![no_main]

//! # Interactive FSK transmit test
//!
//! Exercises the RFM9x module in FSK mode from the virtual-com console.
//! The radio is brought up at 915MHz with 23dBm on PA_BOOST, then the
//! console asks for the packet count, gaussian filter BT product (in
//! tenths), temperature threshold and bitrate, each applied as soon as it
//! is entered. The fixed payload is then sent the requested number of
//! times with a 2s pause between packets, status lines going both to the
//! console and to defmt. The TX led flashes on every packet.

use core::fmt::Write;

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Timer;
use heapless::String;
use {defmt_rtt as _, panic_probe as _};

use rfm9x_apps::board::{BoardNucleoL476Rg, LedMode};
use rfm9x_apps::console::Console;
use rfm9x_apps::rfm9x::{PulseShape, TempThreshold};

const RF_FREQ: u32 = 915_000_000;
const TX_POWER_DBM: u8 = 23;
const PAYLOAD: &str = "please work";

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Starting fsk_tx");

    let board = BoardNucleoL476Rg::init(&spawner).await;
    let mut rfm9x = board.rfm9x;
    let mut console = Console::new(board.uart);
    let mut line: String<64> = String::new();

    // Initialize transceiver for FSK transmission at full power
    rfm9x.init(RF_FREQ).await.expect("FSK init");
    rfm9x.set_tx_power(TX_POWER_DBM).await.expect("Setting TX power");

    // One temperature capture at startup, reported on every packet
    let startup_temp = rfm9x.temperature().await.expect("Temperature measurement");
    info!("Startup temperature: {=i8}C", startup_temp);

    // Pre-set threshold and shaping before asking the user for their own values
    rfm9x.set_temp_threshold(TempThreshold::Deg5).await.expect("Setting temp threshold");
    rfm9x.set_pulse_shape(PulseShape::Bt1p0).await.expect("Setting pulse shape");

    let bt = rfm9x.pulse_shape().await.expect("Reading pulse shape").bt_tenths();
    line.clear();
    core::write!(&mut line, "gaussian filter is {}.{} BT", bt / 10, bt % 10).ok();
    console.print_line(&line).await;

    let num_of_packets = console.prompt_u32("How many packets do you want sent?: ").await;

    let gauss_fil = console.prompt_u32("what gaussian filter setting? (BT in tenths): ").await;
    rfm9x
        .set_pulse_shape(PulseShape::from_bt_tenths(gauss_fil))
        .await
        .expect("Setting pulse shape");

    let thresh = console.prompt_u32("temp threshold? (degrees C): ").await;
    rfm9x
        .set_temp_threshold(TempThreshold::from_degrees(thresh))
        .await
        .expect("Setting temp threshold");

    let bitrate_select = console.prompt_u32("what is the desired bitrate? (bit/s): ").await;
    rfm9x.set_bitrate(bitrate_select).await.expect("Setting bitrate");
    info!(
        "Config: {=u32} packets, BT tenths {=u32}, threshold {=u32}C, bitrate {=u32}bit/s",
        num_of_packets, gauss_fil, thresh, bitrate_select
    );

    let mut remaining = num_of_packets;
    while remaining > 0 {
        rfm9x.send(PAYLOAD.as_bytes()).await.expect("Sending packet");
        BoardNucleoL476Rg::led_tx_set(LedMode::Flash);
        console.print_line("data sent").await;

        let threshold = rfm9x.temp_threshold().await.expect("Reading temp threshold");
        line.clear();
        core::write!(&mut line, "temp threshold: {}C", threshold.degrees()).ok();
        console.print_line(&line).await;

        line.clear();
        core::write!(&mut line, "startup temperature: {}C", startup_temp).ok();
        console.print_line(&line).await;
        info!("Packet sent | threshold {}C | startup temp {=i8}C", threshold.degrees(), startup_temp);

        Timer::after_secs(2).await;
        console.print_line(PAYLOAD).await;

        remaining -= 1;
    }

    console.print_line("transmission over").await;
    info!("Transmission over after {=u32} packets", num_of_packets);
    BoardNucleoL476Rg::led_status_set(LedMode::On);
}
