#![no_std]

//! Test applications for the RFM9x radio module in FSK mode,
//! running on a Nucleo-L476RG host board.

pub mod board;
pub mod console;
pub mod rfm9x;

// Host test binaries need a critical-section implementation and a defmt
// global logger at link time; firmware binaries provide their own.
#[cfg(test)]
use critical_section as _;
#[cfg(test)]
use defmt_rtt as _;

// defmt panics normally route through panic-probe on the target; host test
// binaries forward them to the std panic runtime instead.
#[cfg(test)]
#[defmt::panic_handler]
fn defmt_panic() -> ! {
    panic!("defmt panic")
}
