//! Status LED heartbeat
//!
//! Blinks while the executor is alive, so a wedged link loop is visible
//! on the board.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

/// Half period of the blink in milliseconds
pub const HEARTBEAT_INTERVAL_MS: u64 = 500;

#[embassy_executor::task]
pub async fn heartbeat_task(mut led: Output<'static>) {
    info!("Heartbeat task started");

    let mut ticker = Ticker::every(Duration::from_millis(HEARTBEAT_INTERVAL_MS));
    loop {
        led.toggle();
        ticker.next().await;
    }
}
