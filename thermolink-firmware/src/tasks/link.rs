//! Host link over the buffered UART
//!
//! Reads whatever the UART has buffered, feeds it byte by byte into the
//! endpoint and writes each acknowledgement back before feeding the next
//! byte.

use defmt::*;
use embassy_rp::uart::{self, BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use thermolink_core::traits::Actuators;
use thermolink_core::{Endpoint, LinkEvent};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Serve the host link forever
///
/// The endpoint owns the SPI devices, which borrow a bus that lives in
/// `main`, so this runs inline rather than as a spawned task.
pub async fn serve_link<A: Actuators>(
    mut rx: BufferedUartRx,
    mut tx: BufferedUartTx,
    mut endpoint: Endpoint<A>,
) -> ! {
    info!("Link started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                trace!("RX: {} bytes", n);

                // Same byte-to-ack path as `SerialLink::poll`: keep feeding
                // after a failed write, but stop writing for this chunk
                let mut tx_failed = false;
                for ack in endpoint.acks(&buf[..n]) {
                    if tx_failed {
                        continue;
                    }
                    if let Err(e) = tx.write_all(&ack.to_frame().encode()).await {
                        warn!("Ack write failed: {:?}", e);
                        tx_failed = true;
                    }
                }
            }
            // Input was lost or mangled; never splice across the gap
            Err(e @ (uart::Error::Break | uart::Error::Framing | uart::Error::Overrun)) => {
                debug!("UART {:?}, resynchronizing", e);
                endpoint.on_event(LinkEvent::Break);
                log_stats(&endpoint);
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

fn log_stats<A: Actuators>(endpoint: &Endpoint<A>) {
    let stats = endpoint.stats();
    info!(
        "Link stats: accepted={}, corrupt={}, unknown={}, rejected={}, noise={}",
        stats.frames_accepted,
        stats.frames_corrupt,
        stats.unknown_commands,
        stats.requests_rejected,
        stats.bytes_discarded
    );
}
