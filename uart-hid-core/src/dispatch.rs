//! Turns validated packets into HID reports.

use embedded_hal_async::delay::DelayNs;
use uart_hid_proto::{Packet, PacketKind};

use crate::output::ReportSink;

/// Number of identical reports sent per mouse packet.
pub const MOUSE_BURST_COUNT: u8 = 3;

/// Pause after each report of a mouse burst, in milliseconds.
pub const MOUSE_BURST_SPACING_MS: u32 = 10;

/// What the dispatcher did with a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchOutcome {
    /// Mouse burst emitted; `sent` counts reports the sink accepted.
    MouseBurst { sent: u8 },
    /// Keyboard report handed to the sink.
    KeyboardSent,
    /// Keyboard report rejected by the sink.
    KeyboardFailed,
    /// Device not ready; nothing sent.
    DroppedNotReady,
    /// Payload shorter than the command needs; nothing sent.
    DroppedUndersized,
    /// Unknown packet type.
    Ignored(u8),
}

/// Packet dispatcher.
///
/// Holds the delay used to space out mouse bursts. The sink is passed per
/// call so its state is always read fresh.
pub struct Dispatcher<D> {
    delay: D,
}

impl<D: DelayNs> Dispatcher<D> {
    /// Create a dispatcher using `delay` for burst spacing.
    pub fn new(delay: D) -> Self {
        Self { delay }
    }

    /// Act on one validated packet.
    ///
    /// A suspended bus gets a remote wakeup request first, regardless of
    /// packet type. Mouse packets are sent [`MOUSE_BURST_COUNT`] times with a
    /// [`MOUSE_BURST_SPACING_MS`] pause after each; keyboard packets once.
    /// Send failures are logged and not retried.
    pub async fn dispatch<S: ReportSink>(
        &mut self,
        packet: &Packet<'_>,
        sink: &mut S,
    ) -> DispatchOutcome {
        if sink.is_suspended() {
            debug!("bus suspended, requesting remote wakeup");
            sink.request_remote_wakeup();
        }

        match packet.kind() {
            PacketKind::Mouse => {
                let Some(cmd) = packet.mouse() else {
                    trace!("mouse packet too short: {}", packet.len());
                    return DispatchOutcome::DroppedUndersized;
                };
                if !sink.is_ready() {
                    return DispatchOutcome::DroppedNotReady;
                }

                let mut sent = 0;
                for _ in 0..MOUSE_BURST_COUNT {
                    match sink.send_mouse(&cmd).await {
                        Ok(()) => sent += 1,
                        Err(e) => warn!("mouse report failed: {}", e),
                    }
                    self.delay.delay_ms(MOUSE_BURST_SPACING_MS).await;
                }
                DispatchOutcome::MouseBurst { sent }
            }
            PacketKind::Keyboard => {
                let Some(cmd) = packet.keyboard() else {
                    trace!("keyboard packet too short: {}", packet.len());
                    return DispatchOutcome::DroppedUndersized;
                };
                if !sink.is_ready() {
                    return DispatchOutcome::DroppedNotReady;
                }

                match sink.send_keyboard(&cmd).await {
                    Ok(()) => DispatchOutcome::KeyboardSent,
                    Err(e) => {
                        warn!("keyboard report failed: {}", e);
                        DispatchOutcome::KeyboardFailed
                    }
                }
            }
            PacketKind::Unknown(tag) => {
                trace!("ignoring packet type {=u8:#x}", tag);
                DispatchOutcome::Ignored(tag)
            }
        }
    }
}
