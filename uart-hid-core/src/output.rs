//! Report sink trait and error types.

use core::future::Future;
use uart_hid_proto::{KeyboardCommand, MouseCommand};

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// USB/communication I/O error.
    Io,
    /// Device stopped being ready between the readiness check and the send.
    NotReady,
    /// Endpoint disabled by the host.
    Disabled,
}

/// Async trait for HID report sinks.
///
/// This is the device side of the bridge: it turns commands into HID
/// reports and exposes the USB power state the dispatcher has to respect.
/// State is queried per packet and never cached by callers.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ReportSink {
    /// Send one absolute mouse report.
    fn send_mouse(&mut self, cmd: &MouseCommand) -> impl Future<Output = Result<(), OutputError>>;

    /// Send one keyboard report.
    fn send_keyboard(
        &mut self,
        cmd: &KeyboardCommand,
    ) -> impl Future<Output = Result<(), OutputError>>;

    /// Check if the device is configured and able to accept a report.
    fn is_ready(&self) -> bool;

    /// Check if the host has suspended the bus.
    fn is_suspended(&self) -> bool;

    /// Ask the host to resume the bus.
    ///
    /// Fire-and-forget: implementations must not wait for the resume.
    fn request_remote_wakeup(&mut self);
}
