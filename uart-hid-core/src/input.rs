//! Input source trait and error types.

use core::future::Future;

/// Error type for input operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// UART/communication I/O error.
    Io,
    /// UART framing error (bad stop bit).
    Framing,
    /// Receive FIFO or ring buffer overflowed; bytes were lost.
    Overrun,
    /// Line held low for longer than a character time.
    Break,
}

/// Async trait for serial byte sources.
///
/// Abstracts where frame bytes come from so the bridge can run against a
/// UART on target and a scripted source in tests.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait InputSource {
    /// Wait for at least one byte and copy what is available into `buf`.
    ///
    /// Returns the number of bytes written, which is at least 1 on success.
    /// Bytes must be delivered in arrival order.
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize, InputError>>;
}
