//! UART-based byte source for incoming frames.
//!
//! # Pins
//!
//! Uses UART0 at 115200 8N1:
//! - GPIO 0: TX (unused)
//! - GPIO 1: RX
//!
//! The receiver is interrupt-driven into a ring buffer, so bytes keep
//! arriving while the bridge is paused inside a mouse burst. Each chunk read
//! flips the status LED.

use embassy_rp::uart::{BufferedUartRx, Error as UartError};
use embedded_io_async::Read;
use uart_hid_core::{InputError, InputSource};

use crate::usb_state;

/// Ring buffer size. Holds well over the ~30 ms of traffic a mouse burst
/// leaves unread at 115200 baud.
pub const RX_BUFFER_SIZE: usize = 256;

/// Convert UART errors to [`InputError`].
///
/// This is a helper function instead of a `From` impl to avoid orphan rule issues
/// (both `UartError` and `InputError` are defined in external crates).
#[inline]
fn uart_error_to_input_error(e: UartError) -> InputError {
    match e {
        UartError::Framing => InputError::Framing,
        UartError::Overrun => InputError::Overrun,
        UartError::Break => InputError::Break,
        _ => InputError::Io,
    }
}

/// UART-based input source.
pub struct UartByteSource {
    rx: BufferedUartRx,
}

impl UartByteSource {
    /// Create a new UART input source from the given buffered receiver.
    #[must_use]
    pub fn new(rx: BufferedUartRx) -> Self {
        Self { rx }
    }
}

impl InputSource for UartByteSource {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, InputError> {
        let len = self.rx.read(buf).await.map_err(uart_error_to_input_error)?;
        if len > 0 {
            usb_state::publish_activity();
        }
        Ok(len)
    }
}
