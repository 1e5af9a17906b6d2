//! Frame encoding for the sending side of the link.
//!
//! The receiver never encodes, but host tools and tests need byte-exact
//! frames. [`encode_frame()`] writes an arbitrary `(type, payload)` pair;
//! the [`Encode`] trait does the same for the typed commands.

use crate::checksum::Checksum;
use crate::command::{KeyboardCommand, MouseCommand};
use crate::{FRAME_MAGIC, FRAME_OVERHEAD, MAX_PAYLOAD_LEN, TYPE_KEYBOARD, TYPE_MOUSE};

/// Error type for encoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Payload is longer than [`MAX_PAYLOAD_LEN`]; the receiver would reject it.
    PayloadTooLarge,
    /// The output buffer is too small to hold the frame.
    BufferTooSmall,
    /// A write operation failed (for I/O adapters).
    WriteError,
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PayloadTooLarge => write!(f, "payload too large"),
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::WriteError => write!(f, "write error"),
        }
    }
}

/// Write a complete frame into `buf`.
///
/// Returns the number of bytes written, which is always
/// `payload.len() + FRAME_OVERHEAD`.
///
/// # Errors
///
/// - [`EncodeError::PayloadTooLarge`] if `payload` exceeds [`MAX_PAYLOAD_LEN`]
/// - [`EncodeError::BufferTooSmall`] if `buf` cannot hold the frame
pub fn encode_frame(packet_type: u8, payload: &[u8], buf: &mut [u8]) -> Result<usize, EncodeError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(EncodeError::PayloadTooLarge);
    }
    let frame_len = payload.len() + FRAME_OVERHEAD;
    if buf.len() < frame_len {
        return Err(EncodeError::BufferTooSmall);
    }

    let len = payload.len() as u8;
    let mut sum = Checksum::new();
    sum.update(packet_type);
    sum.update(len);
    sum.update_slice(payload);

    buf[0] = FRAME_MAGIC;
    buf[1] = packet_type;
    buf[2] = len;
    buf[3..3 + payload.len()].copy_from_slice(payload);
    buf[frame_len - 1] = sum.finalize();

    Ok(frame_len)
}

/// Extension trait for encoding commands as complete frames.
///
/// # Example
///
/// ```
/// use uart_hid_proto::{Encode, KeyboardCommand, modifiers};
///
/// let cmd = KeyboardCommand::new(modifiers::LEFT_SHIFT, [0x04, 0, 0, 0, 0, 0]);
/// let mut buf = [0u8; 16];
/// let len = cmd.encode(&mut buf).unwrap();
///
/// assert_eq!(len, 11);
/// assert_eq!(buf[0], 0xAA);
/// ```
pub trait Encode {
    /// Packet type tag written into the frame.
    const PACKET_TYPE: u8;

    /// Encode to the provided buffer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::BufferTooSmall`] if the buffer is not large enough.
    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError>;

    /// Encode to a `heapless::Vec`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::BufferTooSmall`] if `N` is not large enough.
    #[cfg(feature = "heapless")]
    fn encode_to_vec<const N: usize>(&self) -> Result<heapless::Vec<u8, N>, EncodeError> {
        let mut vec = heapless::Vec::new();
        vec.resize(N, 0).map_err(|_| EncodeError::BufferTooSmall)?;
        let len = self.encode(&mut vec)?;
        vec.truncate(len);
        Ok(vec)
    }

    /// Encode to an `embedded_io::Write` implementation, such as a UART TX.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::WriteError`] if the write fails.
    #[cfg(feature = "embedded-io")]
    fn encode_io<W: embedded_io::Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        let mut buf = [0u8; crate::MAX_FRAME_LEN];
        let len = self.encode(&mut buf)?;
        writer
            .write_all(&buf[..len])
            .map_err(|_| EncodeError::WriteError)
    }
}

impl Encode for MouseCommand {
    const PACKET_TYPE: u8 = TYPE_MOUSE;

    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        encode_frame(Self::PACKET_TYPE, &self.to_payload(), buf)
    }
}

impl Encode for KeyboardCommand {
    const PACKET_TYPE: u8 = TYPE_KEYBOARD;

    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        encode_frame(Self::PACKET_TYPE, &self.to_payload(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::checksum;
    use crate::command::{buttons, modifiers};

    #[test]
    fn test_encode_mouse() {
        let cmd = MouseCommand::new(0x1234, 0, buttons::LEFT | buttons::MIDDLE);
        let mut buf = [0u8; 16];
        let len = cmd.encode(&mut buf).unwrap();

        assert_eq!(
            &buf[..len],
            &[0xAA, 0x01, 0x05, 0x34, 0x12, 0x00, 0x00, 0x05, 0x51]
        );
    }

    #[test]
    fn test_encode_keyboard() {
        let cmd = KeyboardCommand::new(modifiers::LEFT_SHIFT, [0x04, 0, 0, 0, 0, 0]);
        let mut buf = [0u8; 16];
        let len = cmd.encode(&mut buf).unwrap();

        // 0x02 + 0x07 + 0x02 + 0x04
        assert_eq!(
            &buf[..len],
            &[0xAA, 0x02, 0x07, 0x02, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0F]
        );
    }

    #[test]
    fn test_encode_empty_payload() {
        let mut buf = [0u8; 4];
        let len = encode_frame(0x09, &[], &mut buf).unwrap();
        assert_eq!(&buf[..len], &[0xAA, 0x09, 0x00, 0x09]);
    }

    #[test]
    fn test_encode_max_payload() {
        let payload = [0x11u8; MAX_PAYLOAD_LEN];
        let mut buf = [0u8; crate::MAX_FRAME_LEN];
        let len = encode_frame(0x05, &payload, &mut buf).unwrap();

        assert_eq!(len, crate::MAX_FRAME_LEN);
        assert_eq!(buf[2], MAX_PAYLOAD_LEN as u8);
        assert_eq!(buf[len - 1], checksum(0x05, &payload));
    }

    #[test]
    fn test_encode_payload_too_large() {
        let payload = [0u8; MAX_PAYLOAD_LEN + 1];
        let mut buf = [0u8; 128];
        assert_eq!(
            encode_frame(0x01, &payload, &mut buf),
            Err(EncodeError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let cmd = MouseCommand::new(1, 2, 0);
        let mut buf = [0u8; 8];
        assert_eq!(cmd.encode(&mut buf), Err(EncodeError::BufferTooSmall));
    }

    #[cfg(feature = "heapless")]
    #[test]
    fn test_encode_to_vec() {
        let cmd = MouseCommand::new(0x1234, 0, 0x05);
        let vec: heapless::Vec<u8, 16> = cmd.encode_to_vec().unwrap();
        assert_eq!(vec.len(), 9);
        assert_eq!(vec[8], 0x51);
    }

    #[test]
    fn test_error_display() {
        extern crate std;
        use std::string::ToString;

        assert_eq!(EncodeError::PayloadTooLarge.to_string(), "payload too large");
        assert_eq!(EncodeError::BufferTooSmall.to_string(), "buffer too small");
    }
}
