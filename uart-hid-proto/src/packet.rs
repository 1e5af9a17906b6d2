//! Checksum-validated packets and their type tags.

use crate::command::{KeyboardCommand, MouseCommand};
use crate::{TYPE_KEYBOARD, TYPE_MOUSE};

/// Known packet types.
///
/// Unrecognized tags are kept as [`PacketKind::Unknown`] so newer senders
/// can add types without breaking older receivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketKind {
    /// Absolute mouse command (`0x01`).
    Mouse,
    /// Keyboard command (`0x02`).
    Keyboard,
    /// Any other tag; ignored by the receiver.
    Unknown(u8),
}

impl From<u8> for PacketKind {
    fn from(tag: u8) -> Self {
        match tag {
            TYPE_MOUSE => PacketKind::Mouse,
            TYPE_KEYBOARD => PacketKind::Keyboard,
            other => PacketKind::Unknown(other),
        }
    }
}

impl From<PacketKind> for u8 {
    fn from(kind: PacketKind) -> Self {
        match kind {
            PacketKind::Mouse => TYPE_MOUSE,
            PacketKind::Keyboard => TYPE_KEYBOARD,
            PacketKind::Unknown(tag) => tag,
        }
    }
}

/// A packet whose checksum has been verified.
///
/// Borrows the receiver's payload buffer, so it is only valid until the
/// next byte is fed to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub struct Packet<'a> {
    /// Raw type tag.
    pub packet_type: u8,
    /// Payload bytes; `payload.len()` is the declared length.
    pub payload: &'a [u8],
}

impl<'a> Packet<'a> {
    /// Create a packet from a type tag and payload.
    pub const fn new(packet_type: u8, payload: &'a [u8]) -> Self {
        Self {
            packet_type,
            payload,
        }
    }

    /// Declared payload length.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Check if the payload is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Classify the type tag.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> PacketKind {
        PacketKind::from(self.packet_type)
    }

    /// Decode a mouse command, if the payload is long enough.
    ///
    /// Does not check the type tag.
    #[inline]
    #[must_use]
    pub fn mouse(&self) -> Option<MouseCommand> {
        MouseCommand::from_payload(self.payload)
    }

    /// Decode a keyboard command, if the payload is long enough.
    ///
    /// Does not check the type tag.
    #[inline]
    #[must_use]
    pub fn keyboard(&self) -> Option<KeyboardCommand> {
        KeyboardCommand::from_payload(self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(PacketKind::from(0x01), PacketKind::Mouse);
        assert_eq!(PacketKind::from(0x02), PacketKind::Keyboard);
        assert_eq!(PacketKind::from(0x7F), PacketKind::Unknown(0x7F));
        assert_eq!(u8::from(PacketKind::Unknown(0x03)), 0x03);
        assert_eq!(u8::from(PacketKind::Keyboard), TYPE_KEYBOARD);
    }

    #[test]
    fn test_packet_decodes_mouse() {
        let payload = [0x34, 0x12, 0x78, 0x56, 0x01];
        let packet = Packet::new(TYPE_MOUSE, &payload);

        assert_eq!(packet.kind(), PacketKind::Mouse);
        assert_eq!(packet.len(), 5);
        assert_eq!(packet.mouse(), Some(MouseCommand::new(0x1234, 0x5678, 0x01)));
    }

    #[test]
    fn test_packet_short_payload_decodes_nothing() {
        let payload = [0x34, 0x12, 0x00, 0x00];
        let packet = Packet::new(TYPE_MOUSE, &payload);

        assert_eq!(packet.mouse(), None);
        assert_eq!(packet.keyboard(), None);
    }

    #[test]
    fn test_empty_packet() {
        let packet = Packet::new(0x09, &[]);
        assert!(packet.is_empty());
        assert_eq!(packet.kind(), PacketKind::Unknown(0x09));
    }
}
