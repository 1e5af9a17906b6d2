//! Wire format, checksum, and command types for the UART-to-HID bridge.
//!
//! This crate provides everything both ends of the serial link need:
//!
//! - **Framing constants**: [`FRAME_MAGIC`], [`MAX_PAYLOAD_LEN`], packet type tags
//! - **Checksum**: [`checksum()`] - 8-bit additive checksum over type, length, and payload
//! - **Packets**: [`Packet`] - a checksum-validated `(type, payload)` pair
//! - **Commands**: [`MouseCommand`] and [`KeyboardCommand`] decoded from packet payloads
//! - **Encoding**: [`Encode`] trait and [`encode_frame()`] for the sending side
//! - **Keymap**: [`keymap::ascii_to_key()`] for typing text through keyboard packets
//!
//! # Wire Format
//!
//! ```text
//! [0]      magic    = 0xAA
//! [1]      type     (0x01 = mouse, 0x02 = keyboard, others ignored)
//! [2]      length   = N (0..=64)
//! [3..3+N) payload
//! [3+N]    checksum = (type + length + sum(payload)) mod 256
//! ```
//!
//! Mouse payload (N >= 5): `x_lo, x_hi, y_lo, y_hi, buttons` with absolute
//! coordinates in `0..=32767`.
//!
//! Keyboard payload (N >= 7): `modifiers, key1..key6`.
//!
//! # Example
//!
//! ```
//! use uart_hid_proto::{Encode, MouseCommand, buttons};
//!
//! let cmd = MouseCommand::new(0x1234, 0, buttons::LEFT | buttons::MIDDLE);
//! let mut buf = [0u8; 16];
//! let len = cmd.encode(&mut buf).unwrap();
//!
//! assert_eq!(&buf[..len], &[0xAA, 0x01, 0x05, 0x34, 0x12, 0x00, 0x00, 0x05, 0x51]);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//! - **`heapless`**: Enable `encode_to_vec()` methods
//! - **`embedded-io`**: Enable `encode_io()` methods for I/O peripherals
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod checksum;
pub mod command;
pub mod encode;
pub mod keymap;
pub mod packet;

pub use checksum::{checksum, Checksum};
pub use command::{
    buttons, modifiers, scale_to_absolute, KeyboardCommand, MouseCommand, ABS_MAX,
    KEYBOARD_PAYLOAD_LEN, MOUSE_PAYLOAD_LEN,
};
pub use encode::{encode_frame, Encode, EncodeError};
pub use keymap::{ascii_to_key, KeyStroke};
pub use packet::{Packet, PacketKind};

/// Frame synchronization byte.
pub const FRAME_MAGIC: u8 = 0xAA;

/// Packet type tag for absolute mouse commands.
pub const TYPE_MOUSE: u8 = 0x01;

/// Packet type tag for keyboard commands.
pub const TYPE_KEYBOARD: u8 = 0x02;

/// Capacity of the receive payload buffer; larger declared lengths are rejected.
pub const MAX_PAYLOAD_LEN: usize = 64;

/// Bytes a frame carries in addition to its payload (magic, type, length, checksum).
pub const FRAME_OVERHEAD: usize = 4;

/// Largest frame the receiver accepts.
pub const MAX_FRAME_LEN: usize = MAX_PAYLOAD_LEN + FRAME_OVERHEAD;

/// Serial link baud rate (8N1).
pub const BAUD_RATE: u32 = 115_200;
