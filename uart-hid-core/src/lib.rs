//! Platform-agnostic frame parsing and HID report dispatch.
//!
//! This crate turns a stream of serial bytes into USB HID reports without
//! any platform-specific dependencies. It can be used both in embedded
//! `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! - [`parser`]: Byte-at-a-time frame parser with timeout resync ([`FrameParser`])
//! - [`dispatch`]: Turns validated packets into HID reports ([`Dispatcher`])
//! - [`input`]: Serial byte source trait ([`InputSource`])
//! - [`output`]: HID report sink trait ([`ReportSink`])
//! - [`bridge`]: Orchestrates input-to-output flow ([`HidBridge`])
//! - [`status`]: Status LED policy driven by USB state ([`StatusIndicator`])
//!
//! # Example
//!
//! ```rust
//! use embassy_time::Instant;
//! use uart_hid_core::FrameParser;
//!
//! let mut parser = FrameParser::new();
//! let now = Instant::from_millis(0);
//!
//! let frame = [0xAA, 0x01, 0x05, 0x34, 0x12, 0x00, 0x00, 0x05, 0x51];
//! let (last, head) = frame.split_last().unwrap();
//! for &byte in head {
//!     assert!(parser.push_byte(byte, now).is_none());
//! }
//!
//! let packet = parser.push_byte(*last, now).unwrap();
//! assert_eq!(packet.mouse().unwrap().x, 0x1234);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and log output (for embedded logging)

#![cfg_attr(not(any(test, feature = "std")), no_std)]

// This must go first so the macros are visible to the other modules.
#[macro_use]
mod fmt;

pub mod bridge;
pub mod dispatch;
pub mod input;
pub mod output;
pub mod parser;
pub mod status;

pub use bridge::{HidBridge, RX_CHUNK_LEN};
pub use dispatch::{DispatchOutcome, Dispatcher, MOUSE_BURST_COUNT, MOUSE_BURST_SPACING_MS};
pub use input::{InputError, InputSource};
pub use output::{OutputError, ReportSink};
pub use parser::{FrameParser, ParserStage, ParserStats, FRAME_TIMEOUT};
pub use status::{
    caps_lock_event, LedPattern, StatusEvent, StatusIndicator, BLINK_MOUNTED, BLINK_NOT_MOUNTED,
    BLINK_SUSPENDED, LED_CAPS_LOCK,
};

pub use uart_hid_proto::{KeyboardCommand, MouseCommand, Packet, PacketKind};
