//! UART to USB HID mouse/keyboard bridge for RP2040.
//!
//! This crate provides the embedded implementation of a bridge that reads
//! framed commands from UART and replays them as USB HID reports.

#![no_std]

// Re-export core types for convenience
pub use uart_hid_core::{
    DispatchOutcome, HidBridge, InputError, InputSource, LedPattern, OutputError, ReportSink,
    StatusEvent, StatusIndicator,
};
pub use uart_hid_proto::{KeyboardCommand, MouseCommand, BAUD_RATE};

pub mod uart_input;
pub mod usb_output;
pub mod usb_state;

pub use uart_input::{UartByteSource, RX_BUFFER_SIZE};
pub use usb_output::{configure_usb_hid, KeyboardLedHandler, UsbHidSink, MAX_REPORT_SIZE};
pub use usb_state::UsbStateHandler;
