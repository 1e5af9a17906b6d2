//! USB HID keyboard + absolute mouse output implementation.

use defmt::{debug, Format};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::driver::EndpointError;
use embassy_usb::Builder;
use uart_hid_core::{caps_lock_event, OutputError, ReportSink};
use uart_hid_proto::{buttons, KeyboardCommand, MouseCommand};

use crate::usb_state;

/// Report ID of the keyboard input report and its LED output report.
pub const REPORT_ID_KEYBOARD: u8 = 1;
/// Report ID of the absolute mouse input report.
pub const REPORT_ID_MOUSE: u8 = 2;

/// Largest input report, including the report ID byte.
pub const MAX_REPORT_SIZE: usize = KeyboardReport::SIZE;

/// Interrupt IN endpoint size.
const EP_PACKET_SIZE: u16 = 16;

/// Host polling interval.
const POLL_MS: u8 = 5;

type UsbDriver<'d> = Driver<'d, USB>;

/// Keyboard input report (report ID 1).
///
/// Layout: `[id, modifiers, reserved, key1..key6]`, 9 bytes.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Format)]
pub struct KeyboardReport {
    pub modifiers: u8,
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// Size of the report in bytes, including the report ID.
    pub const SIZE: usize = 9;

    /// Convert the report to bytes.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let k = self.keycodes;
        [
            REPORT_ID_KEYBOARD,
            self.modifiers,
            0,
            k[0],
            k[1],
            k[2],
            k[3],
            k[4],
            k[5],
        ]
    }
}

impl From<&KeyboardCommand> for KeyboardReport {
    fn from(cmd: &KeyboardCommand) -> Self {
        Self {
            modifiers: cmd.modifiers,
            keycodes: cmd.keycodes,
        }
    }
}

/// Absolute mouse input report (report ID 2).
///
/// Layout: `[id, buttons, x_lo, x_hi, y_lo, y_hi]`, 6 bytes.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Format)]
pub struct AbsMouseReport {
    /// Button bitfield (3 buttons)
    pub buttons: u8,
    /// X position (0 to 32767)
    pub x: u16,
    /// Y position (0 to 32767)
    pub y: u16,
}

impl AbsMouseReport {
    /// Size of the report in bytes, including the report ID.
    pub const SIZE: usize = 6;

    /// Convert the report to bytes.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let [x_lo, x_hi] = self.x.to_le_bytes();
        let [y_lo, y_hi] = self.y.to_le_bytes();
        [REPORT_ID_MOUSE, self.buttons, x_lo, x_hi, y_lo, y_hi]
    }
}

impl From<&MouseCommand> for AbsMouseReport {
    fn from(cmd: &MouseCommand) -> Self {
        Self {
            // Padding bits must stay zero.
            buttons: cmd.buttons & buttons::MASK,
            x: cmd.x,
            y: cmd.y,
        }
    }
}

/// HID report descriptor: boot-style keyboard with LED output report
/// (ID 1) followed by a 3-button absolute pointer (ID 2).
pub const REPORT_DESCRIPTOR: &[u8] = &[
    // --- Keyboard ---
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    0x85, REPORT_ID_KEYBOARD, //   Report ID (1)
    //
    // Modifiers (8 bits)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x08, //   Report Count (8)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // Reserved byte
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant)
    //
    // LEDs (5 bits + 3 padding)
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant)
    //
    // Keycodes (6 bytes)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x2A, 0xFF, 0x00, //   Usage Maximum (255)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x00, //   Input (Data, Array, Absolute)
    0xC0, // End Collection
    //
    // --- Absolute mouse ---
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x85, REPORT_ID_MOUSE, //   Report ID (2)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    //
    // Buttons (3 bits + 5 padding)
    0x05, 0x09, //     Usage Page (Button)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x03, //     Usage Maximum (Button 3)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x03, //     Report Count (3)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x05, //     Report Size (5)
    0x81, 0x03, //     Input (Constant, Variable, Absolute)
    //
    // X/Y (16-bit absolute)
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x15, 0x00, //     Logical Minimum (0)
    0x26, 0xFF, 0x7F, //     Logical Maximum (32767)
    0x75, 0x10, //     Report Size (16)
    0x95, 0x02, //     Report Count (2)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0xC0, //   End Collection
    0xC0, // End Collection
];

/// USB HID report sink.
///
/// Wraps an embassy-usb HID writer. Readiness and suspension come from
/// [`usb_state`], which the USB task keeps current.
pub struct UsbHidSink<'d> {
    writer: HidWriter<'d, UsbDriver<'d>, MAX_REPORT_SIZE>,
}

impl<'d> UsbHidSink<'d> {
    /// Create a new sink from the given HID writer.
    pub fn new(writer: HidWriter<'d, UsbDriver<'d>, MAX_REPORT_SIZE>) -> Self {
        Self { writer }
    }

    async fn write(&mut self, report: &[u8]) -> Result<(), OutputError> {
        // The bus can suspend between reports of a mouse burst.
        if !usb_state::is_ready() {
            return Err(OutputError::NotReady);
        }
        self.writer.write(report).await.map_err(|e| match e {
            EndpointError::Disabled => OutputError::Disabled,
            _ => OutputError::Io,
        })
    }
}

impl<'d> ReportSink for UsbHidSink<'d> {
    async fn send_mouse(&mut self, cmd: &MouseCommand) -> Result<(), OutputError> {
        let report = AbsMouseReport::from(cmd);
        self.write(&report.as_bytes()).await
    }

    async fn send_keyboard(&mut self, cmd: &KeyboardCommand) -> Result<(), OutputError> {
        let report = KeyboardReport::from(cmd);
        self.write(&report.as_bytes()).await
    }

    fn is_ready(&self) -> bool {
        usb_state::is_ready()
    }

    fn is_suspended(&self) -> bool {
        usb_state::is_suspended()
    }

    fn request_remote_wakeup(&mut self) {
        usb_state::REMOTE_WAKEUP.signal(());
    }
}

/// HID request handler.
///
/// Forwards every keyboard LED output report to the status LED. Hosts
/// re-send their LED state after enumeration and resume, so repeats matter.
pub struct KeyboardLedHandler;

impl KeyboardLedHandler {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for KeyboardLedHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestHandler for KeyboardLedHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        if let ReportId::Out(REPORT_ID_KEYBOARD) = id {
            if let Some(event) = caps_lock_event(REPORT_ID_KEYBOARD, data) {
                debug!("keyboard LEDs: {}", event);
                usb_state::publish(event);
            }
        }
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Returns the HID writer for use by the application.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
    request_handler: &'d mut KeyboardLedHandler,
) -> HidWriter<'d, UsbDriver<'d>, MAX_REPORT_SIZE> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: Some(request_handler),
        poll_ms: POLL_MS,
        max_packet_size: EP_PACKET_SIZE,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}
