//! Mouse and keyboard commands carried in packet payloads.

use crate::keymap::KeyStroke;

/// Minimum payload length of a mouse packet.
pub const MOUSE_PAYLOAD_LEN: usize = 5;

/// Minimum payload length of a keyboard packet.
pub const KEYBOARD_PAYLOAD_LEN: usize = 7;

/// Upper bound of the absolute pointer's logical range on both axes.
pub const ABS_MAX: u16 = 32767;

/// Mouse button bits.
pub mod buttons {
    pub const LEFT: u8 = 1 << 0;
    pub const RIGHT: u8 = 1 << 1;
    pub const MIDDLE: u8 = 1 << 2;

    /// Bits the report descriptor actually exposes.
    pub const MASK: u8 = LEFT | RIGHT | MIDDLE;
}

/// Keyboard modifier bits (HID usage page 0x07, 0xE0..=0xE7).
pub mod modifiers {
    pub const LEFT_CTRL: u8 = 1 << 0;
    pub const LEFT_SHIFT: u8 = 1 << 1;
    pub const LEFT_ALT: u8 = 1 << 2;
    pub const LEFT_GUI: u8 = 1 << 3;
    pub const RIGHT_CTRL: u8 = 1 << 4;
    pub const RIGHT_SHIFT: u8 = 1 << 5;
    pub const RIGHT_ALT: u8 = 1 << 6;
    pub const RIGHT_GUI: u8 = 1 << 7;
}

/// Absolute pointer position plus button state.
///
/// Coordinates are in the device's logical `0..=32767` range. Values above
/// [`ABS_MAX`] are passed through unchanged; the host clamps them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseCommand {
    pub x: u16,
    pub y: u16,
    /// Button bitmask, see [`buttons`].
    pub buttons: u8,
}

impl MouseCommand {
    #[must_use]
    pub const fn new(x: u16, y: u16, buttons: u8) -> Self {
        Self { x, y, buttons }
    }

    /// Decode from a payload of at least [`MOUSE_PAYLOAD_LEN`] bytes.
    ///
    /// Trailing bytes are ignored.
    #[must_use]
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        if payload.len() < MOUSE_PAYLOAD_LEN {
            return None;
        }
        Some(Self {
            x: u16::from_le_bytes([payload[0], payload[1]]),
            y: u16::from_le_bytes([payload[2], payload[3]]),
            buttons: payload[4],
        })
    }

    /// Payload bytes: `x_lo, x_hi, y_lo, y_hi, buttons`.
    #[must_use]
    pub fn to_payload(&self) -> [u8; MOUSE_PAYLOAD_LEN] {
        let [x_lo, x_hi] = self.x.to_le_bytes();
        let [y_lo, y_hi] = self.y.to_le_bytes();
        [x_lo, x_hi, y_lo, y_hi, self.buttons]
    }

    /// Same position with a different button state.
    #[must_use]
    pub const fn with_buttons(self, buttons: u8) -> Self {
        Self { buttons, ..self }
    }
}

/// Modifier byte plus up to six simultaneously pressed keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardCommand {
    /// Modifier bitmask, see [`modifiers`].
    pub modifiers: u8,
    /// HID usage codes; `0` means no key in that slot.
    pub keycodes: [u8; 6],
}

impl KeyboardCommand {
    #[must_use]
    pub const fn new(modifiers: u8, keycodes: [u8; 6]) -> Self {
        Self {
            modifiers,
            keycodes,
        }
    }

    /// All keys and modifiers released.
    #[must_use]
    pub const fn release() -> Self {
        Self {
            modifiers: 0,
            keycodes: [0; 6],
        }
    }

    /// A single key press, with its modifiers, in the first slot.
    #[must_use]
    pub const fn press(stroke: KeyStroke) -> Self {
        Self {
            modifiers: stroke.modifiers,
            keycodes: [stroke.keycode, 0, 0, 0, 0, 0],
        }
    }

    /// Decode from a payload of at least [`KEYBOARD_PAYLOAD_LEN`] bytes.
    #[must_use]
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        if payload.len() < KEYBOARD_PAYLOAD_LEN {
            return None;
        }
        let mut keycodes = [0u8; 6];
        keycodes.copy_from_slice(&payload[1..KEYBOARD_PAYLOAD_LEN]);
        Some(Self {
            modifiers: payload[0],
            keycodes,
        })
    }

    /// Payload bytes: `modifiers, key1..key6`.
    #[must_use]
    pub fn to_payload(&self) -> [u8; KEYBOARD_PAYLOAD_LEN] {
        let mut out = [0u8; KEYBOARD_PAYLOAD_LEN];
        out[0] = self.modifiers;
        out[1..].copy_from_slice(&self.keycodes);
        out
    }

    /// Check if nothing is pressed.
    #[inline]
    #[must_use]
    pub fn is_release(&self) -> bool {
        self.modifiers == 0 && self.keycodes.iter().all(|&k| k == 0)
    }
}

/// Map a screen coordinate onto the absolute pointer range.
///
/// `position` is clamped to `0..=max_position` and scaled to
/// `0..=ABS_MAX`, rounding to nearest. `max_position` is the largest valid
/// pixel index (screen width or height minus one).
#[must_use]
pub fn scale_to_absolute(position: u32, max_position: u32) -> u16 {
    if max_position == 0 {
        return 0;
    }
    let position = u64::from(position.min(max_position));
    let max_position = u64::from(max_position);
    let scaled = (position * u64::from(ABS_MAX) + max_position / 2) / max_position;
    scaled as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_from_payload() {
        let cmd = MouseCommand::from_payload(&[0x34, 0x12, 0x00, 0x00, 0x05]).unwrap();
        assert_eq!(cmd.x, 0x1234);
        assert_eq!(cmd.y, 0);
        assert_eq!(cmd.buttons, buttons::LEFT | buttons::MIDDLE);
    }

    #[test]
    fn test_mouse_payload_too_short() {
        assert_eq!(MouseCommand::from_payload(&[]), None);
        assert_eq!(MouseCommand::from_payload(&[0x34, 0x12, 0x00, 0x00]), None);
    }

    #[test]
    fn test_mouse_ignores_trailing_bytes() {
        let cmd = MouseCommand::from_payload(&[0xFF, 0x7F, 0x01, 0x00, 0x02, 0xEE, 0xEE]).unwrap();
        assert_eq!(cmd, MouseCommand::new(ABS_MAX, 1, buttons::RIGHT));
    }

    #[test]
    fn test_mouse_to_payload() {
        let cmd = MouseCommand::new(0x1234, 0x5678, buttons::LEFT);
        assert_eq!(cmd.to_payload(), [0x34, 0x12, 0x78, 0x56, 0x01]);
        assert_eq!(MouseCommand::from_payload(&cmd.to_payload()), Some(cmd));
    }

    #[test]
    fn test_mouse_with_buttons() {
        let cmd = MouseCommand::new(100, 200, 0).with_buttons(buttons::RIGHT);
        assert_eq!(cmd, MouseCommand::new(100, 200, buttons::RIGHT));
    }

    #[test]
    fn test_keyboard_from_payload() {
        let cmd =
            KeyboardCommand::from_payload(&[modifiers::LEFT_SHIFT, 0x04, 0x05, 0, 0, 0, 0]).unwrap();
        assert_eq!(cmd.modifiers, modifiers::LEFT_SHIFT);
        assert_eq!(cmd.keycodes, [0x04, 0x05, 0, 0, 0, 0]);
    }

    #[test]
    fn test_keyboard_payload_too_short() {
        assert_eq!(KeyboardCommand::from_payload(&[0; 6]), None);
    }

    #[test]
    fn test_keyboard_six_key_rollover() {
        let payload = [0x00, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        let cmd = KeyboardCommand::from_payload(&payload).unwrap();
        assert_eq!(cmd.keycodes, [0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);
        assert_eq!(cmd.to_payload(), payload);
    }

    #[test]
    fn test_keyboard_press_and_release() {
        let press = KeyboardCommand::press(KeyStroke::new(modifiers::LEFT_SHIFT, 0x04));
        assert_eq!(press.keycodes, [0x04, 0, 0, 0, 0, 0]);
        assert!(!press.is_release());
        assert!(KeyboardCommand::release().is_release());
    }

    #[test]
    fn test_scale_to_absolute_endpoints() {
        assert_eq!(scale_to_absolute(0, 1919), 0);
        assert_eq!(scale_to_absolute(1919, 1919), ABS_MAX);
    }

    #[test]
    fn test_scale_to_absolute_clamps() {
        assert_eq!(scale_to_absolute(5000, 1079), ABS_MAX);
        assert_eq!(scale_to_absolute(10, 0), 0);
    }

    #[test]
    fn test_scale_to_absolute_rounds() {
        // 5 * 32767 / 1919 = 85.37...
        assert_eq!(scale_to_absolute(5, 1919), 85);
        // 480 * 32767 / 1079 = 14576.6...
        assert_eq!(scale_to_absolute(480, 1079), 14577);
    }
}
