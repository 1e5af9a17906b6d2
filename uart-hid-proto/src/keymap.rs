//! US-layout ASCII to HID keyboard usage mapping.
//!
//! Used by senders that type text through keyboard packets. Each character
//! maps to one keycode, plus left shift where the US layout needs it.

use crate::command::modifiers::LEFT_SHIFT;

/// Keyboard usage for Enter.
pub const KEY_ENTER: u8 = 0x28;
/// Keyboard usage for Tab.
pub const KEY_TAB: u8 = 0x2B;
/// Keyboard usage for Space.
pub const KEY_SPACE: u8 = 0x2C;

/// A single keycode plus the modifiers needed to produce a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyStroke {
    pub modifiers: u8,
    pub keycode: u8,
}

impl KeyStroke {
    #[must_use]
    pub const fn new(modifiers: u8, keycode: u8) -> Self {
        Self { modifiers, keycode }
    }

    const fn plain(keycode: u8) -> Self {
        Self::new(0, keycode)
    }

    const fn shifted(keycode: u8) -> Self {
        Self::new(LEFT_SHIFT, keycode)
    }
}

/// Look up the keystroke for an ASCII character.
///
/// `\r` and `\n` both map to Enter. Returns `None` for characters with no
/// key on a US layout (control characters other than tab/newline, and
/// anything outside 7-bit ASCII).
#[must_use]
pub fn ascii_to_key(ch: u8) -> Option<KeyStroke> {
    let stroke = match ch {
        b'a'..=b'z' => KeyStroke::plain(0x04 + (ch - b'a')),
        b'A'..=b'Z' => KeyStroke::shifted(0x04 + (ch - b'A')),
        b'1'..=b'9' => KeyStroke::plain(0x1E + (ch - b'1')),
        b'0' => KeyStroke::plain(0x27),
        b'\n' | b'\r' => KeyStroke::plain(KEY_ENTER),
        b'\t' => KeyStroke::plain(KEY_TAB),
        b' ' => KeyStroke::plain(KEY_SPACE),
        b'-' => KeyStroke::plain(0x2D),
        b'=' => KeyStroke::plain(0x2E),
        b'[' => KeyStroke::plain(0x2F),
        b']' => KeyStroke::plain(0x30),
        b'\\' => KeyStroke::plain(0x31),
        b';' => KeyStroke::plain(0x33),
        b'\'' => KeyStroke::plain(0x34),
        b'`' => KeyStroke::plain(0x35),
        b',' => KeyStroke::plain(0x36),
        b'.' => KeyStroke::plain(0x37),
        b'/' => KeyStroke::plain(0x38),
        b'!' => KeyStroke::shifted(0x1E),
        b'@' => KeyStroke::shifted(0x1F),
        b'#' => KeyStroke::shifted(0x20),
        b'$' => KeyStroke::shifted(0x21),
        b'%' => KeyStroke::shifted(0x22),
        b'^' => KeyStroke::shifted(0x23),
        b'&' => KeyStroke::shifted(0x24),
        b'*' => KeyStroke::shifted(0x25),
        b'(' => KeyStroke::shifted(0x26),
        b')' => KeyStroke::shifted(0x27),
        b'_' => KeyStroke::shifted(0x2D),
        b'+' => KeyStroke::shifted(0x2E),
        b'{' => KeyStroke::shifted(0x2F),
        b'}' => KeyStroke::shifted(0x30),
        b'|' => KeyStroke::shifted(0x31),
        b':' => KeyStroke::shifted(0x33),
        b'"' => KeyStroke::shifted(0x34),
        b'~' => KeyStroke::shifted(0x35),
        b'<' => KeyStroke::shifted(0x36),
        b'>' => KeyStroke::shifted(0x37),
        b'?' => KeyStroke::shifted(0x38),
        _ => return None,
    };
    Some(stroke)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        assert_eq!(ascii_to_key(b'a'), Some(KeyStroke::new(0, 0x04)));
        assert_eq!(ascii_to_key(b'z'), Some(KeyStroke::new(0, 0x1D)));
        assert_eq!(ascii_to_key(b'A'), Some(KeyStroke::new(LEFT_SHIFT, 0x04)));
        assert_eq!(ascii_to_key(b'Q'), Some(KeyStroke::new(LEFT_SHIFT, 0x14)));
    }

    #[test]
    fn test_digits() {
        assert_eq!(ascii_to_key(b'1'), Some(KeyStroke::new(0, 0x1E)));
        assert_eq!(ascii_to_key(b'9'), Some(KeyStroke::new(0, 0x26)));
        assert_eq!(ascii_to_key(b'0'), Some(KeyStroke::new(0, 0x27)));
    }

    #[test]
    fn test_shifted_digit_row() {
        assert_eq!(ascii_to_key(b'!'), Some(KeyStroke::new(LEFT_SHIFT, 0x1E)));
        assert_eq!(ascii_to_key(b')'), Some(KeyStroke::new(LEFT_SHIFT, 0x27)));
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(ascii_to_key(b'\n'), Some(KeyStroke::new(0, KEY_ENTER)));
        assert_eq!(ascii_to_key(b'\r'), Some(KeyStroke::new(0, KEY_ENTER)));
        assert_eq!(ascii_to_key(b'\t'), Some(KeyStroke::new(0, KEY_TAB)));
        assert_eq!(ascii_to_key(b' '), Some(KeyStroke::new(0, KEY_SPACE)));
    }

    #[test]
    fn test_punctuation_pairs_share_keycode() {
        for (plain, shifted) in [(b'-', b'_'), (b';', b':'), (b'/', b'?'), (b'`', b'~')] {
            let p = ascii_to_key(plain).unwrap();
            let s = ascii_to_key(shifted).unwrap();
            assert_eq!(p.keycode, s.keycode);
            assert_eq!(p.modifiers, 0);
            assert_eq!(s.modifiers, LEFT_SHIFT);
        }
    }

    #[test]
    fn test_unmapped() {
        assert_eq!(ascii_to_key(0x00), None);
        assert_eq!(ascii_to_key(0x1B), None);
        assert_eq!(ascii_to_key(0x7F), None);
        assert_eq!(ascii_to_key(0xC3), None);
    }

    #[test]
    fn test_every_printable_is_mapped() {
        for ch in 0x20u8..0x7F {
            assert!(ascii_to_key(ch).is_some(), "unmapped {:?}", ch as char);
        }
    }
}
