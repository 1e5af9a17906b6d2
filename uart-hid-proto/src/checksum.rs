//! 8-bit additive frame checksum.
//!
//! The checksum covers the type byte, the length byte, and every payload
//! byte, summed modulo 256. The magic byte is not included.

/// Compute the checksum for a frame with the given type and payload.
///
/// The length byte is taken from `payload.len()`, which callers keep within
/// [`MAX_PAYLOAD_LEN`](crate::MAX_PAYLOAD_LEN).
#[inline]
#[must_use]
pub fn checksum(packet_type: u8, payload: &[u8]) -> u8 {
    let mut sum = Checksum::new();
    sum.update(packet_type);
    sum.update(payload.len() as u8);
    sum.update_slice(payload);
    sum.finalize()
}

/// Running checksum for incremental calculation.
///
/// Use this when bytes arrive or are written one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksum {
    sum: u8,
}

impl Checksum {
    /// Create a new, zeroed checksum.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { sum: 0 }
    }

    /// Add a single byte.
    #[inline]
    pub fn update(&mut self, byte: u8) {
        self.sum = self.sum.wrapping_add(byte);
    }

    /// Add a byte slice.
    #[inline]
    pub fn update_slice(&mut self, data: &[u8]) {
        for &b in data {
            self.update(b);
        }
    }

    /// Return the checksum value.
    #[inline]
    #[must_use]
    pub const fn finalize(self) -> u8 {
        self.sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_empty_payload() {
        assert_eq!(checksum(0x00, &[]), 0x00);
        assert_eq!(checksum(0x02, &[]), 0x02);
    }

    #[test]
    fn test_checksum_mouse_example() {
        // 0x01 + 0x05 + 0x34 + 0x12 + 0x00 + 0x00 + 0x05
        assert_eq!(checksum(0x01, &[0x34, 0x12, 0x00, 0x00, 0x05]), 0x51);
    }

    #[test]
    fn test_checksum_wraps() {
        assert_eq!(checksum(0xFF, &[0xFF, 0xFF]), 0xFF_u8.wrapping_mul(3).wrapping_add(2));
        assert_eq!(checksum(0x80, &[0x7F]), 0x00);
    }

    #[test]
    fn test_incremental_matches_batch() {
        let payload = [0x02, 0x00, 0x04, 0x05, 0x00, 0x00, 0x00];

        let mut running = Checksum::new();
        running.update(0x02);
        running.update(payload.len() as u8);
        for &b in &payload {
            running.update(b);
        }

        assert_eq!(running.finalize(), checksum(0x02, &payload));
    }
}
