//! Byte-at-a-time frame parser with timeout resynchronization.
//!
//! The parser consumes one byte per call and hands back a [`Packet`] once a
//! complete frame has passed its checksum. Every failure (bad magic,
//! oversize length, checksum mismatch, stale frame) silently drops the
//! in-flight frame and returns to [`ParserStage::AwaitingMagic`].
//!
//! # Timeout
//!
//! A single deadline, [`FRAME_TIMEOUT`] after the most recent header byte,
//! covers the whole frame. Payload bytes do not extend it. Once the deadline
//! is reached the next [`FrameParser::poll_timeout`] call abandons the frame.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use uart_hid_proto::{checksum, Packet, FRAME_MAGIC, MAX_PAYLOAD_LEN};

/// How long a frame may take from its last header byte to its checksum.
pub const FRAME_TIMEOUT: Duration = Duration::from_millis(100);

/// Parser stages, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParserStage {
    AwaitingMagic,
    AwaitingType,
    AwaitingLength,
    AwaitingPayload,
    AwaitingChecksum,
}

/// Saturating counters of parser outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParserStats {
    /// Frames that passed the checksum.
    pub packets: u32,
    /// Frames dropped on checksum mismatch.
    pub checksum_errors: u32,
    /// Frames dropped because the declared length exceeded the buffer.
    pub oversize: u32,
    /// Frames abandoned by the timeout.
    pub timeouts: u32,
}

/// Frame parser state machine.
///
/// Owns the in-flight frame: declared type, declared length, and a bounded
/// payload buffer. Nothing is allocated.
#[derive(Debug)]
pub struct FrameParser {
    stage: ParserStage,
    packet_type: u8,
    declared_len: u8,
    payload: Vec<u8, MAX_PAYLOAD_LEN>,
    deadline: Option<Instant>,
    stats: ParserStats,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a parser waiting for a magic byte.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: ParserStage::AwaitingMagic,
            packet_type: 0,
            declared_len: 0,
            payload: Vec::new(),
            deadline: None,
            stats: ParserStats {
                packets: 0,
                checksum_errors: 0,
                oversize: 0,
                timeouts: 0,
            },
        }
    }

    /// Current stage.
    #[inline]
    #[must_use]
    pub fn stage(&self) -> ParserStage {
        self.stage
    }

    /// Deadline of the in-flight frame, or `None` when idle.
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Outcome counters since creation.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Drop any in-flight frame and wait for the next magic byte.
    pub fn reset(&mut self) {
        self.stage = ParserStage::AwaitingMagic;
        self.declared_len = 0;
        self.payload.clear();
        self.deadline = None;
    }

    /// Abandon the in-flight frame once `now` is past its deadline.
    ///
    /// Returns `true` if a frame was dropped.
    pub fn poll_timeout(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if self.stage != ParserStage::AwaitingMagic && now > deadline => {
                trace!("frame timed out in {}", self.stage);
                self.stats.timeouts = self.stats.timeouts.saturating_add(1);
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Feed one byte received at `now`.
    ///
    /// Returns the packet when `byte` completes a frame with a matching
    /// checksum. The packet borrows the parser's buffer.
    pub fn push_byte(&mut self, byte: u8, now: Instant) -> Option<Packet<'_>> {
        match self.stage {
            ParserStage::AwaitingMagic => {
                if byte == FRAME_MAGIC {
                    self.stage = ParserStage::AwaitingType;
                    self.arm(now);
                }
            }
            ParserStage::AwaitingType => {
                self.packet_type = byte;
                self.stage = ParserStage::AwaitingLength;
                self.arm(now);
            }
            ParserStage::AwaitingLength => {
                if usize::from(byte) > MAX_PAYLOAD_LEN {
                    trace!("declared length {} too large", byte);
                    self.stats.oversize = self.stats.oversize.saturating_add(1);
                    self.reset();
                    return None;
                }
                self.declared_len = byte;
                self.payload.clear();
                self.stage = if byte == 0 {
                    ParserStage::AwaitingChecksum
                } else {
                    ParserStage::AwaitingPayload
                };
                self.arm(now);
            }
            ParserStage::AwaitingPayload => {
                // Declared length was bounded by capacity above.
                if self.payload.push(byte).is_err() {
                    self.reset();
                    return None;
                }
                if self.payload.len() == usize::from(self.declared_len) {
                    self.stage = ParserStage::AwaitingChecksum;
                }
            }
            ParserStage::AwaitingChecksum => {
                self.stage = ParserStage::AwaitingMagic;
                self.deadline = None;

                let expected = checksum(self.packet_type, &self.payload);
                if byte != expected {
                    trace!("checksum mismatch: got {=u8:#x}, expected {=u8:#x}", byte, expected);
                    self.stats.checksum_errors = self.stats.checksum_errors.saturating_add(1);
                    return None;
                }

                self.stats.packets = self.stats.packets.saturating_add(1);
                return Some(Packet::new(self.packet_type, &self.payload));
            }
        }
        None
    }

    fn arm(&mut self, now: Instant) {
        self.deadline = now.checked_add(FRAME_TIMEOUT);
    }
}
