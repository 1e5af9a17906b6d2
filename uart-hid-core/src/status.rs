//! Status LED policy.
//!
//! The LED blinks at a rate that reflects the USB state. The host's
//! CapsLock indicator overrides the blink and holds the LED on.
//!
//! | State       | Pattern          |
//! |-------------|------------------|
//! | Not mounted | 250 ms blink     |
//! | Mounted     | 1000 ms blink    |
//! | Suspended   | 2500 ms blink    |
//! | CapsLock on | solid on         |
//!
//! Received serial data flips a blinking LED once per chunk.

use embassy_time::{Duration, Instant};

/// Blink interval while the device is not enumerated.
pub const BLINK_NOT_MOUNTED: Duration = Duration::from_millis(250);
/// Blink interval while the device is configured.
pub const BLINK_MOUNTED: Duration = Duration::from_millis(1000);
/// Blink interval while the bus is suspended.
pub const BLINK_SUSPENDED: Duration = Duration::from_millis(2500);

/// CapsLock bit in the keyboard LED output report.
pub const LED_CAPS_LOCK: u8 = 1 << 1;

/// Decode a keyboard LED output report.
///
/// Hosts send the bitmap either alone or behind its report ID, depending on
/// whether it arrives on the control pipe or the OUT endpoint. Every decoded
/// report yields an event, repeats included.
#[must_use]
pub fn caps_lock_event(report_id: u8, data: &[u8]) -> Option<StatusEvent> {
    let leds = match data {
        [id, leds, ..] if *id == report_id => *leds,
        [leds] => *leds,
        _ => return None,
    };
    Some(StatusEvent::CapsLock(leds & LED_CAPS_LOCK != 0))
}

/// USB and host-indicator changes that affect the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusEvent {
    Mounted,
    Unmounted,
    Suspended,
    Resumed,
    /// Host keyboard LED report; `true` when CapsLock is lit.
    CapsLock(bool),
    /// Serial data arrived.
    Activity,
}

/// What the LED should be doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedPattern {
    Blink(Duration),
    Solid,
}

/// LED state machine.
///
/// Feed it [`StatusEvent`]s and call [`poll`](Self::poll) with the current
/// time to get the LED level.
#[derive(Debug)]
pub struct StatusIndicator {
    pattern: LedPattern,
    mounted: bool,
    level: bool,
    last_toggle: Instant,
}

impl StatusIndicator {
    /// Start in the not-mounted pattern with the LED off.
    #[must_use]
    pub const fn new(now: Instant) -> Self {
        Self {
            pattern: LedPattern::Blink(BLINK_NOT_MOUNTED),
            mounted: false,
            level: false,
            last_toggle: now,
        }
    }

    /// Current pattern.
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> LedPattern {
        self.pattern
    }

    /// Current LED level.
    #[inline]
    #[must_use]
    pub fn level(&self) -> bool {
        self.level
    }

    /// Apply a state change.
    pub fn apply(&mut self, event: StatusEvent) {
        self.pattern = match event {
            StatusEvent::Mounted => {
                self.mounted = true;
                LedPattern::Blink(BLINK_MOUNTED)
            }
            StatusEvent::Unmounted => {
                self.mounted = false;
                LedPattern::Blink(BLINK_NOT_MOUNTED)
            }
            StatusEvent::Suspended => LedPattern::Blink(BLINK_SUSPENDED),
            StatusEvent::Resumed if self.mounted => LedPattern::Blink(BLINK_MOUNTED),
            StatusEvent::Resumed => LedPattern::Blink(BLINK_NOT_MOUNTED),
            StatusEvent::CapsLock(true) => {
                self.level = true;
                LedPattern::Solid
            }
            StatusEvent::CapsLock(false) => {
                self.level = false;
                LedPattern::Blink(BLINK_MOUNTED)
            }
            StatusEvent::Activity => {
                if let LedPattern::Blink(_) = self.pattern {
                    self.level = !self.level;
                }
                self.pattern
            }
        };
    }

    /// Advance the blink and return the LED level for `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pattern {
            LedPattern::Solid => {
                self.last_toggle = now;
            }
            LedPattern::Blink(interval) => {
                if now.saturating_duration_since(self.last_toggle) >= interval {
                    self.level = !self.level;
                    // Step by the interval so late polls don't stretch the cadence.
                    self.last_toggle = self.last_toggle.checked_add(interval).unwrap_or(now);
                }
            }
        }
        self.level
    }

    /// When the LED next needs attention, or `None` while it is solid.
    #[must_use]
    pub fn next_toggle(&self) -> Option<Instant> {
        match self.pattern {
            LedPattern::Solid => None,
            LedPattern::Blink(interval) => self.last_toggle.checked_add(interval),
        }
    }
}
