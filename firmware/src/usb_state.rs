//! USB device state shared between the USB task and the bridge.
//!
//! The USB stack reports bus events through [`UsbStateHandler`], which
//! publishes them into atomics (read by the report sink before every
//! packet) and the status event channel (consumed by the LED task).

use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};
use uart_hid_core::StatusEvent;

static CONFIGURED: AtomicBool = AtomicBool::new(false);
static SUSPENDED: AtomicBool = AtomicBool::new(false);

/// Raised by the bridge, consumed by the USB task while the bus is suspended.
pub static REMOTE_WAKEUP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// State changes for the status LED task.
pub static STATUS_EVENTS: Channel<CriticalSectionRawMutex, StatusEvent, 8> = Channel::new();

/// Check if the host has configured the device.
#[inline]
pub fn is_configured() -> bool {
    CONFIGURED.load(Ordering::Relaxed)
}

/// Check if the bus is suspended.
#[inline]
pub fn is_suspended() -> bool {
    SUSPENDED.load(Ordering::Relaxed)
}

/// Check if reports can be sent: configured and not suspended.
#[inline]
pub fn is_ready() -> bool {
    is_configured() && !is_suspended()
}

/// Queue a status event without blocking; drops it if the LED task is behind.
pub fn publish(event: StatusEvent) {
    if STATUS_EVENTS.try_send(event).is_err() {
        warn!("status event dropped: {}", event);
    }
}

/// Slots kept free for USB state and CapsLock events.
const ACTIVITY_HEADROOM: usize = 4;

/// Flag serial activity; dropped silently while the LED task is behind.
pub fn publish_activity() {
    if STATUS_EVENTS.free_capacity() > ACTIVITY_HEADROOM {
        let _ = STATUS_EVENTS.try_send(StatusEvent::Activity);
    }
}

/// Bus event handler registered with the USB builder.
pub struct UsbStateHandler;

impl embassy_usb::Handler for UsbStateHandler {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            CONFIGURED.store(false, Ordering::Relaxed);
            SUSPENDED.store(false, Ordering::Relaxed);
            info!("USB disabled");
            publish(StatusEvent::Unmounted);
        }
    }

    fn reset(&mut self) {
        CONFIGURED.store(false, Ordering::Relaxed);
        info!("USB bus reset");
        publish(StatusEvent::Unmounted);
    }

    fn configured(&mut self, configured: bool) {
        CONFIGURED.store(configured, Ordering::Relaxed);
        if configured {
            info!("USB configured");
            publish(StatusEvent::Mounted);
        } else {
            info!("USB unconfigured");
            publish(StatusEvent::Unmounted);
        }
    }

    fn suspended(&mut self, suspended: bool) {
        SUSPENDED.store(suspended, Ordering::Relaxed);
        if suspended {
            info!("USB suspended");
            publish(StatusEvent::Suspended);
        } else {
            info!("USB resumed");
            publish(StatusEvent::Resumed);
        }
    }
}
