//! PIR motion input.
//!
//! The PIR output is level-based: HIGH while the sensor holds its
//! retrigger window open. The GPIO ISR mirrors every edge into an atomic
//! so the control tick reads the current level without touching the pin.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: the atomic is fed by the PIR edge ISR (seeded at boot).
//! On host/test: fed directly via `sim_set_motion()`.

use core::sync::atomic::{AtomicBool, Ordering};

static MOTION_ATOMIC: AtomicBool = AtomicBool::new(false);

/// Update the motion level from the GPIO ISR or the boot-time seed read.
/// Lock-free — safe to call from interrupt context.
pub fn set_motion_from_isr(level: bool) {
    MOTION_ATOMIC.store(level, Ordering::Release);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_motion(level: bool) {
    MOTION_ATOMIC.store(level, Ordering::Release);
}

/// Current PIR level, as last written by the ISR.
pub fn motion_present() -> bool {
    MOTION_ATOMIC.load(Ordering::Acquire)
}
