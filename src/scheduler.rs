//! Two-timer cadence engine.
//!
//! Coordinates the fast control cadence and the slow refresh cadence from a
//! single hot loop with no sleeps. Due-ness is a comparison against a
//! monotonic millisecond clock, never a wait — `tick()` may be called at any
//! rate above the cadence periods and both domains stay independent.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      hot loop                           │
//! │                                                         │
//! │   every iteration ──▶ Scheduler::tick(now)              │
//! │        control due? ──▶ delegate(Cadence::Control)      │
//! │        refresh due? ──▶ delegate(Cadence::Refresh)      │
//! │                                                         │
//! │   (main loop pushes the notifications into the          │
//! │    event queue; both may fire on the same call)         │
//! └─────────────────────────────────────────────────────────┘
//! ```

use log::debug;

use crate::app::ports::{Cadence, CadenceDelegate};
use crate::config::SystemConfig;

// ═══════════════════════════════════════════════════════════════
//  Period timer
// ═══════════════════════════════════════════════════════════════

/// One monotonic period timer. Due when `now - last_fired >= period`.
#[derive(Debug, Clone, Copy)]
pub struct PeriodTimer {
    period_ms: u64,
    last_fired_ms: u64,
}

impl PeriodTimer {
    pub fn new(period_ms: u64, now_ms: u64) -> Self {
        Self {
            period_ms,
            last_fired_ms: now_ms,
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_fired_ms) >= self.period_ms
    }

    /// Anchor the next window at `now_ms`. Called on every firing,
    /// independent of what the fired work achieved.
    pub fn reset(&mut self, now_ms: u64) {
        self.last_fired_ms = now_ms;
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// The two-cadence scheduler.
///
/// Intentionally decoupled from the event system: when a cadence comes due
/// it invokes the [`CadenceDelegate`] callback rather than pushing events
/// directly, which keeps it independently testable.
pub struct Scheduler {
    control: PeriodTimer,
    refresh: PeriodTimer,
}

impl Scheduler {
    pub fn new(config: &SystemConfig, now_ms: u64) -> Self {
        debug!(
            "scheduler: control={}ms refresh={}ms",
            config.control_period_ms, config.refresh_period_ms
        );
        Self {
            control: PeriodTimer::new(config.control_period_ms, now_ms),
            refresh: PeriodTimer::new(config.refresh_period_ms, now_ms),
        }
    }

    /// Tick the scheduler. Call once per hot-loop iteration.
    ///
    /// Both timers are checked on every call and may both fire on the same
    /// call; neither check blocks. Each timer resets to `now_ms` when it
    /// fires — the refresh window is consumed whether the network attempt
    /// succeeds, fails, or merely starts a connect, so a failing endpoint
    /// can never turn into a busy retry storm.
    pub fn tick(&mut self, now_ms: u64, delegate: &mut dyn CadenceDelegate) {
        if self.control.is_due(now_ms) {
            self.control.reset(now_ms);
            delegate.on_cadence_due(Cadence::Control);
        }
        if self.refresh.is_due(now_ms) {
            self.refresh.reset(now_ms);
            delegate.on_cadence_due(Cadence::Refresh);
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
