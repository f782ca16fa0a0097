//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (sensors, relays, display, WiFi, event sinks) implement
//! these traits. The [`ControlService`](super::service::ControlService)
//! consumes them via generics, so the domain core never touches hardware
//! directly and every test can substitute a mock.

use crate::error::{NetError, SensorError};
use crate::render::Frame;

use super::events::AppEvent;
use super::reading::SensorReading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per control tick.
pub trait SensorPort {
    /// Read every sensor and return one atomic snapshot.
    ///
    /// A failed read means the tick carries no reading at all — a garbage
    /// value must never masquerade as a valid extreme.
    fn read_all(&mut self) -> Result<SensorReading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → relays)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain commands logical relay levels. The active-low
/// line polarity is a driver detail behind this boundary.
pub trait ActuatorPort {
    fn set_fan(&mut self, on: bool);
    fn set_light(&mut self, on: bool);
    fn set_ac(&mut self, on: bool);

    /// Release every relay — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → OLED)
// ───────────────────────────────────────────────────────────────

/// The domain hands a composed [`Frame`] to this port once per control tick.
/// Drawing is synchronous and has no steady-state error channel; only init
/// can fail (fatal, handled at boot).
pub trait DisplayPort {
    fn draw(&mut self, frame: &Frame);
}

// ───────────────────────────────────────────────────────────────
// Network port (driven adapter: domain ↔ WiFi + HTTP)
// ───────────────────────────────────────────────────────────────

/// Body + status of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Station-mode connectivity and a bounded HTTP GET.
///
/// Each call is one bounded network operation — the platform stack's own
/// timeout is the only timeout layer. The caller (ConnectivityManager)
/// guarantees at most one call per refresh period.
pub trait NetworkPort {
    /// Issue a single bounded connect attempt.
    fn connect(&mut self) -> Result<(), NetError>;

    /// Whether the station currently holds a link.
    fn is_connected(&self) -> bool;

    /// Perform one HTTP GET against `url`.
    fn http_get(&mut self, url: &str) -> Result<HttpResponse, NetError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port. Adapters
/// decide where they go (serial log, future MQTT, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Cadence delegate (decouples scheduler from event system)
// ───────────────────────────────────────────────────────────────

/// Callback trait the scheduler invokes when a cadence timer comes due.
///
/// This decouples the [`Scheduler`](crate::scheduler::Scheduler) from the
/// ISR event queue. The main loop implements it by forwarding to
/// [`push_event`](crate::events::push_event); the scheduler itself knows
/// nothing about events, queues, or ISRs.
pub trait CadenceDelegate {
    fn on_cadence_due(&mut self, cadence: Cadence);
}

/// Which timing domain fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Fast local loop: sample → policy → relays → render.
    Control,
    /// Slow network loop: connect / weather-fetch attempt.
    Refresh,
}
