//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) and the refresh
//! path emit these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them — log to serial,
//! publish upstream, etc.

use crate::error::SensorError;
use crate::net::AttemptOutcome;

use super::reading::ActuatorState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The control service has started.
    Started,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The policy changed at least one relay level.
    ActuatorsChanged {
        from: ActuatorState,
        to: ActuatorState,
    },

    /// A steady-state sensor read failed; the tick was skipped.
    SensorReadFailed(SensorError),

    /// A refresh-cadence attempt completed (any outcome).
    RefreshAttempt(AttemptOutcome),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub pressure_hpa: f32,
    pub lux: f32,
    pub motion: bool,
    pub fan_on: bool,
    pub light_on: bool,
    pub ac_on: bool,
    pub connected: bool,
    /// Milliseconds since the last successful weather fetch, if any.
    pub weather_age_ms: Option<u64>,
}
