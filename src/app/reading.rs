//! Domain snapshots: one sampling instant and the last-applied relay levels.

/// A point-in-time snapshot of every sensor, taken atomically on one control
/// tick. Calibration offsets are already applied. Never mutated — the next
/// tick supersedes it wholesale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Indoor temperature (Celsius, calibration-adjusted).
    pub temperature_c: f32,
    /// Indoor relative humidity (percent, calibration-adjusted).
    pub humidity_pct: f32,
    /// Barometric pressure (hPa).
    pub pressure_hpa: f32,
    /// Ambient light level (lux).
    pub lux: f32,
    /// PIR motion detected.
    pub motion: bool,
}

/// Last commanded relay levels, mirroring the physical outputs.
///
/// Always the deterministic output of the policy applied to the most recent
/// reading; there is no manual override path. Written once per control tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorState {
    pub fan_on: bool,
    pub light_on: bool,
    pub ac_on: bool,
}

impl ActuatorState {
    /// All relays released — safe boot default.
    pub fn all_off() -> Self {
        Self::default()
    }
}
