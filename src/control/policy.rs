//! Relay threshold policy.
//!
//! Pure, total, deterministic mapping from one [`SensorReading`] to the
//! three relay levels. The thresholds are independent — fan and AC can both
//! be on above 30 °C. There is deliberately no hysteresis: the policy is
//! re-evaluated fresh every tick from the latest reading, matching the
//! reference behaviour bit for bit at the boundary values.

use crate::app::reading::{ActuatorState, SensorReading};
use crate::config::SystemConfig;

/// Threshold policy, frozen from config at construction.
#[derive(Debug, Clone, Copy)]
pub struct ActuatorPolicy {
    fan_on_above_c: f32,
    ac_on_above_c: f32,
    light_on_below_lux: f32,
}

impl ActuatorPolicy {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            fan_on_above_c: config.fan_on_above_c,
            ac_on_above_c: config.ac_on_above_c,
            light_on_below_lux: config.light_on_below_lux,
        }
    }

    /// Evaluate the policy for one reading. No side effects, no hidden state.
    pub fn evaluate(&self, reading: &SensorReading) -> ActuatorState {
        ActuatorState {
            fan_on: reading.temperature_c > self.fan_on_above_c,
            ac_on: reading.temperature_c > self.ac_on_above_c,
            light_on: reading.motion && reading.lux < self.light_on_below_lux,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ActuatorPolicy {
        ActuatorPolicy::new(&SystemConfig::default())
    }

    fn reading(temperature_c: f32, lux: f32, motion: bool) -> SensorReading {
        SensorReading {
            temperature_c,
            humidity_pct: 50.0,
            pressure_hpa: 1013.2,
            lux,
            motion,
        }
    }

    #[test]
    fn fan_and_ac_thresholds_are_independent() {
        let p = policy();
        let cool = p.evaluate(&reading(25.0, 500.0, false));
        assert!(!cool.fan_on && !cool.ac_on);

        let warm = p.evaluate(&reading(29.0, 500.0, false));
        assert!(warm.fan_on && !warm.ac_on);

        let hot = p.evaluate(&reading(31.0, 500.0, false));
        assert!(hot.fan_on && hot.ac_on, "both relays close above 30C");
    }

    #[test]
    fn boundary_values_are_exclusive() {
        let p = policy();
        // Strict > comparisons: exactly at the threshold stays off.
        assert!(!p.evaluate(&reading(28.0, 500.0, false)).fan_on);
        assert!(!p.evaluate(&reading(30.0, 500.0, false)).ac_on);
        // Strict < for lux: exactly 100 lux stays off.
        assert!(!p.evaluate(&reading(20.0, 100.0, true)).light_on);
    }

    #[test]
    fn light_requires_motion_and_darkness() {
        let p = policy();
        assert!(p.evaluate(&reading(20.0, 50.0, true)).light_on);
        assert!(!p.evaluate(&reading(20.0, 50.0, false)).light_on);
        assert!(!p.evaluate(&reading(20.0, 150.0, true)).light_on);
        assert!(!p.evaluate(&reading(20.0, 150.0, false)).light_on);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let p = policy();
        let r = reading(29.5, 80.0, true);
        assert_eq!(p.evaluate(&r), p.evaluate(&r));
    }
}
