//! Property tests for the relay policy, weather cache, and cadence timers.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;
use roomsense::app::reading::SensorReading;
use roomsense::config::SystemConfig;
use roomsense::control::policy::ActuatorPolicy;
use roomsense::scheduler::PeriodTimer;
use roomsense::weather::{OutdoorReading, WeatherCache};

fn arb_reading() -> impl Strategy<Value = SensorReading> {
    (
        -40.0f32..85.0,
        0.0f32..100.0,
        300.0f32..1100.0,
        0.0f32..65_535.0,
        any::<bool>(),
    )
        .prop_map(|(temperature_c, humidity_pct, pressure_hpa, lux, motion)| {
            SensorReading {
                temperature_c,
                humidity_pct,
                pressure_hpa,
                lux,
                motion,
            }
        })
}

proptest! {
    /// Each relay decision is exactly its threshold predicate — no
    /// hysteresis, no coupling between channels.
    #[test]
    fn relay_state_equals_threshold_predicates(reading in arb_reading()) {
        let policy = ActuatorPolicy::new(&SystemConfig::default());
        let state = policy.evaluate(&reading);

        prop_assert_eq!(state.fan_on, reading.temperature_c > 28.0);
        prop_assert_eq!(state.ac_on, reading.temperature_c > 30.0);
        prop_assert_eq!(state.light_on, reading.motion && reading.lux < 100.0);
    }

    /// AC running implies the fan is running (30.0 > 28.0), for any input.
    #[test]
    fn ac_never_runs_without_the_fan(reading in arb_reading()) {
        let policy = ActuatorPolicy::new(&SystemConfig::default());
        let state = policy.evaluate(&reading);
        prop_assert!(!state.ac_on || state.fan_on);
    }

    /// Evaluation is pure: the same reading always yields the same state.
    #[test]
    fn policy_is_deterministic(reading in arb_reading()) {
        let policy = ActuatorPolicy::new(&SystemConfig::default());
        prop_assert_eq!(policy.evaluate(&reading), policy.evaluate(&reading));
    }

    /// Attempt stamps never disturb cached outdoor data, whatever the
    /// interleaving of successes and failures.
    #[test]
    fn failed_attempts_never_corrupt_the_cache(
        stamps in proptest::collection::vec(0u64..1_000_000, 1..20),
        temp_c in -50.0f32..50.0,
        humidity in 0.0f32..100.0,
    ) {
        let mut cache = WeatherCache::new();
        cache.store(OutdoorReading { temp_c, humidity_pct: humidity }, 0);

        for &now in &stamps {
            cache.record_attempt(now);
        }

        prop_assert!(cache.is_valid());
        let (t, h) = cache.outdoor().expect("cache stays valid");
        prop_assert_eq!(t, temp_c);
        prop_assert_eq!(h, humidity);
    }

    /// Polling a period timer at any jittery rate fires at most once per
    /// window: after a firing, the timer is not due again until a full
    /// period has elapsed.
    #[test]
    fn period_timer_fires_at_most_once_per_window(
        period in 1u64..100_000,
        deltas in proptest::collection::vec(1u64..500, 1..200),
    ) {
        let mut timer = PeriodTimer::new(period, 0);
        let mut now = 0u64;
        let mut last_fire: Option<u64> = None;

        for delta in deltas {
            now += delta;
            if timer.is_due(now) {
                if let Some(prev) = last_fire {
                    prop_assert!(
                        now - prev >= period,
                        "fired {} ms after the previous firing (period {})",
                        now - prev,
                        period
                    );
                }
                timer.reset(now);
                last_fire = Some(now);
            }
        }
    }
}
