//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces one [`SensorReading`]
//! per control tick, with the board's calibration offsets already applied.

pub mod bme280;
pub mod light;
pub mod motion;

use crate::app::reading::SensorReading;
use crate::config::SystemConfig;
use crate::error::SensorError;
use bme280::Bme280Sensor;
use light::LightSensor;

/// Aggregates all sensor drivers and produces a unified reading.
pub struct SensorHub {
    bme280: Bme280Sensor,
    light: LightSensor,
    /// Board calibration: the BME280 sits near the regulator and reads
    /// warm/dry; offsets re-centre it against a reference meter.
    temp_offset_c: f32,
    humidity_offset_pct: f32,
}

impl SensorHub {
    /// Construct a new hub. Pass in pre-built drivers (built in main
    /// where the init-failure halt policy lives).
    pub fn new(bme280: Bme280Sensor, light: LightSensor, config: &SystemConfig) -> Self {
        Self {
            bme280,
            light,
            temp_offset_c: config.temp_offset_c,
            humidity_offset_pct: config.humidity_offset_pct,
        }
    }

    /// Read every sensor and return one calibrated reading.
    ///
    /// Any individual failure fails the whole read; the caller decides
    /// what a skipped tick means.
    pub fn read_all(&mut self) -> Result<SensorReading, SensorError> {
        let env = self.bme280.read()?;
        let lux = self.light.read_lux()?;

        // Motion comes from the ISR-maintained atomic, seeded at boot.
        let motion = motion::motion_present();

        Ok(SensorReading {
            temperature_c: env.temperature_c + self.temp_offset_c,
            // Purely additive, even past full scale; the driver already
            // bounds the raw value.
            humidity_pct: env.humidity_pct + self.humidity_offset_pct,
            pressure_hpa: env.pressure_hpa,
            lux,
            motion,
        })
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    fn hub() -> SensorHub {
        let bme = Bme280Sensor::init().unwrap();
        let light = LightSensor::init().unwrap();
        SensorHub::new(bme, light, &SystemConfig::default())
    }

    // The sim channels are process-wide statics; run all hub checks in
    // one test so they cannot interleave under the parallel test runner.
    #[test]
    fn hub_reads_through_the_sim_channels() {
        let mut hub = hub();

        // Default calibration: -5.0 C, +10.0 %RH.
        bme280::sim_set_environment(30.0, 40.0, 1008.0);
        light::sim_set_lux(120.0);
        motion::sim_set_motion(false);
        let r = hub.read_all().unwrap();
        assert!((r.temperature_c - 25.0).abs() < 1e-3);
        assert!((r.humidity_pct - 50.0).abs() < 1e-3);
        assert!((r.pressure_hpa - 1008.0).abs() < 1e-3);
        assert!((r.lux - 120.0).abs() < 1e-3);
        assert!(!r.motion);

        // The offset is purely additive: 95 %RH reads as 105 %RH.
        bme280::sim_set_environment(25.0, 95.0, 1013.0);
        let r = hub.read_all().unwrap();
        assert!((r.humidity_pct - 105.0).abs() < 1e-3);

        // Motion atomic flows into the reading.
        motion::sim_set_motion(true);
        assert!(hub.read_all().unwrap().motion);
        motion::sim_set_motion(false);
        assert!(!hub.read_all().unwrap().motion);
    }
}
