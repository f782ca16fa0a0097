//! Outdoor-weather cache and payload parsing.
//!
//! The cache is single-writer (the refresh path) / single-reader (the render
//! path) under the firmware's one-threaded model. Its invariant: outdoor
//! fields are meaningful only while `valid`, and a failed attempt can touch
//! nothing but `last_attempt_ms` — the last known good value survives every
//! failure until the process ends.

use serde::Deserialize;

const KELVIN_OFFSET: f32 = 273.15;

// ───────────────────────────────────────────────────────────────
// Payload schema
// ───────────────────────────────────────────────────────────────

/// The two fields consumed from the weather endpoint. Any other shape is a
/// parse failure; extra fields are ignored.
#[derive(Debug, Deserialize)]
struct WeatherPayload {
    main: MainSection,
}

#[derive(Debug, Deserialize)]
struct MainSection {
    /// Outdoor temperature in Kelvin.
    temp: f32,
    /// Outdoor relative humidity in percent.
    humidity: f32,
}

/// A successfully parsed outdoor reading, already converted to Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutdoorReading {
    pub temp_c: f32,
    pub humidity_pct: f32,
}

/// Parse a weather endpoint body into an [`OutdoorReading`].
pub fn parse_weather(body: &str) -> Result<OutdoorReading, serde_json::Error> {
    let payload: WeatherPayload = serde_json::from_str(body)?;
    Ok(OutdoorReading {
        temp_c: payload.main.temp - KELVIN_OFFSET,
        humidity_pct: payload.main.humidity,
    })
}

// ───────────────────────────────────────────────────────────────
// Cache
// ───────────────────────────────────────────────────────────────

/// Last successfully fetched outdoor reading plus attempt bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherCache {
    outdoor_temp_c: f32,
    outdoor_humidity_pct: f32,
    valid: bool,
    last_attempt_ms: u64,
    last_success_ms: u64,
}

impl WeatherCache {
    /// Empty, invalid cache — the boot state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a refresh attempt ran at `now_ms`, whatever its outcome.
    pub fn record_attempt(&mut self, now_ms: u64) {
        self.last_attempt_ms = now_ms;
    }

    /// Store a successful fetch. The only path that writes outdoor fields.
    pub fn store(&mut self, reading: OutdoorReading, now_ms: u64) {
        self.outdoor_temp_c = reading.temp_c;
        self.outdoor_humidity_pct = reading.humidity_pct;
        self.valid = true;
        self.last_success_ms = now_ms;
    }

    /// Whether at least one fetch has ever completed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Outdoor (temperature C, humidity %) — `None` until the first success.
    pub fn outdoor(&self) -> Option<(f32, f32)> {
        self.valid
            .then_some((self.outdoor_temp_c, self.outdoor_humidity_pct))
    }

    pub fn last_attempt_ms(&self) -> u64 {
        self.last_attempt_ms
    }

    pub fn last_success_ms(&self) -> u64 {
        self.last_success_ms
    }

    /// Milliseconds since the last successful fetch. `None` while invalid.
    /// Logged in telemetry only — staleness is not surfaced on the display.
    pub fn staleness_ms(&self, now_ms: u64) -> Option<u64> {
        self.valid
            .then(|| now_ms.saturating_sub(self.last_success_ms))
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kelvin_and_humidity() {
        let body = r#"{"main":{"temp":295.15,"humidity":55.0},"wind":{"speed":3.1}}"#;
        let r = parse_weather(body).unwrap();
        assert!((r.temp_c - 22.0).abs() < 0.01);
        assert!((r.humidity_pct - 55.0).abs() < 0.01);
    }

    #[test]
    fn rejects_missing_main_section() {
        assert!(parse_weather(r#"{"weather":[{"id":800}]}"#).is_err());
        assert!(parse_weather(r#"{"main":{"temp":295.15}}"#).is_err());
        assert!(parse_weather("not json").is_err());
    }

    #[test]
    fn starts_invalid_with_no_outdoor_reading() {
        let cache = WeatherCache::new();
        assert!(!cache.is_valid());
        assert_eq!(cache.outdoor(), None);
        assert_eq!(cache.staleness_ms(1_000), None);
    }

    #[test]
    fn store_validates_and_exposes_outdoor_fields() {
        let mut cache = WeatherCache::new();
        cache.record_attempt(30_000);
        cache.store(
            OutdoorReading {
                temp_c: 22.0,
                humidity_pct: 55.0,
            },
            30_000,
        );
        assert!(cache.is_valid());
        assert_eq!(cache.outdoor(), Some((22.0, 55.0)));
        assert_eq!(cache.last_success_ms(), 30_000);
        assert_eq!(cache.staleness_ms(45_000), Some(15_000));
    }

    #[test]
    fn failed_attempt_preserves_last_good_value() {
        let mut cache = WeatherCache::new();
        cache.record_attempt(30_000);
        cache.store(
            OutdoorReading {
                temp_c: 22.0,
                humidity_pct: 55.0,
            },
            30_000,
        );

        // A later attempt that never reaches store() moves only the
        // attempt timestamp.
        cache.record_attempt(60_000);
        assert!(cache.is_valid());
        assert_eq!(cache.outdoor(), Some((22.0, 55.0)));
        assert_eq!(cache.last_attempt_ms(), 60_000);
        assert_eq!(cache.last_success_ms(), 30_000);
    }
}
