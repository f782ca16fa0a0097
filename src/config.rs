//! System configuration parameters.
//!
//! All cadences, relay thresholds, and calibration offsets for the RoomSense
//! node. These are fixed policy constants — the struct is built from
//! `Default` at boot and never mutated at runtime.

use serde::{Deserialize, Serialize};

/// Weather endpoint polled on the refresh cadence. The payload must carry
/// `main.temp` (Kelvin) and `main.humidity` (percent).
pub const WEATHER_URL: &str =
    "http://api.openweathermap.org/data/2.5/weather?q=Colombo&appid=demo";

/// WiFi station credentials. Provisioning is out of scope — compiled in,
/// like the reference build.
pub const WIFI_SSID: &str = "roomsense";
pub const WIFI_PASSWORD: &str = "roomsense";

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Control cadence: sensor sample + policy + render (milliseconds).
    pub control_period_ms: u64,
    /// Refresh cadence: WiFi connect / weather fetch attempt (milliseconds).
    pub refresh_period_ms: u64,
    /// Telemetry log line every N control ticks.
    pub telemetry_every_ticks: u32,

    // --- Relay thresholds ---
    /// Fan relay closes above this temperature (Celsius).
    pub fan_on_above_c: f32,
    /// AC relay closes above this temperature (Celsius).
    pub ac_on_above_c: f32,
    /// Light relay closes when motion is present and lux is below this.
    pub light_on_below_lux: f32,

    // --- Calibration ---
    /// Additive temperature correction applied before policy (Celsius).
    pub temp_offset_c: f32,
    /// Additive humidity correction applied before policy (percent).
    pub humidity_offset_pct: f32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            control_period_ms: 1_000,   // 1 Hz local control
            refresh_period_ms: 30_000,  // weather refresh every 30 s
            telemetry_every_ticks: 60,  // 1/min at the default cadence

            // Thresholds
            fan_on_above_c: 28.0,
            ac_on_above_c: 30.0,
            light_on_below_lux: 100.0,

            // Calibration (reference board offsets)
            temp_offset_c: -5.0,
            humidity_offset_pct: 10.0,
        }
    }
}
