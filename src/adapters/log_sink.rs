//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future MQTT adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | T={:.1}\u{00b0}C RH={:.0}% P={:.1}hPa | lux={:.0} motion={} | \
                     fan={} light={} ac={} | link={} weather_age={}",
                    t.temperature_c,
                    t.humidity_pct,
                    t.pressure_hpa,
                    t.lux,
                    if t.motion { "Y" } else { "N" },
                    on_off(t.fan_on),
                    on_off(t.light_on),
                    on_off(t.ac_on),
                    if t.connected { "UP" } else { "DOWN" },
                    match t.weather_age_ms {
                        Some(age) => format!("{}s", age / 1_000),
                        None => "never".to_string(),
                    },
                );
            }
            AppEvent::ActuatorsChanged { from, to } => {
                info!(
                    "ACT | fan {}->{} light {}->{} ac {}->{}",
                    on_off(from.fan_on),
                    on_off(to.fan_on),
                    on_off(from.light_on),
                    on_off(to.light_on),
                    on_off(from.ac_on),
                    on_off(to.ac_on),
                );
            }
            AppEvent::SensorReadFailed(e) => {
                warn!("SENSOR | read failed: {}", e);
            }
            AppEvent::RefreshAttempt(outcome) => {
                info!("NET | refresh attempt: {:?}", outcome);
            }
            AppEvent::Started => {
                info!("START | control service up");
            }
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}
