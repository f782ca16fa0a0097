//! Control service — the hexagonal core.
//!
//! [`ControlService`] owns the relay policy and the last-applied
//! [`ActuatorState`]. It exposes one operation per control-cadence firing:
//! read sensors → evaluate policy → drive relays → render the frame. All
//! I/O flows through port traits injected at the call site, so the whole
//! cycle runs against mocks in tests.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                  │      ControlService      │
//! ActuatorPort ◀── │  policy · state · render │ ──▶ DisplayPort
//!                  └──────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::policy::ActuatorPolicy;
use crate::render::PresentationView;
use crate::weather::WeatherCache;

use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};
use super::reading::{ActuatorState, SensorReading};

/// Orchestrates one control tick and owns the actuator state.
pub struct ControlService {
    policy: ActuatorPolicy,
    actuators: ActuatorState,
    last_reading: Option<SensorReading>,
    telemetry_every_ticks: u32,
    tick_count: u64,
    skipped_reads: u64,
}

impl ControlService {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            policy: ActuatorPolicy::new(config),
            actuators: ActuatorState::all_off(),
            last_reading: None,
            telemetry_every_ticks: config.telemetry_every_ticks,
            tick_count: 0,
            skipped_reads: 0,
        }
    }

    /// Release every relay and announce the service. Called once at boot,
    /// before the first control tick.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        self.actuators = ActuatorState::all_off();
        sink.emit(&AppEvent::Started);
        info!("control: started, all relays released");
    }

    /// Run one full control cycle: read → policy → relays → render.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit. A failed sensor read skips the tick:
    /// relays and display keep their previous state, and the failure is
    /// surfaced as an event instead of flowing garbage into the policy.
    pub fn control_tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        display: &mut impl DisplayPort,
        weather: &WeatherCache,
        connected: bool,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. One atomic snapshot via SensorPort.
        let reading = match hw.read_all() {
            Ok(r) => r,
            Err(e) => {
                self.skipped_reads += 1;
                warn!("control: sensor read failed ({}), tick skipped", e);
                sink.emit(&AppEvent::SensorReadFailed(e));
                return;
            }
        };

        // 2. Pure policy evaluation.
        let next = self.policy.evaluate(&reading);
        if next != self.actuators {
            sink.emit(&AppEvent::ActuatorsChanged {
                from: self.actuators,
                to: next,
            });
        }
        self.actuators = next;
        self.last_reading = Some(reading);

        // 3. Re-apply relay levels every tick (idempotent on the driver).
        hw.set_fan(next.fan_on);
        hw.set_light(next.light_on);
        hw.set_ac(next.ac_on);

        // 4. Compose and hand off the frame.
        let frame = PresentationView::compose(&reading, &self.actuators, weather, connected);
        display.draw(&frame);

        // 5. Periodic telemetry.
        if self.tick_count % u64::from(self.telemetry_every_ticks) == 0 {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry(
                &reading, weather, connected, now_ms,
            )));
        }
    }

    fn build_telemetry(
        &self,
        reading: &SensorReading,
        weather: &WeatherCache,
        connected: bool,
        now_ms: u64,
    ) -> TelemetryData {
        TelemetryData {
            temperature_c: reading.temperature_c,
            humidity_pct: reading.humidity_pct,
            pressure_hpa: reading.pressure_hpa,
            lux: reading.lux,
            motion: reading.motion,
            fan_on: self.actuators.fan_on,
            light_on: self.actuators.light_on,
            ac_on: self.actuators.ac_on,
            connected,
            weather_age_ms: weather.staleness_ms(now_ms),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Last-applied relay levels.
    pub fn actuators(&self) -> ActuatorState {
        self.actuators
    }

    /// Most recent successful reading, if any tick has completed.
    pub fn last_reading(&self) -> Option<SensorReading> {
        self.last_reading
    }

    /// Total control ticks attempted since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Ticks skipped because the sensor read failed.
    pub fn skipped_reads(&self) -> u64 {
        self.skipped_reads
    }
}
