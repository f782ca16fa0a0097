//! Integration tests: ControlService + Scheduler + ConnectivityManager
//! driven end to end through mock ports.

use roomsense::app::events::AppEvent;
use roomsense::app::ports::{
    ActuatorPort, Cadence, CadenceDelegate, DisplayPort, EventSink, HttpResponse, NetworkPort,
    SensorPort,
};
use roomsense::app::reading::SensorReading;
use roomsense::app::service::ControlService;
use roomsense::config::SystemConfig;
use roomsense::error::{NetError, SensorError};
use roomsense::net::{AttemptOutcome, ConnectivityManager};
use roomsense::render::Frame;
use roomsense::scheduler::Scheduler;
use roomsense::weather::WeatherCache;

// ── Mock implementations ──────────────────────────────────────

struct MockHw {
    reading: Result<SensorReading, SensorError>,
    fan: bool,
    light: bool,
    ac: bool,
}

impl MockHw {
    fn reading(reading: SensorReading) -> Self {
        Self {
            reading: Ok(reading),
            fan: false,
            light: false,
            ac: false,
        }
    }
}

impl SensorPort for MockHw {
    fn read_all(&mut self) -> Result<SensorReading, SensorError> {
        self.reading
    }
}

impl ActuatorPort for MockHw {
    fn set_fan(&mut self, on: bool) {
        self.fan = on;
    }
    fn set_light(&mut self, on: bool) {
        self.light = on;
    }
    fn set_ac(&mut self, on: bool) {
        self.ac = on;
    }
    fn all_off(&mut self) {
        self.fan = false;
        self.light = false;
        self.ac = false;
    }
}

#[derive(Default)]
struct FrameRecorder {
    frames: Vec<Frame>,
}

impl FrameRecorder {
    fn last_text(&self) -> String {
        self.frames
            .last()
            .expect("at least one frame drawn")
            .lines
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DisplayPort for FrameRecorder {
    fn draw(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

#[derive(Default)]
struct EventRecorder {
    events: Vec<AppEvent>,
}

impl EventSink for EventRecorder {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

/// Scripted network: link state plus a FIFO of HTTP results.
struct MockNet {
    connected: bool,
    connect_succeeds: bool,
    responses: Vec<Result<HttpResponse, NetError>>,
    connects: usize,
    gets: usize,
}

impl MockNet {
    fn offline() -> Self {
        Self {
            connected: false,
            connect_succeeds: true,
            responses: Vec::new(),
            connects: 0,
            gets: 0,
        }
    }

    fn online(responses: Vec<Result<HttpResponse, NetError>>) -> Self {
        Self {
            connected: true,
            connect_succeeds: true,
            responses,
            connects: 0,
            gets: 0,
        }
    }
}

impl NetworkPort for MockNet {
    fn connect(&mut self) -> Result<(), NetError> {
        self.connects += 1;
        if self.connect_succeeds {
            self.connected = true;
            Ok(())
        } else {
            Err(NetError::ConnectFailed)
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn http_get(&mut self, _url: &str) -> Result<HttpResponse, NetError> {
        self.gets += 1;
        self.responses.remove(0)
    }
}

fn reading(temp: f32, lux: f32, motion: bool) -> SensorReading {
    SensorReading {
        temperature_c: temp,
        humidity_pct: 50.0,
        pressure_hpa: 1010.0,
        lux,
        motion,
    }
}

fn weather_body(temp_k: f64, humidity: f64) -> HttpResponse {
    HttpResponse {
        status: 200,
        body: format!(r#"{{"main":{{"temp":{temp_k},"humidity":{humidity}}}}}"#),
    }
}

// ── Relay decision scenarios ──────────────────────────────────

#[test]
fn warm_dim_room_with_motion_runs_fan_and_light_but_not_ac() {
    let mut service = ControlService::new(&SystemConfig::default());
    let mut hw = MockHw::reading(reading(29.0, 50.0, true));
    let mut display = FrameRecorder::default();
    let mut sink = EventRecorder::default();

    service.control_tick(
        &mut hw,
        &mut display,
        &WeatherCache::new(),
        false,
        1_000,
        &mut sink,
    );

    assert!(hw.fan, "29.0 C is above the 28.0 C fan threshold");
    assert!(hw.light, "motion plus 50 lux is below the 100 lux threshold");
    assert!(!hw.ac, "29.0 C is not above the 30.0 C AC threshold");

    let text = display.last_text();
    assert!(text.contains("Fan:ON Light:ON"));
    assert!(text.contains("AC:OFF"));
}

#[test]
fn hot_bright_room_with_motion_runs_fan_and_ac_but_not_light() {
    let mut service = ControlService::new(&SystemConfig::default());
    let mut hw = MockHw::reading(reading(31.0, 150.0, true));
    let mut display = FrameRecorder::default();
    let mut sink = EventRecorder::default();

    service.control_tick(
        &mut hw,
        &mut display,
        &WeatherCache::new(),
        false,
        1_000,
        &mut sink,
    );

    assert!(hw.fan);
    assert!(hw.ac, "31.0 C is above the 30.0 C AC threshold");
    assert!(!hw.light, "150 lux is bright enough despite motion");
}

#[test]
fn relays_drop_when_the_room_cools_back_down() {
    let mut service = ControlService::new(&SystemConfig::default());
    let mut display = FrameRecorder::default();
    let mut sink = EventRecorder::default();

    let mut hw = MockHw::reading(reading(31.0, 150.0, false));
    service.control_tick(
        &mut hw,
        &mut display,
        &WeatherCache::new(),
        false,
        1_000,
        &mut sink,
    );
    assert!(hw.fan && hw.ac);

    // Exactly at the thresholds: strict comparisons turn both off.
    hw.reading = Ok(reading(28.0, 150.0, false));
    service.control_tick(
        &mut hw,
        &mut display,
        &WeatherCache::new(),
        false,
        2_000,
        &mut sink,
    );
    assert!(!hw.fan && !hw.ac);
}

// ── Display link-state scenarios ──────────────────────────────

#[test]
fn display_shows_no_link_while_disconnected_even_with_cached_weather() {
    let mut service = ControlService::new(&SystemConfig::default());
    let mut hw = MockHw::reading(reading(25.0, 200.0, false));
    let mut display = FrameRecorder::default();
    let mut sink = EventRecorder::default();

    let mut cache = WeatherCache::new();
    let mut net = MockNet::online(vec![Ok(weather_body(298.15, 60.0))]);
    let mut mgr = ConnectivityManager::new("http://example/weather");
    assert_eq!(
        mgr.attempt(&mut net, &mut cache, 30_000),
        AttemptOutcome::Fetched
    );

    // Link later drops; the frame must say so rather than show stale data.
    service.control_tick(&mut hw, &mut display, &cache, false, 31_000, &mut sink);
    assert!(display.last_text().contains("Out: no link"));
}

#[test]
fn display_shows_no_data_when_connected_but_nothing_fetched_yet() {
    let mut service = ControlService::new(&SystemConfig::default());
    let mut hw = MockHw::reading(reading(25.0, 200.0, false));
    let mut display = FrameRecorder::default();
    let mut sink = EventRecorder::default();

    service.control_tick(
        &mut hw,
        &mut display,
        &WeatherCache::new(),
        true,
        1_000,
        &mut sink,
    );

    let text = display.last_text();
    assert!(text.contains("Out: no data"));
    assert!(
        !text.contains("0.0C"),
        "an empty cache must never render as a zero temperature"
    );
}

#[test]
fn display_keeps_stale_weather_after_a_failed_refresh() {
    let mut service = ControlService::new(&SystemConfig::default());
    let mut hw = MockHw::reading(reading(25.0, 200.0, false));
    let mut display = FrameRecorder::default();
    let mut sink = EventRecorder::default();

    let mut cache = WeatherCache::new();
    let mut net = MockNet::online(vec![
        Ok(weather_body(298.15, 60.0)),
        Ok(HttpResponse {
            status: 500,
            body: String::new(),
        }),
    ]);
    let mut mgr = ConnectivityManager::new("http://example/weather");

    assert_eq!(
        mgr.attempt(&mut net, &mut cache, 30_000),
        AttemptOutcome::Fetched
    );
    assert_eq!(
        mgr.attempt(&mut net, &mut cache, 60_000),
        AttemptOutcome::HttpFailure(500)
    );

    service.control_tick(&mut hw, &mut display, &cache, true, 61_000, &mut sink);
    assert!(
        display.last_text().contains("Out: 25.0C 60%"),
        "last good value survives the failed refresh"
    );
}

// ── Sensor failure handling ───────────────────────────────────

#[test]
fn sensor_failure_freezes_relays_and_display() {
    let mut service = ControlService::new(&SystemConfig::default());
    let mut hw = MockHw::reading(reading(31.0, 50.0, true));
    let mut display = FrameRecorder::default();
    let mut sink = EventRecorder::default();

    service.control_tick(
        &mut hw,
        &mut display,
        &WeatherCache::new(),
        false,
        1_000,
        &mut sink,
    );
    assert!(hw.fan && hw.ac && hw.light);
    assert_eq!(display.frames.len(), 1);

    hw.reading = Err(SensorError::I2cReadFailed);
    service.control_tick(
        &mut hw,
        &mut display,
        &WeatherCache::new(),
        false,
        2_000,
        &mut sink,
    );

    assert!(hw.fan && hw.ac && hw.light, "failed read keeps relay levels");
    assert_eq!(display.frames.len(), 1, "failed read draws no new frame");
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::SensorReadFailed(SensorError::I2cReadFailed))),
        "failure surfaces as an event"
    );
}

// ── Cadence + refresh interplay ───────────────────────────────

/// Delegate that counts cadence firings and drives the refresh path,
/// the way the firmware's event loop does.
struct LoopHarness {
    control_fires: u64,
    refresh_fires: u64,
}

impl CadenceDelegate for LoopHarness {
    fn on_cadence_due(&mut self, cadence: Cadence) {
        match cadence {
            Cadence::Control => self.control_fires += 1,
            Cadence::Refresh => self.refresh_fires += 1,
        }
    }
}

#[test]
fn first_refresh_connects_and_second_fetches() {
    let mut cache = WeatherCache::new();
    let mut net = MockNet::offline();
    net.responses = vec![Ok(weather_body(300.15, 65.0))];
    let mut mgr = ConnectivityManager::new("http://example/weather");

    // 30 s: no link yet — this firing only issues the connect.
    assert_eq!(
        mgr.attempt(&mut net, &mut cache, 30_000),
        AttemptOutcome::Connecting
    );
    assert_eq!(net.gets, 0);
    assert!(!cache.is_valid());

    // 60 s: link is up — this firing fetches.
    assert_eq!(
        mgr.attempt(&mut net, &mut cache, 60_000),
        AttemptOutcome::Fetched
    );
    assert_eq!(net.connects, 1);
    assert_eq!(net.gets, 1);
    let (t, h) = cache.outdoor().expect("cache valid after fetch");
    assert!((t - 27.0).abs() < 0.01);
    assert!((h - 65.0).abs() < 0.01);
}

#[test]
fn thirty_control_ticks_pass_between_refresh_firings() {
    let config = SystemConfig::default();
    let mut sched = Scheduler::new(&config, 0);
    let mut harness = LoopHarness {
        control_fires: 0,
        refresh_fires: 0,
    };

    // Poll fast (every 100 ms) for 90 simulated seconds.
    for now in (0..=90_000).step_by(100) {
        sched.tick(now, &mut harness);
    }

    assert_eq!(harness.refresh_fires, 3, "refresh at 30 s, 60 s, 90 s");
    assert_eq!(harness.control_fires, 90, "control once per second");
}

#[test]
fn refresh_window_advances_even_when_the_attempt_fails() {
    let mut cache = WeatherCache::new();
    let mut net = MockNet::offline();
    net.connect_succeeds = false;
    let mut mgr = ConnectivityManager::new("http://example/weather");

    assert_eq!(
        mgr.attempt(&mut net, &mut cache, 30_000),
        AttemptOutcome::ConnectFailed
    );
    assert_eq!(
        mgr.attempt(&mut net, &mut cache, 60_000),
        AttemptOutcome::ConnectFailed
    );

    // One attempt per window, stamped each time, cache untouched.
    assert_eq!(net.connects, 2);
    assert_eq!(cache.last_attempt_ms(), 60_000);
    assert!(!cache.is_valid());
}
