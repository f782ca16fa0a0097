//! RoomSense Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  HardwareAdapter     OledDisplay     WifiAdapter         │
//! │  (Sensor+Actuator)   (DisplayPort)   (NetworkPort)       │
//! │  LogEventSink        MonotonicClock                      │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │         ControlService (pure logic)            │      │
//! │  │  ActuatorPolicy · PresentationView             │      │
//! │  └────────────────────────────────────────────────┘      │
//! │                                                          │
//! │  Scheduler (two cadences) · ConnectivityManager          │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use roomsense::adapters::hardware::HardwareAdapter;
use roomsense::adapters::log_sink::LogEventSink;
use roomsense::adapters::oled::OledDisplay;
use roomsense::adapters::time::MonotonicClock;
use roomsense::adapters::wifi::WifiAdapter;
use roomsense::app::events::AppEvent;
use roomsense::app::ports::{Cadence, CadenceDelegate, EventSink, NetworkPort};
use roomsense::app::service::ControlService;
use roomsense::config::{self, SystemConfig};
use roomsense::drivers::hw_init;
use roomsense::error::Error;
use roomsense::events::{self, Event, push_event};
use roomsense::net::ConnectivityManager;
use roomsense::scheduler::Scheduler;
use roomsense::sensors::{SensorHub, bme280::Bme280Sensor, light::LightSensor};
use roomsense::weather::WeatherCache;

/// Idle delay between hot-loop iterations. Well under the 1 s control
/// period, so cadence jitter stays in the noise.
const LOOP_IDLE_MS: u32 = 10;

// ── Cadence delegate ──────────────────────────────────────────
//
// Bridges the scheduler (which knows nothing about the event system)
// to the ISR event queue: a due cadence becomes an event the same way
// a GPIO edge does, and the drain loop below treats them uniformly.

struct EventQueueDelegate;

impl CadenceDelegate for EventQueueDelegate {
    fn on_cadence_due(&mut self, cadence: Cadence) {
        let event = match cadence {
            Cadence::Control => Event::ControlTick,
            Cadence::Refresh => Event::RefreshTick,
        };
        if !push_event(event) {
            warn!("main: event queue full, {:?} dropped", event);
        }
    }
}

/// Bring up the I2C sensor drivers. Either both come up or the node must
/// not run; the sub-errors funnel into the firmware-wide [`Error`].
fn init_sensors() -> roomsense::error::Result<(Bme280Sensor, LightSensor)> {
    let bme280 = Bme280Sensor::init()?;
    let light = LightSensor::init()?;
    Ok((bme280, light))
}

/// Park forever after an unrecoverable init failure. Relays are released
/// (hw_init drives them HIGH), so halting is the safe state.
fn halt() -> ! {
    #[allow(clippy::empty_loop)]
    loop {
        #[cfg(target_os = "espidf")]
        esp_idf_hal::delay::FreeRtos::delay_ms(1_000);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("╔══════════════════════════════════════╗");
    info!("║  RoomSense v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt with the
        // relays released.
        error!("{} ({e}) — halting", Error::Init("peripheral bring-up"));
        halt();
    }

    // ── 3. Sensors — a control node that cannot sense must not run ──
    let (bme280, light) = match init_sensors() {
        Ok(drivers) => drivers,
        Err(e) => {
            error!("{e} — halting");
            halt();
        }
    };

    if let Err(e) = hw_init::init_isr_service() {
        // Degraded but not fatal: motion stays at its boot-seeded level.
        error!("ISR service init failed: {} — continuing without PIR edges", e);
    }

    // ── 4. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    let clock = MonotonicClock::new();

    // ── 5. Construct adapters ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;

    #[cfg(target_os = "espidf")]
    let mut display = {
        use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
        use esp_idf_hal::units::Hertz;

        let i2c_config = I2cConfig::new().baudrate(Hertz(roomsense::pins::I2C_FREQ_HZ));
        let i2c = I2cDriver::new(
            peripherals.i2c1,
            peripherals.pins.gpio25,
            peripherals.pins.gpio26,
            &i2c_config,
        )?;
        match OledDisplay::new(i2c) {
            Ok(d) => d,
            Err(e) => {
                error!("{} — halting", Error::from(e));
                halt();
            }
        }
    };
    #[cfg(not(target_os = "espidf"))]
    let mut display = match OledDisplay::new() {
        Ok(d) => d,
        Err(e) => {
            error!("{} — halting", Error::from(e));
            halt();
        }
    };

    #[cfg(target_os = "espidf")]
    let mut wifi = {
        let sysloop = esp_idf_svc::eventloop::EspSystemEventLoop::take()?;
        let nvs = esp_idf_svc::nvs::EspDefaultNvsPartition::take()?;
        let esp_wifi = esp_idf_svc::wifi::EspWifi::new(peripherals.modem, sysloop, Some(nvs))?;
        WifiAdapter::new(esp_wifi, config::WIFI_SSID, config::WIFI_PASSWORD)
            .map_err(|e| anyhow::anyhow!("{}", Error::from(e)))?
    };
    #[cfg(not(target_os = "espidf"))]
    let mut wifi = WifiAdapter::new(config::WIFI_SSID, config::WIFI_PASSWORD)
        .map_err(|e| anyhow::anyhow!("{}", Error::from(e)))?;

    let sensor_hub = SensorHub::new(bme280, light, &config);
    let mut hw = HardwareAdapter::new(sensor_hub);
    let mut log_sink = LogEventSink::new();

    // ── 6. Domain core ────────────────────────────────────────
    let mut service = ControlService::new(&config);
    let mut conn_mgr = ConnectivityManager::new(config::WEATHER_URL);
    let mut weather = WeatherCache::new();

    let mut sched = Scheduler::new(&config, clock.now_ms());
    let mut sched_delegate = EventQueueDelegate;

    service.start(&mut hw, &mut log_sink);
    info!("System ready. Entering event loop.");

    // ── 7. Event loop ─────────────────────────────────────────
    loop {
        #[cfg(target_os = "espidf")]
        esp_idf_hal::delay::FreeRtos::delay_ms(LOOP_IDLE_MS);
        #[cfg(not(target_os = "espidf"))]
        std::thread::sleep(std::time::Duration::from_millis(u64::from(LOOP_IDLE_MS)));

        let now_ms = clock.now_ms();
        sched.tick(now_ms, &mut sched_delegate);

        events::drain_events(|event| match event {
            Event::ControlTick => {
                let connected = wifi.is_connected();
                service.control_tick(
                    &mut hw,
                    &mut display,
                    &weather,
                    connected,
                    now_ms,
                    &mut log_sink,
                );
            }

            Event::RefreshTick => {
                let outcome = conn_mgr.attempt(&mut wifi, &mut weather, now_ms);
                log_sink.emit(&AppEvent::RefreshAttempt(outcome));
            }

            Event::MotionEdge => {
                // The ISR already latched the level; the next control
                // tick picks it up. Nothing to do eagerly.
            }
        });
    }
}
