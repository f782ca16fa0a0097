//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the three relay channels, exposing them
//! through [`SensorPort`] and [`ActuatorPort`]. This is the only module
//! in the system that touches the relay lines. On non-espidf targets,
//! the underlying drivers use cfg-gated simulation stubs.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::app::reading::SensorReading;
use crate::drivers::hw_init::SysPin;
use crate::drivers::relay::Relay;
use crate::error::SensorError;
use crate::pins;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P = SysPin> {
    sensor_hub: SensorHub,
    fan: Relay<P>,
    light: Relay<P>,
    ac: Relay<P>,
}

impl HardwareAdapter<SysPin> {
    /// Wire the hub to the board's relay GPIOs. Relays come up released.
    pub fn new(sensor_hub: SensorHub) -> Self {
        let mut adapter = Self {
            sensor_hub,
            fan: Relay::new(SysPin::new(pins::FAN_RELAY_GPIO)),
            light: Relay::new(SysPin::new(pins::LIGHT_RELAY_GPIO)),
            ac: Relay::new(SysPin::new(pins::AC_RELAY_GPIO)),
        };
        adapter.all_off();
        adapter
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P: OutputPin> SensorPort for HardwareAdapter<P> {
    fn read_all(&mut self) -> Result<SensorReading, SensorError> {
        self.sensor_hub.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin> ActuatorPort for HardwareAdapter<P> {
    fn set_fan(&mut self, on: bool) {
        if self.fan.set(on).is_err() {
            log::warn!("hardware: fan relay write failed");
        }
    }

    fn set_light(&mut self, on: bool) {
        if self.light.set(on).is_err() {
            log::warn!("hardware: light relay write failed");
        }
    }

    fn set_ac(&mut self, on: bool) {
        if self.ac.set(on).is_err() {
            log::warn!("hardware: AC relay write failed");
        }
    }

    fn all_off(&mut self) {
        let _ = self.fan.release();
        let _ = self.light.release();
        let _ = self.ac.release();
    }
}
