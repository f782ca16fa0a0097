//! BH1750 ambient light sensor.
//!
//! Runs in continuous high-resolution mode (1 lx / 120 ms), so every
//! control tick just reads the latest 16-bit word off the bus. Lux is
//! `raw / 1.2` per the datasheet's nominal accuracy factor.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: I2C0 via the hw_init helpers.
//! On host/test: reads from a static atomic for injection.

use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
const CMD_POWER_ON: u8 = 0x01;
#[cfg(target_os = "espidf")]
const CMD_CONT_H_RES: u8 = 0x10;
#[cfg(target_os = "espidf")]
const LUX_PER_COUNT: f32 = 1.0 / 1.2;

#[cfg(not(target_os = "espidf"))]
static SIM_LUX_BITS: AtomicU32 = AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_lux(lux: f32) {
    SIM_LUX_BITS.store(lux.to_bits(), Ordering::Relaxed);
}

pub struct LightSensor;

impl LightSensor {
    /// Power the part up and start continuous measurement.
    #[cfg(target_os = "espidf")]
    pub fn init() -> Result<Self, SensorError> {
        if !hw_init::i2c_write(pins::BH1750_ADDR, &[CMD_POWER_ON]) {
            return Err(SensorError::I2cReadFailed);
        }
        if !hw_init::i2c_write(pins::BH1750_ADDR, &[CMD_CONT_H_RES]) {
            return Err(SensorError::I2cReadFailed);
        }
        Ok(Self)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn init() -> Result<Self, SensorError> {
        Ok(Self)
    }

    #[cfg(target_os = "espidf")]
    pub fn read_lux(&self) -> Result<f32, SensorError> {
        let mut raw = [0u8; 2];
        if !hw_init::i2c_read(pins::BH1750_ADDR, &mut raw) {
            return Err(SensorError::I2cReadFailed);
        }
        Ok(f32::from(u16::from_be_bytes(raw)) * LUX_PER_COUNT)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_lux(&self) -> Result<f32, SensorError> {
        Ok(f32::from_bits(SIM_LUX_BITS.load(Ordering::Relaxed)))
    }
}
