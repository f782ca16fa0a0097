//! BME280 combined temperature / humidity / pressure sensor.
//!
//! Driven over I2C0 in normal mode (1x oversampling on every channel,
//! 1 s standby — matched to the control cadence). Raw ADC words are
//! converted with the Bosch floating-point compensation formulas using
//! the per-device calibration block read once at init.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: talks to the real chip via the hw_init I2C helpers.
//! On host/test: reads from static atomics for injection.

use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

// Plausible physical bounds; anything outside means a misread, not air.
#[cfg(target_os = "espidf")]
const TEMP_MIN_C: f32 = -40.0;
#[cfg(target_os = "espidf")]
const TEMP_MAX_C: f32 = 85.0;

#[derive(Debug, Clone, Copy)]
pub struct Bme280Reading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub pressure_hpa: f32,
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY_BITS: AtomicU32 = AtomicU32::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_PRESSURE_BITS: AtomicU32 = AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_environment(temp_c: f32, humidity_pct: f32, pressure_hpa: f32) {
    SIM_TEMP_BITS.store(temp_c.to_bits(), Ordering::Relaxed);
    SIM_HUMIDITY_BITS.store(humidity_pct.to_bits(), Ordering::Relaxed);
    SIM_PRESSURE_BITS.store(pressure_hpa.to_bits(), Ordering::Relaxed);
}

// ── Driver ────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct Bme280Sensor {
    calib: Calibration,
}

#[cfg(not(target_os = "espidf"))]
pub struct Bme280Sensor;

#[cfg(target_os = "espidf")]
impl Bme280Sensor {
    const REG_ID: u8 = 0xD0;
    const REG_CTRL_HUM: u8 = 0xF2;
    const REG_CTRL_MEAS: u8 = 0xF4;
    const REG_CONFIG: u8 = 0xF5;
    const REG_DATA: u8 = 0xF7;
    const CHIP_ID: u8 = 0x60;

    /// Probe the chip, load calibration, and enter normal mode.
    pub fn init() -> Result<Self, SensorError> {
        let mut id = [0u8; 1];
        if !hw_init::i2c_write_read(pins::BME280_ADDR, &[Self::REG_ID], &mut id) {
            return Err(SensorError::I2cReadFailed);
        }
        if id[0] != Self::CHIP_ID {
            return Err(SensorError::NotReady);
        }

        let calib = Calibration::read()?;

        // Humidity x1; must be written before ctrl_meas to take effect.
        if !hw_init::i2c_write(pins::BME280_ADDR, &[Self::REG_CTRL_HUM, 0x01]) {
            return Err(SensorError::I2cReadFailed);
        }
        // Temp x1, pressure x1, normal mode.
        if !hw_init::i2c_write(pins::BME280_ADDR, &[Self::REG_CTRL_MEAS, 0x27]) {
            return Err(SensorError::I2cReadFailed);
        }
        // 1000 ms standby, filter off.
        if !hw_init::i2c_write(pins::BME280_ADDR, &[Self::REG_CONFIG, 0xA0]) {
            return Err(SensorError::I2cReadFailed);
        }

        Ok(Self { calib })
    }

    pub fn read(&self) -> Result<Bme280Reading, SensorError> {
        let mut raw = [0u8; 8];
        if !hw_init::i2c_write_read(pins::BME280_ADDR, &[Self::REG_DATA], &mut raw) {
            return Err(SensorError::I2cReadFailed);
        }

        let adc_p = ((raw[0] as u32) << 12) | ((raw[1] as u32) << 4) | ((raw[2] as u32) >> 4);
        let adc_t = ((raw[3] as u32) << 12) | ((raw[4] as u32) << 4) | ((raw[5] as u32) >> 4);
        let adc_h = ((raw[6] as u32) << 8) | (raw[7] as u32);

        let (temperature_c, t_fine) = self.calib.compensate_temperature(adc_t);
        if !(TEMP_MIN_C..=TEMP_MAX_C).contains(&temperature_c) {
            return Err(SensorError::OutOfRange);
        }
        let pressure_hpa = self.calib.compensate_pressure(adc_p, t_fine) / 100.0;
        let humidity_pct = self.calib.compensate_humidity(adc_h, t_fine);

        Ok(Bme280Reading {
            temperature_c,
            humidity_pct,
            pressure_hpa,
        })
    }
}

#[cfg(not(target_os = "espidf"))]
impl Bme280Sensor {
    pub fn init() -> Result<Self, SensorError> {
        Ok(Self)
    }

    pub fn read(&self) -> Result<Bme280Reading, SensorError> {
        Ok(Bme280Reading {
            temperature_c: f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed)),
            humidity_pct: f32::from_bits(SIM_HUMIDITY_BITS.load(Ordering::Relaxed)),
            pressure_hpa: f32::from_bits(SIM_PRESSURE_BITS.load(Ordering::Relaxed)),
        })
    }
}

// ── Calibration block ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
struct Calibration {
    t1: u16,
    t2: i16,
    t3: i16,
    p1: u16,
    p2: i16,
    p3: i16,
    p4: i16,
    p5: i16,
    p6: i16,
    p7: i16,
    p8: i16,
    p9: i16,
    h1: u8,
    h2: i16,
    h3: u8,
    h4: i16,
    h5: i16,
    h6: i8,
}

#[cfg(target_os = "espidf")]
impl Calibration {
    /// Read the three factory calibration register blocks.
    fn read() -> Result<Self, SensorError> {
        let mut tp = [0u8; 24]; // 0x88..0x9F: temperature + pressure
        if !hw_init::i2c_write_read(pins::BME280_ADDR, &[0x88], &mut tp) {
            return Err(SensorError::I2cReadFailed);
        }
        let mut h1 = [0u8; 1]; // 0xA1
        if !hw_init::i2c_write_read(pins::BME280_ADDR, &[0xA1], &mut h1) {
            return Err(SensorError::I2cReadFailed);
        }
        let mut h = [0u8; 7]; // 0xE1..0xE7: humidity
        if !hw_init::i2c_write_read(pins::BME280_ADDR, &[0xE1], &mut h) {
            return Err(SensorError::I2cReadFailed);
        }

        let u16le = |lo: u8, hi: u8| u16::from_le_bytes([lo, hi]);
        let i16le = |lo: u8, hi: u8| i16::from_le_bytes([lo, hi]);

        Ok(Self {
            t1: u16le(tp[0], tp[1]),
            t2: i16le(tp[2], tp[3]),
            t3: i16le(tp[4], tp[5]),
            p1: u16le(tp[6], tp[7]),
            p2: i16le(tp[8], tp[9]),
            p3: i16le(tp[10], tp[11]),
            p4: i16le(tp[12], tp[13]),
            p5: i16le(tp[14], tp[15]),
            p6: i16le(tp[16], tp[17]),
            p7: i16le(tp[18], tp[19]),
            p8: i16le(tp[20], tp[21]),
            p9: i16le(tp[22], tp[23]),
            h1: h1[0],
            h2: i16le(h[0], h[1]),
            h3: h[2],
            // H4/H5 share register 0xE5: H4 = E4[11:4]|E5[3:0], H5 = E6[11:4]|E5[7:4].
            h4: ((h[3] as i16) << 4) | ((h[4] & 0x0F) as i16),
            h5: ((h[5] as i16) << 4) | ((h[4] >> 4) as i16),
            h6: h[6] as i8,
        })
    }

    /// Returns (degrees C, t_fine for the other channels).
    fn compensate_temperature(&self, adc_t: u32) -> (f32, f32) {
        let adc_t = adc_t as f32;
        let var1 = (adc_t / 16384.0 - self.t1 as f32 / 1024.0) * self.t2 as f32;
        let var2 = (adc_t / 131072.0 - self.t1 as f32 / 8192.0)
            * (adc_t / 131072.0 - self.t1 as f32 / 8192.0)
            * self.t3 as f32;
        let t_fine = var1 + var2;
        (t_fine / 5120.0, t_fine)
    }

    /// Returns pascals.
    fn compensate_pressure(&self, adc_p: u32, t_fine: f32) -> f32 {
        let mut var1 = t_fine / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * self.p6 as f32 / 32768.0;
        var2 += var1 * self.p5 as f32 * 2.0;
        var2 = var2 / 4.0 + self.p4 as f32 * 65536.0;
        var1 = (self.p3 as f32 * var1 * var1 / 524288.0 + self.p2 as f32 * var1) / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * self.p1 as f32;
        if var1 == 0.0 {
            return 0.0;
        }
        let mut p = 1048576.0 - adc_p as f32;
        p = (p - var2 / 4096.0) * 6250.0 / var1;
        var1 = self.p9 as f32 * p * p / 2147483648.0;
        var2 = p * self.p8 as f32 / 32768.0;
        p + (var1 + var2 + self.p7 as f32) / 16.0
    }

    /// Returns %RH, clamped to the physical range.
    fn compensate_humidity(&self, adc_h: u32, t_fine: f32) -> f32 {
        let var_h = t_fine - 76800.0;
        let var_h = (adc_h as f32 - (self.h4 as f32 * 64.0 + self.h5 as f32 / 16384.0 * var_h))
            * (self.h2 as f32 / 65536.0
                * (1.0
                    + self.h6 as f32 / 67108864.0
                        * var_h
                        * (1.0 + self.h3 as f32 / 67108864.0 * var_h)));
        let var_h = var_h * (1.0 - self.h1 as f32 * var_h / 524288.0);
        var_h.clamp(0.0, 100.0)
    }
}
