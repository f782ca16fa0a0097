//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions, the sensor I2C bus, and the PIR interrupt
//! using raw ESP-IDF sys calls. Called once from `main()` before the
//! event loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    I2cInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::I2cInitFailed(rc) => write!(f, "I2C master init failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before event loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_i2c()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // PIR output is push-pull; no pulls, interrupt type set later by
    // init_isr_service().
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::PIR_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    info!("hw_init: GPIO inputs configured (PIR={})", pins::PIR_GPIO);
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let relay_pins = [
        pins::FAN_RELAY_GPIO,
        pins::LIGHT_RELAY_GPIO,
        pins::AC_RELAY_GPIO,
    ];

    for &pin in &relay_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        // Relay board is active-low: HIGH = released. Must hold before
        // the first control tick.
        unsafe { gpio_set_level(pin, 1) };
    }

    info!("hw_init: relay outputs configured, all released");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

/// Thin [`embedded_hal::digital::OutputPin`] wrapper over a raw GPIO
/// number, for drivers that are generic over the pin type.
pub struct SysPin(i32);

impl SysPin {
    pub fn new(pin: i32) -> Self {
        Self(pin)
    }
}

impl embedded_hal::digital::ErrorType for SysPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for SysPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.0, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.0, true);
        Ok(())
    }
}

// ── I2C master (sensor bus, port 0) ───────────────────────────

#[cfg(target_os = "espidf")]
const I2C_SENSOR_PORT: i32 = 0;
#[cfg(target_os = "espidf")]
const I2C_TIMEOUT_TICKS: u32 = 100;

#[cfg(target_os = "espidf")]
unsafe fn init_i2c() -> Result<(), HwInitError> {
    let mut cfg = i2c_config_t {
        mode: i2c_mode_t_I2C_MODE_MASTER,
        sda_io_num: pins::I2C_SDA_GPIO,
        scl_io_num: pins::I2C_SCL_GPIO,
        sda_pullup_en: true,
        scl_pullup_en: true,
        ..Default::default()
    };
    cfg.__bindgen_anon_1.master.clk_speed = pins::I2C_FREQ_HZ;

    // SAFETY: port 0 is configured exactly once, before the event loop.
    let ret = unsafe { i2c_param_config(I2C_SENSOR_PORT, &cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::I2cInitFailed(ret));
    }
    let ret = unsafe { i2c_driver_install(I2C_SENSOR_PORT, i2c_mode_t_I2C_MODE_MASTER, 0, 0, 0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::I2cInitFailed(ret));
    }

    info!(
        "hw_init: I2C0 master up (SDA={}, SCL={}, {} Hz)",
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO,
        pins::I2C_FREQ_HZ
    );
    Ok(())
}

/// Write `data` to a device on the sensor bus. Returns `false` on any
/// bus error (NACK, timeout).
#[cfg(target_os = "espidf")]
pub fn i2c_write(addr: u8, data: &[u8]) -> bool {
    // SAFETY: driver installed in init_i2c(); main-loop access only.
    let ret = unsafe {
        i2c_master_write_to_device(
            I2C_SENSOR_PORT,
            addr,
            data.as_ptr(),
            data.len(),
            I2C_TIMEOUT_TICKS,
        )
    };
    ret == ESP_OK as i32
}

#[cfg(not(target_os = "espidf"))]
pub fn i2c_write(_addr: u8, _data: &[u8]) -> bool {
    true
}

/// Write `reg` then read `buf.len()` bytes back in one transaction.
#[cfg(target_os = "espidf")]
pub fn i2c_write_read(addr: u8, reg: &[u8], buf: &mut [u8]) -> bool {
    // SAFETY: driver installed in init_i2c(); main-loop access only.
    let ret = unsafe {
        i2c_master_write_read_device(
            I2C_SENSOR_PORT,
            addr,
            reg.as_ptr(),
            reg.len(),
            buf.as_mut_ptr(),
            buf.len(),
            I2C_TIMEOUT_TICKS,
        )
    };
    ret == ESP_OK as i32
}

#[cfg(not(target_os = "espidf"))]
pub fn i2c_write_read(_addr: u8, _reg: &[u8], _buf: &mut [u8]) -> bool {
    true
}

/// Plain read for devices that stream from an internal pointer (BH1750).
#[cfg(target_os = "espidf")]
pub fn i2c_read(addr: u8, buf: &mut [u8]) -> bool {
    // SAFETY: driver installed in init_i2c(); main-loop access only.
    let ret = unsafe {
        i2c_master_read_from_device(
            I2C_SENSOR_PORT,
            addr,
            buf.as_mut_ptr(),
            buf.len(),
            I2C_TIMEOUT_TICKS,
        )
    };
    ret == ESP_OK as i32
}

#[cfg(not(target_os = "espidf"))]
pub fn i2c_read(_addr: u8, _buf: &mut [u8]) -> bool {
    true
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::events::{Event, push_event};

#[cfg(target_os = "espidf")]
unsafe extern "C" fn pir_gpio_isr(_arg: *mut core::ffi::c_void) {
    // HIGH = motion present.
    // SAFETY: gpio_get_level is a register read; safe in ISR context.
    let level = unsafe { gpio_get_level(pins::PIR_GPIO) } != 0;
    crate::sensors::motion::set_motion_from_isr(level);
    push_event(Event::MotionEdge);
}

/// Install the GPIO ISR service and register the PIR edge handler.
/// Call after init_peripherals() and before the event loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handler registered
    // below only touches atomics and the lock-free event queue.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        // PIR: any edge, so both motion start and end are captured.
        gpio_set_intr_type(pins::PIR_GPIO, gpio_int_type_t_GPIO_INTR_ANYEDGE);
        gpio_isr_handler_add(pins::PIR_GPIO, Some(pir_gpio_isr), core::ptr::null_mut());
        gpio_intr_enable(pins::PIR_GPIO);

        // Seed the motion atomic with the current level so the first
        // control tick sees a valid reading before any edge fires.
        let level = gpio_get_level(pins::PIR_GPIO) != 0;
        crate::sensors::motion::set_motion_from_isr(level);

        info!("hw_init: ISR service installed (PIR)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
