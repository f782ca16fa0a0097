//! Unified error types for the RoomSense firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level boot path's error handling uniform. All variants are `Copy` so
//! they can be cheaply passed through events and telemetry without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read.
    Sensor(SensorError),
    /// The display could not be initialised or driven.
    Display(DisplayError),
    /// A network operation failed.
    Net(NetError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Net(e) => write!(f, "net: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C transaction with the sensor failed or timed out.
    I2cReadFailed,
    /// GPIO read returned an error.
    GpioReadFailed,
    /// Reading is outside the physically plausible range.
    OutOfRange,
    /// Sensor has not completed its first measurement cycle yet.
    NotReady,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2cReadFailed => write!(f, "I2C read failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::NotReady => write!(f, "sensor not ready"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Controller did not acknowledge the init sequence.
    InitFailed,
    /// I2C write to the controller failed.
    BusWriteFailed,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed => write!(f, "controller init failed"),
            Self::BusWriteFailed => write!(f, "bus write failed"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

// ---------------------------------------------------------------------------
// Network errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// No WiFi credentials configured.
    NoCredentials,
    /// The station could not associate with the AP.
    ConnectFailed,
    /// An operation that requires a link was called while disconnected.
    NotConnected,
    /// The HTTP request failed at the transport level (socket, DNS, timeout).
    RequestFailed,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::ConnectFailed => write!(f, "WiFi connect failed"),
            Self::NotConnected => write!(f, "not connected"),
            Self::RequestFailed => write!(f, "HTTP request failed"),
        }
    }
}

impl From<NetError> for Error {
    fn from(e: NetError) -> Self {
        Self::Net(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
