//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the RoomSense node: the
//! per-tick control cycle, the relay policy output, and structured event
//! emission. All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod reading;
pub mod service;
