//! RoomSense firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod net;
pub mod pins;
pub mod render;
pub mod scheduler;
pub mod weather;

// The ESP-IDF-only paths inside these are guarded by cfg attributes;
// on other targets they compile to the simulation stubs.
pub mod adapters;
pub mod drivers;
pub mod sensors;
