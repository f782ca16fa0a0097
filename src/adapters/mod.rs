//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                |
//! |------------|--------------|----------------------------|
//! | `hardware` | SensorPort   | BME280, BH1750, PIR (I2C0) |
//! |            | ActuatorPort | Relay board GPIO           |
//! | `oled`     | DisplayPort  | SSD1306 128x64 (I2C1)      |
//! | `wifi`     | NetworkPort  | ESP-IDF WiFi STA + HTTP    |
//! | `log_sink` | EventSink    | Serial log output          |
//! | `time`     | —            | ESP32 system timer         |

pub mod hardware;
pub mod log_sink;
pub mod oled;
pub mod time;
pub mod wifi;
