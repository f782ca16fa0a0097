//! GPIO / I2C pin map for the RoomSense board.
//!
//! Matches the reference wiring: BME280 + BH1750 + SSD1306 on I2C
//! (SDA 21 / SCL 22), PIR on GPIO 27, relays on 14 / 12 / 4.

/// PIR motion sensor input.
pub const PIR_GPIO: i32 = 27;

/// Fan relay output (active low).
pub const FAN_RELAY_GPIO: i32 = 14;
/// Light relay output (active low).
pub const LIGHT_RELAY_GPIO: i32 = 12;
/// Air-conditioner relay output (active low).
pub const AC_RELAY_GPIO: i32 = 4;

/// Sensor bus (I2C0): BME280 + BH1750.
pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;

/// Display bus (I2C1): SSD1306 OLED.
pub const OLED_SDA_GPIO: i32 = 25;
pub const OLED_SCL_GPIO: i32 = 26;

/// Bus clock for both I2C ports.
pub const I2C_FREQ_HZ: u32 = 100_000;

/// 7-bit I2C addresses.
pub const BME280_ADDR: u8 = 0x76;
pub const BH1750_ADDR: u8 = 0x23;
pub const OLED_ADDR: u8 = 0x3C;
