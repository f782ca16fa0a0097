//! SSD1306 OLED display adapter.
//!
//! Implements [`DisplayPort`] by laying the composed [`Frame`] out as
//! FONT_6X10 text rows on the 128x64 panel (I2C1, dedicated bus so a
//! stuck display transaction cannot stall a sensor read).
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real panel via the `ssd1306` driver over
//!   an `esp-idf-hal` I2C master.
//! - **all other targets**: frames go to the debug log.

use crate::app::ports::DisplayPort;
use crate::error::DisplayError;
use crate::render::Frame;

#[cfg(target_os = "espidf")]
use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
#[cfg(target_os = "espidf")]
use esp_idf_hal::i2c::I2cDriver;
#[cfg(target_os = "espidf")]
use ssd1306::{
    I2CDisplayInterface, Ssd1306, mode::BufferedGraphicsMode, prelude::*, size::DisplaySize128x64,
};

/// Vertical pitch of one text row. 7 rows * 9 px fits the 64 px panel.
#[cfg(target_os = "espidf")]
const ROW_PITCH_PX: i32 = 9;

#[cfg(target_os = "espidf")]
type Panel = Ssd1306<
    I2CInterface<I2cDriver<'static>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

#[cfg(target_os = "espidf")]
pub struct OledDisplay {
    panel: Panel,
}

#[cfg(target_os = "espidf")]
impl OledDisplay {
    /// Bring the panel out of reset and clear it. Init failure is fatal
    /// at the call site — a control node without a panel is misbuilt.
    pub fn new(i2c: I2cDriver<'static>) -> Result<Self, DisplayError> {
        let interface = I2CDisplayInterface::new_custom_address(i2c, crate::pins::OLED_ADDR);
        let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel.init().map_err(|_| DisplayError::InitFailed)?;
        panel.flush().map_err(|_| DisplayError::InitFailed)?;
        Ok(Self { panel })
    }
}

#[cfg(target_os = "espidf")]
impl DisplayPort for OledDisplay {
    fn draw(&mut self, frame: &Frame) {
        self.panel.clear_buffer();
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        for (row, line) in frame.lines.iter().enumerate() {
            let origin = Point::new(0, row as i32 * ROW_PITCH_PX);
            if Text::with_baseline(line, origin, style, Baseline::Top)
                .draw(&mut self.panel)
                .is_err()
            {
                log::warn!("oled: text draw failed (row {})", row);
                return;
            }
        }

        // A dropped frame self-heals on the next tick; log and move on.
        if self.panel.flush().is_err() {
            log::warn!("oled: flush failed, frame dropped");
        }
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct OledDisplay;

#[cfg(not(target_os = "espidf"))]
impl OledDisplay {
    pub fn new() -> Result<Self, DisplayError> {
        Ok(Self)
    }
}

#[cfg(not(target_os = "espidf"))]
impl DisplayPort for OledDisplay {
    fn draw(&mut self, frame: &Frame) {
        for line in &frame.lines {
            log::debug!("oled(sim): {}", line);
        }
    }
}
