//! Presentation view — composes the display frame.
//!
//! Pure consumption: a [`Frame`] of fixed-capacity text lines is built from
//! the latest reading, the last-applied relay state, and the weather cache.
//! The view never recomputes policy and never mutates domain state; the
//! display adapter decides how the lines land on pixels.

use core::fmt::Write;

use crate::app::reading::{ActuatorState, SensorReading};
use crate::weather::WeatherCache;

/// Maximum lines a display adapter must handle.
pub const MAX_LINES: usize = 7;
/// Characters per line (sized for a 128-px panel at the 6x10 font).
pub const LINE_CHARS: usize = 21;

pub type Line = heapless::String<LINE_CHARS>;

/// One composed display frame. Lines are ordered top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub lines: heapless::Vec<Line, MAX_LINES>,
}

impl Frame {
    fn push(&mut self, line: Line) {
        // MAX_LINES is an upper bound on what compose() emits.
        let _ = self.lines.push(line);
    }
}

/// Stateless frame composer.
pub struct PresentationView;

impl PresentationView {
    /// Build the frame for one control tick.
    ///
    /// The outdoor line distinguishes three states: no link at all,
    /// link up but no fetch has ever succeeded, and cached data (shown
    /// regardless of age). A zero-initialised cache is never rendered
    /// as `0.0C`.
    pub fn compose(
        reading: &SensorReading,
        actuators: &ActuatorState,
        weather: &WeatherCache,
        connected: bool,
    ) -> Frame {
        let mut frame = Frame::default();

        frame.push(line(format_args!("Temp: {:.1}C", reading.temperature_c)));
        frame.push(line(format_args!("Humidity: {:.0}%", reading.humidity_pct)));
        frame.push(line(format_args!("Press: {:.1} hPa", reading.pressure_hpa)));
        frame.push(line(format_args!("Light: {:.0} lux", reading.lux)));
        frame.push(line(format_args!(
            "Motion:{} AC:{}",
            yes_no(reading.motion),
            on_off(actuators.ac_on)
        )));
        frame.push(line(format_args!(
            "Fan:{} Light:{}",
            on_off(actuators.fan_on),
            on_off(actuators.light_on)
        )));

        let outdoor = match (connected, weather.outdoor()) {
            (false, _) => line(format_args!("Out: no link")),
            (true, None) => line(format_args!("Out: no data")),
            (true, Some((t, h))) => line(format_args!("Out: {:.1}C {:.0}%", t, h)),
        };
        frame.push(outdoor);

        frame
    }
}

fn line(args: core::fmt::Arguments<'_>) -> Line {
    let mut s = Line::new();
    // Overflow truncates the line; a clipped cell beats a dropped frame.
    let _ = s.write_fmt(args);
    s
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

fn yes_no(yes: bool) -> &'static str {
    if yes { "Yes" } else { "No" }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::OutdoorReading;

    fn reading() -> SensorReading {
        SensorReading {
            temperature_c: 24.5,
            humidity_pct: 60.0,
            pressure_hpa: 1013.2,
            lux: 42.0,
            motion: true,
        }
    }

    fn joined(frame: &Frame) -> String {
        frame
            .lines
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn indoor_lines_reflect_the_reading() {
        let frame = PresentationView::compose(
            &reading(),
            &ActuatorState::all_off(),
            &WeatherCache::new(),
            false,
        );
        let text = joined(&frame);
        assert!(text.contains("Temp: 24.5C"));
        assert!(text.contains("Humidity: 60%"));
        assert!(text.contains("Press: 1013.2 hPa"));
        assert!(text.contains("Light: 42 lux"));
        assert!(text.contains("Motion:Yes"));
    }

    #[test]
    fn actuator_lines_show_the_applied_state_verbatim() {
        // The view renders whatever state it is handed — even one a fresh
        // policy evaluation would contradict. Display never recomputes.
        let stale = ActuatorState {
            fan_on: true,
            light_on: false,
            ac_on: true,
        };
        let frame =
            PresentationView::compose(&reading(), &stale, &WeatherCache::new(), false);
        let text = joined(&frame);
        assert!(text.contains("Fan:ON Light:OFF"));
        assert!(text.contains("AC:ON"));
    }

    #[test]
    fn no_link_state_wins_over_cache_contents() {
        let mut cache = WeatherCache::new();
        cache.store(
            OutdoorReading {
                temp_c: 22.0,
                humidity_pct: 55.0,
            },
            30_000,
        );
        let frame =
            PresentationView::compose(&reading(), &ActuatorState::all_off(), &cache, false);
        assert!(joined(&frame).contains("Out: no link"));
    }

    #[test]
    fn connected_without_data_never_shows_zeroes() {
        let frame = PresentationView::compose(
            &reading(),
            &ActuatorState::all_off(),
            &WeatherCache::new(),
            true,
        );
        let text = joined(&frame);
        assert!(text.contains("Out: no data"));
        assert!(!text.contains("Out: 0.0C"));
    }

    #[test]
    fn valid_cache_renders_outdoor_values() {
        let mut cache = WeatherCache::new();
        cache.store(
            OutdoorReading {
                temp_c: 22.0,
                humidity_pct: 55.0,
            },
            30_000,
        );
        let frame =
            PresentationView::compose(&reading(), &ActuatorState::all_off(), &cache, true);
        assert!(joined(&frame).contains("Out: 22.0C 55%"));
    }

    #[test]
    fn frame_fits_the_advertised_bounds() {
        let frame = PresentationView::compose(
            &reading(),
            &ActuatorState {
                fan_on: true,
                light_on: true,
                ac_on: true,
            },
            &WeatherCache::new(),
            true,
        );
        assert_eq!(frame.lines.len(), MAX_LINES);
        for l in &frame.lines {
            assert!(l.len() <= LINE_CHARS);
        }
    }
}
