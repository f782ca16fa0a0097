//! Active-low relay channel driver.
//!
//! The relay board energises a channel when its input is pulled LOW, so
//! the logical "on" maps to a low pin level and boot-safe means driving
//! the pin HIGH before anything else runs. The driver is generic over
//! [`embedded_hal::digital::OutputPin`] so the same code runs against the
//! real GPIO wrapper on target and a mock pin in tests.
//!
//! Writes are unconditional: callers re-apply the desired level every
//! control tick and the driver mirrors that to the pin.

use embedded_hal::digital::OutputPin;

pub struct Relay<P> {
    pin: P,
    energized: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Wrap a pin. Callers release the channel right after construction;
    /// hw_init already parks the line HIGH at boot.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            energized: false,
        }
    }

    /// Drive the channel: `true` energises (pin LOW).
    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        if on {
            self.pin.set_low()?;
        } else {
            self.pin.set_high()?;
        }
        self.energized = on;
        Ok(())
    }

    pub fn release(&mut self) -> Result<(), P::Error> {
        self.set(false)
    }

    pub fn is_energized(&self) -> bool {
        self.energized
    }
}
