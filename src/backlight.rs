//! Backlight enable line.

use embedded_hal::digital::OutputPin;

/// Binary backlight control over a digital output.
///
/// The line must never light the panel before the controller is fully
/// configured, so construction does not touch the pin; [`Backlight::arm`]
/// drives it to the off level as part of bring-up.
pub struct Backlight<P> {
    pin: P,
    enabled: bool,
}

impl<P: OutputPin> Backlight<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            enabled: false,
        }
    }

    /// Drives the line off and makes it controllable.
    pub fn arm(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()?;
        self.enabled = false;
        Ok(())
    }

    /// Drives the line fully on or off. No intermediate levels.
    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        if on {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.enabled = on;
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Releases the pin.
    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[derive(Default)]
    struct FakePin {
        levels: Vec<bool>,
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.levels.push(true);
            Ok(())
        }
    }

    #[test]
    fn arm_drives_the_line_low() {
        let mut backlight = Backlight::new(FakePin::default());

        backlight.arm().unwrap();

        assert!(!backlight.is_enabled());
        assert_eq!(backlight.release().levels, vec![false]);
    }

    #[test]
    fn set_tracks_the_line_level() {
        let mut backlight = Backlight::new(FakePin::default());
        backlight.arm().unwrap();

        backlight.set(true).unwrap();
        assert!(backlight.is_enabled());

        backlight.set(false).unwrap();
        assert!(!backlight.is_enabled());

        assert_eq!(backlight.release().levels, vec![false, true, false]);
    }
}
