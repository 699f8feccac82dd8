//! Status LED: lit while the generator is busy.

use embedded_hal::digital::OutputPin;
use platform::StatusIndicator;

/// [`StatusIndicator`] over any push-pull output pin.
///
/// The pin is only written when the state changes; errors from the pin are
/// ignored because the LED is purely cosmetic.
pub struct PinIndicator<P: OutputPin> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> PinIndicator<P> {
    /// Wrap `pin`, assumed to start low.
    pub fn new(pin: P) -> Self {
        Self { pin, lit: false }
    }

    /// Release the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> StatusIndicator for PinIndicator<P> {
    fn set_active(&mut self, active: bool) {
        if active == self.lit {
            return;
        }
        let result = if active {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_ok() {
            self.lit = active;
        }
    }
}
