//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by chip-specific HALs.

/// Electrical mode of a GPIO line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Push-pull output
    Output,
    /// High-impedance input
    InputFloating,
    /// Input with the internal pull-up enabled
    InputPullup,
}

/// Signal edge that triggers a pin interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low to high transition
    Rising,
    /// High to low transition
    Falling,
    /// Any transition
    Toggle,
}

/// Errors from enabling a pin interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptError {
    /// The pin (or chip) cannot raise interrupts on the requested edge
    Unsupported,
}

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Toggle the pin state
    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
///
/// Reads take `&self` so an interrupt handler can sample a pin that is
/// owned by a driver living in a `static`.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Pin whose electrical mode can be changed at run time
///
/// Bit-banged protocols use this to emulate an open-drain line: drive low
/// as [`PinMode::Output`], release by switching to an input and letting the
/// external pull-up raise the line.
pub trait ConfigurablePin {
    /// Put the pin into the given mode
    fn configure(&mut self, mode: PinMode);
}

/// Pin that can raise an edge interrupt
///
/// Enabling the interrupt is all the driver asks of the HAL. The
/// application's interrupt vector is responsible for calling the
/// driver's handler (for example `QuadratureEncoder::on_edge`).
pub trait InterruptPin {
    /// Enable the interrupt for `edge`
    ///
    /// Returns [`InterruptError::Unsupported`] if this pin cannot
    /// generate interrupts on that edge.
    fn set_interrupt(&mut self, edge: Edge) -> Result<(), InterruptError>;

    /// Disable any interrupt on this pin
    fn clear_interrupt(&mut self);
}

/// Pin that can be used for both input and output
///
/// Some applications need to read the state of an output pin or
/// dynamically switch between input and output modes.
pub trait IoPin: OutputPin + InputPin + ConfigurablePin {}

// Blanket implementation for types that implement all three traits
impl<T: OutputPin + InputPin + ConfigurablePin> IoPin for T {}
