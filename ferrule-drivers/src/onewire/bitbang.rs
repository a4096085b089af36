//! Bit-banged 1-Wire master on a single GPIO
//!
//! The line needs an external pull-up (4.7 kΩ typical). Open-drain output
//! is emulated by switching the pin between driven-low output and
//! pulled-up input, so the master never drives the line high.
//!
//! Slot timings (standard speed):
//!
//! ```text
//! reset    low 480 µs, release, sample presence after 70 µs, wait 410 µs
//! write 1  low   6 µs, release  64 µs
//! write 0  low  60 µs, release  10 µs
//! read     low   3 µs, release, sample after 8 µs, wait 60 µs
//! ```
//!
//! A bit slot is only a few microseconds wide, so an interrupt firing in
//! the middle of one corrupts it. Callers that cannot tolerate retries
//! should mask interrupts around whole transactions.

use core::convert::Infallible;

use ferrule_hal::delay::Delay;
use ferrule_hal::gpio::{ConfigurablePin, InputPin, OutputPin, PinMode};
use ferrule_hal::onewire::OneWire;

pub const RESET_LOW_US: u32 = 480;
pub const PRESENCE_SAMPLE_US: u32 = 70;
pub const RESET_RECOVERY_US: u32 = 410;

pub const WRITE_ONE_LOW_US: u32 = 6;
pub const WRITE_ONE_RELEASE_US: u32 = 64;
pub const WRITE_ZERO_LOW_US: u32 = 60;
pub const WRITE_ZERO_RELEASE_US: u32 = 10;

pub const READ_LOW_US: u32 = 3;
pub const READ_SAMPLE_US: u32 = 8;
pub const READ_RECOVERY_US: u32 = 60;

/// 1-Wire bus master on one GPIO line
pub struct GpioOneWire<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> GpioOneWire<P, D>
where
    P: OutputPin + InputPin + ConfigurablePin,
    D: Delay,
{
    /// Create a new bus master
    ///
    /// The pin is left untouched until the first reset.
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Release the pin and delay provider
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    fn drive_low(&mut self) {
        self.pin.configure(PinMode::Output);
        self.pin.set_low();
    }

    fn release_line(&mut self) {
        self.pin.configure(PinMode::InputPullup);
    }
}

impl<P, D> OneWire for GpioOneWire<P, D>
where
    P: OutputPin + InputPin + ConfigurablePin,
    D: Delay,
{
    type Error = Infallible;

    fn reset(&mut self) -> Result<bool, Infallible> {
        self.drive_low();
        self.delay.sleep_us(RESET_LOW_US);
        self.release_line();
        self.delay.sleep_us(PRESENCE_SAMPLE_US);
        let present = self.pin.is_low();
        self.delay.sleep_us(RESET_RECOVERY_US);
        Ok(present)
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), Infallible> {
        let (low, release) = if bit {
            (WRITE_ONE_LOW_US, WRITE_ONE_RELEASE_US)
        } else {
            (WRITE_ZERO_LOW_US, WRITE_ZERO_RELEASE_US)
        };
        self.drive_low();
        self.delay.sleep_us(low);
        self.release_line();
        self.delay.sleep_us(release);
        Ok(())
    }

    fn read_bit(&mut self) -> Result<bool, Infallible> {
        self.drive_low();
        self.delay.sleep_us(READ_LOW_US);
        self.release_line();
        self.delay.sleep_us(READ_SAMPLE_US);
        let bit = self.pin.is_high();
        self.delay.sleep_us(READ_RECOVERY_US);
        Ok(bit)
    }
}
