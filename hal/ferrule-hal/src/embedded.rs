//! Adaptors for `embedded-hal` 1.0 implementations
//!
//! Most chip HALs already implement the `embedded-hal` traits. Wrapping a
//! peripheral in one of these newtypes makes it usable by every Ferrule
//! driver without writing a dedicated implementation.
//!
//! ```ignore
//! let i2c = EhI2c(embassy_rp::i2c::I2c::new_blocking(p.I2C0, scl, sda, cfg));
//! let mut sensor = Mcp9808::new(i2c);
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::delay::Delay;
use crate::i2c::I2cBus;
use crate::spi::SpiBus;

/// Errors from [`EhI2c`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EhI2cError<E> {
    /// The controller reported an error
    Bus(E),
    /// Address does not fit in 7 bits; nothing was sent
    Address(u16),
}

/// [`I2cBus`] over an `embedded_hal::i2c::I2c` controller (7-bit addressing)
#[derive(Debug)]
pub struct EhI2c<T>(pub T);

impl<T: I2c> I2cBus for EhI2c<T> {
    type Error = EhI2cError<T::Error>;

    fn tx(&mut self, address: u16, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        let address = match u8::try_from(address) {
            Ok(a) if a <= 0x7F => a,
            _ => return Err(EhI2cError::Address(address)),
        };
        match (write.is_empty(), read.is_empty()) {
            (_, true) => self.0.write(address, write),
            (true, false) => self.0.read(address, read),
            (false, false) => self.0.write_read(address, write, read),
        }
        .map_err(EhI2cError::Bus)
    }
}

/// [`SpiBus`] over an `embedded_hal::spi::SpiBus` controller
#[derive(Debug)]
pub struct EhSpi<T>(pub T);

impl<T: embedded_hal::spi::SpiBus<u8>> SpiBus for EhSpi<T> {
    type Error = T::Error;

    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut buf = [byte];
        self.transfer_in_place(&mut buf)?;
        Ok(buf[0])
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        self.0.transfer_in_place(data)?;
        // The bus may return before the last byte is clocked
        self.0.flush()
    }
}

/// [`Delay`] over an `embedded_hal::delay::DelayNs` provider
#[derive(Debug)]
pub struct EhDelay<T>(pub T);

impl<T: DelayNs> Delay for EhDelay<T> {
    fn sleep_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}
