//! I2C bus abstractions
//!
//! Provides traits for I2C master operations that can be implemented
//! by chip-specific HALs.

use core::cell::RefCell;

/// I2C bus master
///
/// The single required operation is [`I2cBus::tx`]; every other method is
/// expressed in terms of it.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Perform one transaction with the device at `address`
    ///
    /// If `write` is non-empty its bytes are sent first. If `read` is
    /// non-empty it is then filled from the device, with a repeated start
    /// between the two phases when both are present. The implementation
    /// must guarantee the repeated start: drivers rely on it to read a
    /// register without releasing the bus.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write` - Bytes to write (may be empty)
    /// * `read` - Buffer to read into (may be empty)
    fn tx(&mut self, address: u16, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error>;

    /// Write data to a device at the given address
    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Self::Error> {
        self.tx(address, data, &mut [])
    }

    /// Read data from a device at the given address
    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.tx(address, &[], buf)
    }

    /// Write then read in a single transaction (repeated start)
    fn write_read(
        &mut self,
        address: u16,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.tx(address, write_data, read_buf)
    }

    /// Read `buf.len()` bytes starting at register `register`
    fn read_register(&mut self, address: u16, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.tx(address, &[register], buf)
    }
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn tx(&mut self, address: u16, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        (**self).tx(address, write, read)
    }
}

/// Shared borrow of a bus controller
///
/// Each transaction borrows the controller mutably for its duration only,
/// so several drivers may keep a `&RefCell<T>` to the same bus. A
/// transaction started while another is in flight panics in
/// `RefCell::borrow_mut`; drivers never nest transactions.
impl<T: I2cBus> I2cBus for &RefCell<T> {
    type Error = T::Error;

    fn tx(&mut self, address: u16, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        self.borrow_mut().tx(address, write, read)
    }
}
