//! 1-Wire bus abstractions
//!
//! A 1-Wire master only needs three primitives: a reset/presence cycle and
//! single-bit write and read slots. Byte transfers and device addressing
//! are built on top of them, but an implementation backed by a bridge chip
//! (DS2482 and friends) may override them with native commands.

use core::cell::RefCell;

/// ROM command: read the id of the only device on the bus
pub const READ_ROM: u8 = 0x33;
/// ROM command: address one device by id
pub const MATCH_ROM: u8 = 0x55;
/// ROM command: address every device on the bus
pub const SKIP_ROM: u8 = 0xCC;
/// ROM command: enumerate device ids
pub const SEARCH_ROM: u8 = 0xF0;
/// ROM command: enumerate devices with an alarm condition
pub const ALARM_SEARCH: u8 = 0xEC;

/// 1-Wire bus master
pub trait OneWire {
    /// Error type for bus operations
    ///
    /// Bit-banged masters cannot fail and use `core::convert::Infallible`.
    type Error;

    /// Issue a reset pulse
    ///
    /// Returns `true` if at least one device answered with a presence pulse.
    fn reset(&mut self) -> Result<bool, Self::Error>;

    /// Write one bit slot
    fn write_bit(&mut self, bit: bool) -> Result<(), Self::Error>;

    /// Read one bit slot
    fn read_bit(&mut self) -> Result<bool, Self::Error>;

    /// Write a byte, least significant bit first
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        let mut data = byte;
        for _ in 0..8 {
            self.write_bit(data & 1 == 1)?;
            data >>= 1;
        }
        Ok(())
    }

    /// Read a byte, least significant bit first
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut data = 0u8;
        for _ in 0..8 {
            data >>= 1;
            if self.read_bit()? {
                data |= 0x80;
            }
        }
        Ok(data)
    }

    /// Reset the bus and address a device
    ///
    /// With `Some(id)` a Match ROM command followed by the eight id bytes
    /// is sent; with `None` a Skip ROM command addresses every device.
    /// Returns `false`, without sending anything after the reset, when no
    /// device answered the reset.
    fn select(&mut self, rom: Option<&[u8; 8]>) -> Result<bool, Self::Error> {
        if !self.reset()? {
            return Ok(false);
        }
        match rom {
            None => self.write_byte(SKIP_ROM)?,
            Some(id) => {
                self.write_byte(MATCH_ROM)?;
                for &byte in id {
                    self.write_byte(byte)?;
                }
            }
        }
        Ok(true)
    }
}

impl<T: OneWire + ?Sized> OneWire for &mut T {
    type Error = T::Error;

    fn reset(&mut self) -> Result<bool, Self::Error> {
        (**self).reset()
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), Self::Error> {
        (**self).write_bit(bit)
    }

    fn read_bit(&mut self) -> Result<bool, Self::Error> {
        (**self).read_bit()
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).write_byte(byte)
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        (**self).read_byte()
    }

    fn select(&mut self, rom: Option<&[u8; 8]>) -> Result<bool, Self::Error> {
        (**self).select(rom)
    }
}

impl<T: OneWire> OneWire for &RefCell<T> {
    type Error = T::Error;

    fn reset(&mut self) -> Result<bool, Self::Error> {
        self.borrow_mut().reset()
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), Self::Error> {
        self.borrow_mut().write_bit(bit)
    }

    fn read_bit(&mut self) -> Result<bool, Self::Error> {
        self.borrow_mut().read_bit()
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.borrow_mut().write_byte(byte)
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.borrow_mut().read_byte()
    }

    fn select(&mut self, rom: Option<&[u8; 8]>) -> Result<bool, Self::Error> {
        self.borrow_mut().select(rom)
    }
}
