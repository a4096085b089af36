//! MCP9808 digital temperature sensor (I2C)
//!
//! ±0.25°C typical accuracy, up to 0.0625°C resolution. The ambient
//! temperature register holds three alert flags followed by a 13-bit
//! two's complement value in 1/16 °C:
//!
//! ```text
//! MSB: [crit][upper][lower][sign][ 2^7 .. 2^4 ]
//! LSB: [ 2^3 .. 2^0 ][ 2^-1 .. 2^-4 ]
//! ```

use ferrule_core::traits::TemperatureSensor;
use ferrule_core::{Driver, DriverState, Error};
use ferrule_hal::i2c::I2cBus;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_ADDRESS: u16 = 0x18;

pub const REG_AMBIENT_TEMP: u8 = 0x05;
pub const REG_DEVICE_ID: u8 = 0x07;
pub const REG_RESOLUTION: u8 = 0x08;

/// Device id register contents (device 0x04, revision 0x00)
pub const DEVICE_ID: u16 = 0x0400;

/// Conversion resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Resolution {
    /// 0.5°C, 30 ms
    Low,
    /// 0.25°C, 65 ms
    Medium,
    /// 0.125°C, 130 ms
    High,
    /// 0.0625°C, 250 ms (power-on default)
    #[default]
    Maximum,
}

impl Resolution {
    fn register_value(self) -> u8 {
        match self {
            Resolution::Low => 0,
            Resolution::Medium => 1,
            Resolution::High => 2,
            Resolution::Maximum => 3,
        }
    }

    fn from_register(value: u8) -> Self {
        match value & 0x03 {
            0 => Resolution::Low,
            1 => Resolution::Medium,
            2 => Resolution::High,
            _ => Resolution::Maximum,
        }
    }
}

/// MCP9808 configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mcp9808Config {
    /// 0x18..=0x1F, set by the A0..A2 pins
    pub address: u16,
    pub resolution: Resolution,
}

impl Default for Mcp9808Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            resolution: Resolution::default(),
        }
    }
}

/// Decode the ambient temperature register to milli-degrees Celsius
pub fn decode_ambient(msb: u8, lsb: u8) -> i32 {
    let bits = (((msb & 0x1F) as u16) << 8) | lsb as u16;
    // Sign-extend from 13 bits
    let raw = ((bits << 3) as i16) >> 3;
    raw as i32 * 625 / 10
}

/// MCP9808 driver
pub struct Mcp9808<I2C> {
    bus: I2C,
    address: u16,
    state: DriverState,
}

impl<I2C: I2cBus> Mcp9808<I2C> {
    /// Create a new driver; no bus traffic
    pub fn new(bus: I2C) -> Self {
        Self {
            bus,
            address: DEFAULT_ADDRESS,
            state: DriverState::Created,
        }
    }

    /// Read the ambient temperature in milli-degrees Celsius
    pub fn read_temperature(&mut self) -> Result<i32, Error> {
        self.state.ensure_ready()?;
        let [msb, lsb] = self.read_u16(REG_AMBIENT_TEMP)?.to_be_bytes();
        Ok(decode_ambient(msb, lsb))
    }

    pub fn read_resolution(&mut self) -> Result<Resolution, Error> {
        self.state.ensure_ready()?;
        let mut buf = [0u8; 1];
        self.bus
            .read_register(self.address, REG_RESOLUTION, &mut buf)
            .map_err(|_| Error::Bus)?;
        Ok(Resolution::from_register(buf[0]))
    }

    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error> {
        self.state.ensure_ready()?;
        self.write_resolution(resolution)
    }

    fn write_resolution(&mut self, resolution: Resolution) -> Result<(), Error> {
        self.bus
            .write(self.address, &[REG_RESOLUTION, resolution.register_value()])
            .map_err(|_| Error::Bus)
    }

    fn read_u16(&mut self, register: u8) -> Result<u16, Error> {
        let mut buf = [0u8; 2];
        self.bus
            .read_register(self.address, register, &mut buf)
            .map_err(|_| Error::Bus)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn probe(&mut self) -> Result<(), Error> {
        match self.read_u16(REG_DEVICE_ID)? {
            DEVICE_ID => Ok(()),
            _id => {
                warn!("mcp9808: unexpected device id {=u16:#x}", _id);
                Err(Error::NotConnected)
            }
        }
    }
}

impl<I2C: I2cBus> Driver for Mcp9808<I2C> {
    type Config = Mcp9808Config;

    /// Check the device id and set the resolution
    fn configure(&mut self, config: Mcp9808Config) -> Result<(), Error> {
        let result = if (0x18..=0x1F).contains(&config.address) {
            self.address = config.address;
            self.probe()
                .and_then(|()| self.write_resolution(config.resolution))
        } else {
            Err(Error::InvalidConfig)
        };
        self.state.settle(result)
    }

    fn state(&self) -> DriverState {
        self.state
    }

    /// Read the device id register
    fn connected(&mut self) -> bool {
        self.probe().is_ok()
    }
}

impl<I2C: I2cBus> TemperatureSensor for Mcp9808<I2C> {
    fn read_milli_celsius(&mut self) -> Result<i32, Error> {
        self.read_temperature()
    }
}
