//! TMP102 digital temperature sensor (I2C)
//!
//! The temperature register holds a left-aligned 12-bit two's complement
//! value in 1/16 °C.

use ferrule_core::traits::TemperatureSensor;
use ferrule_core::{Driver, DriverState, Error};
use ferrule_hal::i2c::I2cBus;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_ADDRESS: u16 = 0x48;

pub const REG_TEMPERATURE: u8 = 0x00;
pub const REG_CONFIG: u8 = 0x01;

/// Unit of [`Tmp102::read_temperature`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Unit {
    /// milli-degrees Celsius
    #[default]
    Celsius,
    /// milli-degrees Fahrenheit
    Fahrenheit,
}

/// TMP102 configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tmp102Config {
    /// 0x48..=0x4B, set by the ADD0 pin
    pub address: u16,
    pub unit: Unit,
}

impl Default for Tmp102Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            unit: Unit::Celsius,
        }
    }
}

/// Decode the temperature register to milli-degrees Celsius
pub fn decode_temperature(msb: u8, lsb: u8) -> i32 {
    let raw = i16::from_be_bytes([msb, lsb]) >> 4;
    raw as i32 * 625 / 10
}

/// Convert milli-degrees Celsius to milli-degrees Fahrenheit
pub fn to_milli_fahrenheit(milli_celsius: i32) -> i32 {
    milli_celsius * 9 / 5 + 32_000
}

/// TMP102 driver
pub struct Tmp102<I2C> {
    bus: I2C,
    config: Tmp102Config,
    state: DriverState,
}

impl<I2C: I2cBus> Tmp102<I2C> {
    /// Create a new driver; no bus traffic
    pub fn new(bus: I2C) -> Self {
        Self {
            bus,
            config: Tmp102Config::default(),
            state: DriverState::Created,
        }
    }

    /// Read the temperature in milli-degrees of the configured unit
    pub fn read_temperature(&mut self) -> Result<i32, Error> {
        let milli_celsius = self.read_milli_celsius()?;
        Ok(match self.config.unit {
            Unit::Celsius => milli_celsius,
            Unit::Fahrenheit => to_milli_fahrenheit(milli_celsius),
        })
    }

    fn read_register(&mut self, register: u8) -> Result<[u8; 2], Error> {
        let mut buf = [0u8; 2];
        self.bus
            .read_register(self.config.address, register, &mut buf)
            .map_err(|_| Error::Bus)?;
        Ok(buf)
    }
}

impl<I2C: I2cBus> Driver for Tmp102<I2C> {
    type Config = Tmp102Config;

    /// Check the address and that the sensor answers
    fn configure(&mut self, config: Tmp102Config) -> Result<(), Error> {
        let result = if (0x48..=0x4B).contains(&config.address) {
            self.config = config;
            self.read_register(REG_CONFIG).map(|_| ())
        } else {
            Err(Error::InvalidConfig)
        };
        self.state.settle(result)
    }

    fn state(&self) -> DriverState {
        self.state
    }
}

impl<I2C: I2cBus> TemperatureSensor for Tmp102<I2C> {
    /// Always Celsius, whatever the configured unit
    fn read_milli_celsius(&mut self) -> Result<i32, Error> {
        self.state.ensure_ready()?;
        let [msb, lsb] = self.read_register(REG_TEMPERATURE)?;
        Ok(decode_temperature(msb, lsb))
    }
}
