//! BH1750 ambient light sensor (I2C)
//!
//! The sensor has no registers: every command is a single opcode byte and
//! a read returns the 16-bit big-endian measurement count. Illuminance is
//! `count / 1.2` lux, halved in the high-resolution mode 2, which this
//! driver computes in integer milli-lux.
//!
//! One-shot modes power the sensor down after each measurement, so
//! [`Bh1750::illuminance`] triggers a new one (and waits for it) unless a
//! fresh result from `set_mode` is still unread.

use ferrule_core::{Driver, DriverState, Error};
use ferrule_hal::delay::Delay;
use ferrule_hal::i2c::I2cBus;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const POWER_DOWN: u8 = 0x00;
pub const POWER_ON: u8 = 0x01;

/// Measurement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    /// 1 lx resolution, continuous
    #[default]
    ContinuousHighRes,
    /// 0.5 lx resolution, continuous
    ContinuousHighRes2,
    /// 4 lx resolution, continuous
    ContinuousLowRes,
    /// 1 lx resolution, then power down
    OneShotHighRes,
    /// 0.5 lx resolution, then power down
    OneShotHighRes2,
    /// 4 lx resolution, then power down
    OneShotLowRes,
}

impl Mode {
    /// Command byte selecting this mode
    pub fn opcode(self) -> u8 {
        match self {
            Mode::ContinuousHighRes => 0x10,
            Mode::ContinuousHighRes2 => 0x11,
            Mode::ContinuousLowRes => 0x13,
            Mode::OneShotHighRes => 0x20,
            Mode::OneShotHighRes2 => 0x21,
            Mode::OneShotLowRes => 0x23,
        }
    }

    pub fn is_one_shot(self) -> bool {
        matches!(
            self,
            Mode::OneShotHighRes | Mode::OneShotHighRes2 | Mode::OneShotLowRes
        )
    }

    /// Maximum measurement time from the datasheet
    pub fn measurement_time_ms(self) -> u32 {
        match self {
            Mode::ContinuousLowRes | Mode::OneShotLowRes => 24,
            _ => 180,
        }
    }

    /// Tenths of lux per count, times 1.2
    fn coefficient(self) -> u32 {
        match self {
            Mode::ContinuousHighRes2 | Mode::OneShotHighRes2 => 5,
            _ => 10,
        }
    }
}

/// I2C address selected by the ADDR pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Address {
    /// ADDR low (0x23)
    #[default]
    Low,
    /// ADDR high (0x5C)
    High,
}

impl Address {
    pub fn value(self) -> u16 {
        match self {
            Address::Low => 0x23,
            Address::High => 0x5C,
        }
    }
}

/// BH1750 configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bh1750Config {
    pub mode: Mode,
    pub address: Address,
}

/// Convert a measurement count to milli-lux
pub fn milli_lux(count: u16, mode: Mode) -> u32 {
    count as u32 * mode.coefficient() * 1000 / 12
}

/// BH1750 driver
pub struct Bh1750<I2C, D> {
    bus: I2C,
    delay: D,
    config: Bh1750Config,
    powered: bool,
    /// A measurement finished since the last read
    fresh: bool,
    state: DriverState,
}

impl<I2C: I2cBus, D: Delay> Bh1750<I2C, D> {
    /// Create a new driver; no bus traffic
    pub fn new(bus: I2C, delay: D) -> Self {
        Self {
            bus,
            delay,
            config: Bh1750Config::default(),
            powered: false,
            fresh: false,
            state: DriverState::Created,
        }
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Switch measurement mode
    ///
    /// Blocks for the measurement time of the new mode so the next read
    /// returns a result taken in it.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        self.state.ensure_ready()?;
        self.apply_mode(mode)
    }

    /// Read the raw measurement count
    pub fn raw_sensor_data(&mut self) -> Result<u16, Error> {
        self.state.ensure_ready()?;
        let mut buf = [0u8; 2];
        self.bus
            .read(self.config.address.value(), &mut buf)
            .map_err(|_| Error::Bus)?;
        self.fresh = false;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read the illuminance in milli-lux
    ///
    /// In one-shot modes this starts a measurement and blocks until it is
    /// done, unless an unread one is available.
    pub fn illuminance(&mut self) -> Result<u32, Error> {
        self.state.ensure_ready()?;
        let mode = self.config.mode;
        if mode.is_one_shot() && !self.fresh {
            self.command(mode.opcode())?;
            self.delay.sleep_ms(mode.measurement_time_ms());
        }
        let count = self.raw_sensor_data()?;
        if mode.is_one_shot() {
            self.powered = false;
        }
        Ok(milli_lux(count, mode))
    }

    /// Enter power down; the next `set_mode` powers the sensor back on
    pub fn power_down(&mut self) -> Result<(), Error> {
        self.state.ensure_ready()?;
        self.command(POWER_DOWN)?;
        self.powered = false;
        self.fresh = false;
        Ok(())
    }

    fn command(&mut self, opcode: u8) -> Result<(), Error> {
        self.bus
            .write(self.config.address.value(), &[opcode])
            .map_err(|_| Error::Bus)
    }

    fn apply_mode(&mut self, mode: Mode) -> Result<(), Error> {
        if !self.powered {
            self.command(POWER_ON)?;
            self.powered = true;
        }
        self.command(mode.opcode())?;
        self.config.mode = mode;
        self.delay.sleep_ms(mode.measurement_time_ms());
        self.fresh = true;
        if mode.is_one_shot() {
            self.powered = false;
        }
        Ok(())
    }
}

impl<I2C: I2cBus, D: Delay> Driver for Bh1750<I2C, D> {
    type Config = Bh1750Config;

    /// Power the sensor on and start the configured mode
    fn configure(&mut self, config: Bh1750Config) -> Result<(), Error> {
        self.config.address = config.address;
        self.powered = false;
        let result = self.apply_mode(config.mode);
        if result.is_err() {
            warn!("bh1750: no answer at {=u16:#x}", config.address.value());
        }
        self.state.settle(result)
    }

    fn state(&self) -> DriverState {
        self.state
    }
}
