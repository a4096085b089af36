//! DS18B20 1-Wire digital thermometer
//!
//! A measurement is two transactions separated by the conversion time:
//!
//! ```text
//! request_temperature(rom)    select, Convert T (0x44)
//!        ... 94..750 ms depending on resolution ...
//! read_temperature(rom)       select, Read Scratchpad (0xBE), 9 bytes, CRC
//! ```
//!
//! The driver does not track conversions in flight; reading early returns
//! the previous result. [`Ds18b20::measure`] does both steps and sleeps
//! in between.
//!
//! Every operation takes an optional ROM id. `None` addresses all devices
//! with Skip ROM, which is only meaningful for reads when a single device
//! is on the bus.

use ferrule_core::crc::crc8;
use ferrule_core::{Driver, DriverState, Error, RomId};
use ferrule_hal::delay::Delay;
use ferrule_hal::onewire::{OneWire, READ_ROM};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Function command: start a temperature conversion
pub const CONVERT_T: u8 = 0x44;
/// Function command: read the 9-byte scratchpad
pub const READ_SCRATCHPAD: u8 = 0xBE;
/// Function command: write TH, TL and config
pub const WRITE_SCRATCHPAD: u8 = 0x4E;

/// Scratchpad length including the CRC byte
pub const SCRATCHPAD_LEN: usize = 9;

/// Conversion resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Resolution {
    /// 0.5°C
    Bits9,
    /// 0.25°C
    Bits10,
    /// 0.125°C
    Bits11,
    /// 0.0625°C (power-on default)
    #[default]
    Bits12,
}

impl Resolution {
    /// Resolution for a bit count, if the sensor supports it
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            9 => Some(Self::Bits9),
            10 => Some(Self::Bits10),
            11 => Some(Self::Bits11),
            12 => Some(Self::Bits12),
            _ => None,
        }
    }

    /// Resolution encoded in a configuration register value
    pub fn from_config_byte(config: u8) -> Self {
        match (config >> 5) & 0x03 {
            0 => Self::Bits9,
            1 => Self::Bits10,
            2 => Self::Bits11,
            _ => Self::Bits12,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::Bits9 => 9,
            Self::Bits10 => 10,
            Self::Bits11 => 11,
            Self::Bits12 => 12,
        }
    }

    /// Configuration register value: `((bits - 9) << 5) | 0x1F`
    pub fn config_byte(self) -> u8 {
        ((self.bits() - 9) << 5) | 0x1F
    }

    /// Maximum conversion time from the datasheet
    pub fn conversion_time_ms(self) -> u32 {
        match self {
            Self::Bits9 => 94,
            Self::Bits10 => 188,
            Self::Bits11 => 375,
            Self::Bits12 => 750,
        }
    }
}

/// DS18B20 configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ds18b20Config {
    /// Resolution written to every device at configure time.
    /// `None` leaves the devices as they are.
    pub resolution: Option<Resolution>,
}

/// Convert a raw 1/16 °C reading to milli-degrees Celsius
pub fn decode_milli_celsius(raw: i16) -> i32 {
    raw as i32 * 625 / 10
}

/// Validated scratchpad contents
///
/// Layout: `[T_LSB, T_MSB, TH, TL, CONFIG, 0xFF, reserved, 0x10, CRC]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scratchpad([u8; SCRATCHPAD_LEN]);

impl Scratchpad {
    /// Check the CRC over bytes 0..8 against byte 8
    pub fn new(bytes: [u8; SCRATCHPAD_LEN]) -> Result<Self, Error> {
        if crc8(&bytes[..SCRATCHPAD_LEN - 1]) != bytes[SCRATCHPAD_LEN - 1] {
            return Err(Error::CrcMismatch);
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SCRATCHPAD_LEN] {
        &self.0
    }

    /// Temperature in 1/16 °C
    pub fn temperature_raw(&self) -> i16 {
        i16::from_le_bytes([self.0[0], self.0[1]])
    }

    pub fn milli_celsius(&self) -> i32 {
        decode_milli_celsius(self.temperature_raw())
    }

    /// High alarm threshold in °C
    pub fn alarm_high(&self) -> i8 {
        self.0[2] as i8
    }

    /// Low alarm threshold in °C
    pub fn alarm_low(&self) -> i8 {
        self.0[3] as i8
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::from_config_byte(self.0[4])
    }
}

/// DS18B20 driver
///
/// Owns a handle to the bus; pass `&mut bus` or `&RefCell<bus>` to share
/// one wire between several drivers.
pub struct Ds18b20<W> {
    bus: W,
    scratchpad: [u8; SCRATCHPAD_LEN],
    /// Resolution known to be set on every device, if any
    resolution: Option<Resolution>,
    state: DriverState,
}

impl<W: OneWire> Ds18b20<W> {
    /// Create a new driver; no bus traffic
    pub fn new(bus: W) -> Self {
        Self {
            bus,
            scratchpad: [0; SCRATCHPAD_LEN],
            resolution: None,
            state: DriverState::Created,
        }
    }

    /// Release the bus handle
    pub fn release(self) -> W {
        self.bus
    }

    /// Last scratchpad read, CRC not guaranteed
    pub fn last_scratchpad(&self) -> &[u8; SCRATCHPAD_LEN] {
        &self.scratchpad
    }

    /// Read the id of the only device on the bus
    ///
    /// With several devices their ids collide and the CRC check fails;
    /// use [`crate::onewire::search_all`] instead.
    pub fn read_address(&mut self) -> Result<RomId, Error> {
        self.state.ensure_ready()?;
        if !self.bus.reset().map_err(|_| Error::Bus)? {
            return Err(Error::NotConnected);
        }
        self.bus.write_byte(READ_ROM).map_err(|_| Error::Bus)?;
        let mut id = [0u8; 8];
        for byte in &mut id {
            *byte = self.bus.read_byte().map_err(|_| Error::Bus)?;
        }
        RomId::new(id)
    }

    /// Set the conversion resolution
    ///
    /// `bits` outside 9..=12 is ignored without touching the bus. The
    /// alarm thresholds are overwritten with TH = 0xFF and TL = 0x00.
    pub fn set_resolution(&mut self, rom: Option<&RomId>, bits: u8) -> Result<(), Error> {
        self.state.ensure_ready()?;
        let Some(resolution) = Resolution::from_bits(bits) else {
            debug!("ds18b20: ignoring resolution {}", bits);
            return Ok(());
        };
        self.write_resolution(rom, resolution)
    }

    /// Start a temperature conversion
    ///
    /// Wait at least the conversion time before reading the result.
    pub fn request_temperature(&mut self, rom: Option<&RomId>) -> Result<(), Error> {
        self.state.ensure_ready()?;
        self.select(rom)?;
        self.bus.write_byte(CONVERT_T).map_err(|_| Error::Bus)
    }

    /// Read and validate the scratchpad
    pub fn read_scratchpad(&mut self, rom: Option<&RomId>) -> Result<Scratchpad, Error> {
        self.state.ensure_ready()?;
        self.select(rom)?;
        self.bus.write_byte(READ_SCRATCHPAD).map_err(|_| Error::Bus)?;
        for byte in self.scratchpad.iter_mut() {
            *byte = self.bus.read_byte().map_err(|_| Error::Bus)?;
        }
        let scratchpad = Scratchpad::new(self.scratchpad);
        if scratchpad.is_err() {
            warn!("ds18b20: scratchpad CRC mismatch");
        }
        scratchpad
    }

    /// Read the last conversion result in 1/16 °C
    pub fn read_temperature_raw(&mut self, rom: Option<&RomId>) -> Result<i16, Error> {
        self.read_scratchpad(rom).map(|sp| sp.temperature_raw())
    }

    /// Read the last conversion result in milli-degrees Celsius
    pub fn read_temperature(&mut self, rom: Option<&RomId>) -> Result<i32, Error> {
        self.read_temperature_raw(rom).map(decode_milli_celsius)
    }

    /// Convert, wait and read
    ///
    /// Sleeps for the conversion time of the resolution set through this
    /// driver, or 750 ms when it is not known. Blocks for that long.
    pub fn measure<D: Delay>(&mut self, rom: Option<&RomId>, delay: &mut D) -> Result<i32, Error> {
        self.request_temperature(rom)?;
        let wait = self.resolution.unwrap_or_default().conversion_time_ms();
        delay.sleep_ms(wait);
        self.read_temperature(rom)
    }

    fn select(&mut self, rom: Option<&RomId>) -> Result<(), Error> {
        let present = self
            .bus
            .select(rom.map(RomId::as_bytes))
            .map_err(|_| Error::Bus)?;
        if !present {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    fn write_resolution(&mut self, rom: Option<&RomId>, resolution: Resolution) -> Result<(), Error> {
        self.select(rom)?;
        for byte in [WRITE_SCRATCHPAD, 0xFF, 0x00, resolution.config_byte()] {
            self.bus.write_byte(byte).map_err(|_| Error::Bus)?;
        }
        // A single device may now differ from the rest
        self.resolution = if rom.is_none() { Some(resolution) } else { None };
        Ok(())
    }
}

impl<W: OneWire> Driver for Ds18b20<W> {
    type Config = Ds18b20Config;

    /// Check for a presence pulse and apply the configured resolution to
    /// every device on the bus
    fn configure(&mut self, config: Ds18b20Config) -> Result<(), Error> {
        // Devices may have power-cycled back to their EEPROM setting
        self.resolution = None;
        let result = self.bus.reset().map_err(|_| Error::Bus).and_then(|present| {
            if !present {
                return Err(Error::NotConnected);
            }
            match config.resolution {
                Some(resolution) => self.write_resolution(None, resolution),
                None => Ok(()),
            }
        });
        if let Err(e) = result {
            warn!("ds18b20: configure failed: {}", e);
        }
        self.state.settle(result)
    }

    fn state(&self) -> DriverState {
        self.state
    }
}
