//! MCP3008 8-channel 10-bit ADC (SPI)
//!
//! One conversion is a 3-byte full-duplex exchange with chip select held
//! low:
//!
//! ```text
//! MOSI: 0000_0001  SGL D2 D1 D0 xxxx  xxxx_xxxx
//! MISO: xxxx_xxxx  xxxx x 0 B9 B8     B7 .. B0
//! ```

use ferrule_core::{Driver, DriverState, Error};
use ferrule_hal::gpio::{ConfigurablePin, OutputPin, PinMode};
use ferrule_hal::spi::{Mode, SpiBus};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// SPI mode the controller must be set up with
pub const SPI_MODE: Mode = Mode::Mode0;

pub const CHANNELS: usize = 8;

/// Largest raw reading
pub const MAX_RAW: u16 = 0x3FF;

/// MCP3008 configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mcp3008Config {
    /// Bit mask of channels sampled by [`Mcp3008::update`]; must not be 0
    pub channels: u8,
}

impl Default for Mcp3008Config {
    fn default() -> Self {
        Self { channels: 0xFF }
    }
}

/// MCP3008 driver
pub struct Mcp3008<SPI, CS> {
    bus: SPI,
    cs: CS,
    channels: u8,
    /// Results of the last `update`, scaled to 16 bits
    data: [u16; CHANNELS],
    state: DriverState,
}

impl<SPI, CS> Mcp3008<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin + ConfigurablePin,
{
    /// Create a new driver; the chip select pin is not touched
    pub fn new(bus: SPI, cs: CS) -> Self {
        Self {
            bus,
            cs,
            channels: 0,
            data: [0; CHANNELS],
            state: DriverState::Created,
        }
    }

    /// Release the bus and chip select pin
    pub fn release(self) -> (SPI, CS) {
        (self.bus, self.cs)
    }

    /// Single-ended conversion on `channel` (0..=7), 10-bit result
    pub fn read_raw(&mut self, channel: u8) -> Result<u16, Error> {
        self.state.ensure_ready()?;
        if channel as usize >= CHANNELS {
            return Err(Error::InvalidConfig);
        }
        self.convert(channel)
    }

    /// Single-ended conversion scaled to the full `u16` range
    pub fn read(&mut self, channel: u8) -> Result<u16, Error> {
        self.read_raw(channel).map(|raw| raw << 6)
    }

    /// Convert every configured channel and keep the results
    pub fn update(&mut self) -> Result<(), Error> {
        self.state.ensure_ready()?;
        for channel in 0..CHANNELS as u8 {
            if self.channels & (1 << channel) != 0 {
                self.data[channel as usize] = self.convert(channel)? << 6;
            }
        }
        Ok(())
    }

    /// Result of the last [`Mcp3008::update`] for `channel`, scaled to 16 bits
    ///
    /// Returns `None` for channels outside the configured set.
    pub fn last(&self, channel: u8) -> Option<u16> {
        if channel as usize >= CHANNELS || self.channels & (1 << channel) == 0 {
            return None;
        }
        Some(self.data[channel as usize])
    }

    fn convert(&mut self, channel: u8) -> Result<u16, Error> {
        let mut frame = [0x01, (8 + channel) << 4, 0x00];
        self.cs.set_low();
        let result = self.bus.transfer_in_place(&mut frame);
        self.cs.set_high();
        result.map_err(|_| Error::Bus)?;
        Ok((((frame[1] & 0x03) as u16) << 8) | frame[2] as u16)
    }
}

impl<SPI, CS> Driver for Mcp3008<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin + ConfigurablePin,
{
    type Config = Mcp3008Config;

    /// Drive chip select high as an output
    fn configure(&mut self, config: Mcp3008Config) -> Result<(), Error> {
        let result = if config.channels == 0 {
            Err(Error::InvalidConfig)
        } else {
            self.cs.configure(PinMode::Output);
            self.cs.set_high();
            self.channels = config.channels;
            debug!("mcp3008: channels {=u8:b}", config.channels);
            Ok(())
        };
        self.state.settle(result)
    }

    fn state(&self) -> DriverState {
        self.state
    }
}
