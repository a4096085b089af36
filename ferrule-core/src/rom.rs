//! 1-Wire ROM ids
//!
//! Every 1-Wire slave carries a factory-programmed 64-bit id:
//!
//! ```text
//! ┌─────────────┬──────────────────────────┬───────┐
//! │ FAMILY CODE │ SERIAL NUMBER            │ CRC-8 │
//! │ byte 0      │ bytes 1-6 (LSB first)    │ byte 7│
//! └─────────────┴──────────────────────────┴───────┘
//! ```

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::crc::crc8;
use crate::error::Error;

/// Validated 1-Wire ROM id
///
/// Construction checks the trailing CRC, so a `RomId` in hand always
/// satisfies `crc8(&id[..7]) == id[7]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "[u8; 8]", into = "[u8; 8]"))]
pub struct RomId([u8; 8]);

impl RomId {
    /// Family code of DS18B20 temperature sensors
    pub const FAMILY_DS18B20: u8 = 0x28;

    /// Validate and wrap an id read from the bus
    pub fn new(bytes: [u8; 8]) -> Result<Self, Error> {
        if crc8(&bytes[..7]) != bytes[7] {
            return Err(Error::CrcMismatch);
        }
        Ok(Self(bytes))
    }

    /// Build an id from family code and serial, computing the CRC
    pub fn from_parts(family: u8, serial: [u8; 6]) -> Self {
        let mut bytes = [0u8; 8];
        bytes[0] = family;
        bytes[1..7].copy_from_slice(&serial);
        bytes[7] = crc8(&bytes[..7]);
        Self(bytes)
    }

    /// Raw bytes in bus order
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Device family code
    pub fn family_code(&self) -> u8 {
        self.0[0]
    }

    /// 48-bit serial number
    pub fn serial(&self) -> u64 {
        self.0[1..7]
            .iter()
            .rev()
            .fold(0u64, |acc, &b| (acc << 8) | b as u64)
    }

    /// Stored CRC byte
    pub fn crc(&self) -> u8 {
        self.0[7]
    }
}

impl TryFrom<[u8; 8]> for RomId {
    type Error = Error;

    fn try_from(bytes: [u8; 8]) -> Result<Self, Error> {
        Self::new(bytes)
    }
}

impl From<RomId> for [u8; 8] {
    fn from(id: RomId) -> Self {
        id.0
    }
}

/// Formats as the conventional `28-0000...` style: family code, dash,
/// serial most significant byte first
impl fmt::Display for RomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}-", self.family_code())?;
        for byte in self.0[1..7].iter().rev() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
