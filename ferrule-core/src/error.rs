//! Driver error taxonomy
//!
//! Every driver operation fails with one of these kinds and nothing else.
//! Bus-specific errors are folded into [`Error::Bus`] at the driver
//! boundary so applications never see HAL types.

use core::fmt;

/// Errors reported by driver operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The bus transaction failed (NACK, arbitration lost, timeout)
    Bus,
    /// No device answered, or it reported an unexpected identity
    NotConnected,
    /// A checksum over data returned by the device did not match
    ///
    /// Usually transient line noise; the caller may retry.
    CrcMismatch,
    /// An option was out of range; no hardware was touched
    ///
    /// Also reported by operations attempted before a successful
    /// `configure`.
    InvalidConfig,
    /// The HAL lacks a capability the driver needs
    Unsupported,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::Bus => "bus error",
            Error::NotConnected => "device not connected",
            Error::CrcMismatch => "CRC mismatch",
            Error::InvalidConfig => "invalid configuration",
            Error::Unsupported => "unsupported by HAL",
        };
        f.write_str(msg)
    }
}
