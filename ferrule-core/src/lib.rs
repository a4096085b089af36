//! Board-agnostic core of the Ferrule driver collection
//!
//! This crate contains everything the drivers share that does not touch
//! a bus:
//!
//! - The closed error taxonomy every driver reports through
//! - The driver contract (pure construction, explicit configuration)
//! - Device-class traits (temperature sensors, pixel displays)
//! - 1-Wire ROM ids
//! - Utilities: Dallas CRC-8, Rabin-Karp substring search and
//!   float-free decimal formatting

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod crc;
pub mod driver;
pub mod error;
pub mod fixed;
pub mod rom;
pub mod search;
pub mod traits;

pub use driver::{Driver, DriverState};
pub use error::Error;
pub use rom::RomId;
