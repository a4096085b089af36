//! Device drivers
//!
//! This crate provides drivers written against the `ferrule-hal` traits
//! and the `ferrule-core` driver contract:
//!
//! - Rotary encoders (interrupt-driven quadrature decoding)
//! - 1-Wire bus master (GPIO bit-bang) and ROM search
//! - Temperature sensors (DS18B20, MCP9808, TMP102)
//! - Ambient light sensor (BH1750)
//! - ADCs (MCP3008)
//!
//! Every driver is constructed without touching hardware and must be
//! configured through [`ferrule_core::Driver::configure`] before use.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod adc;
pub mod encoder;
pub mod onewire;
pub mod sensor;

#[cfg(test)]
mod mock;
