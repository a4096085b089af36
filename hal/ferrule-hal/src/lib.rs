//! Ferrule Hardware Abstraction Layer
//!
//! This crate defines the narrow capability traits the Ferrule drivers are
//! written against. A board support crate implements them for its chip
//! (or wraps an existing `embedded-hal` implementation with the adaptors in
//! [`embedded`]), and every driver then works on that board unchanged.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application                            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ferrule-drivers (device drivers)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ferrule-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ chip HAL impl │       │ embedded-hal  │
//! │               │       │  (adaptors)   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::ConfigurablePin`],
//!   [`gpio::InterruptPin`] - Digital I/O
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`spi::SpiBus`] - SPI bus operations
//! - [`onewire::OneWire`] - 1-Wire bus operations
//! - [`delay::Delay`] - Blocking delays
//!
//! # Sharing a bus
//!
//! Bus traits are implemented for `&mut T` and `&RefCell<T>`, so several
//! drivers can each hold a borrow of the same controller. Nothing here
//! locks: the application must keep transactions from overlapping.

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod embedded;
pub mod gpio;
pub mod i2c;
pub mod onewire;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use delay::Delay;
pub use gpio::{ConfigurablePin, Edge, InputPin, InterruptError, InterruptPin, OutputPin, PinMode};
pub use i2c::I2cBus;
pub use onewire::OneWire;
pub use spi::SpiBus;
