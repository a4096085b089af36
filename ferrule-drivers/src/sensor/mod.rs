//! Sensor drivers
//!
//! Temperature sensors report integer milli-degrees Celsius; the I2C ones
//! also implement [`ferrule_core::traits::TemperatureSensor`].

pub mod bh1750;
pub mod ds18b20;
pub mod mcp9808;
pub mod tmp102;

pub use bh1750::{Bh1750, Bh1750Config};
pub use ds18b20::{Ds18b20, Ds18b20Config};
pub use mcp9808::{Mcp9808, Mcp9808Config};
pub use tmp102::{Tmp102, Tmp102Config};
