//! Analog-to-digital converters

pub mod mcp3008;

pub use mcp3008::{Mcp3008, Mcp3008Config};
