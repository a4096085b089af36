//! Device-class traits
//!
//! These traits let application code work with any driver of a class
//! (any temperature sensor, any pixel display) without naming the part.

pub mod display;
pub mod sensor;

pub use display::Displayer;
pub use sensor::TemperatureSensor;
