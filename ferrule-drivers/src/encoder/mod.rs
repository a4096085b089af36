//! Rotary encoder drivers

pub mod quadrature;

pub use quadrature::{QuadratureConfig, QuadratureEncoder};
