//! Sensor traits

use crate::error::Error;

/// Trait for temperature sensors
///
/// Implementations handle the specific part (MCP9808, TMP102, ...) and
/// convert its register format to a common fixed-point unit.
pub trait TemperatureSensor {
    /// Read the current temperature in milli-degrees Celsius
    ///
    /// For example, 25.0625°C is returned as 25_062.
    fn read_milli_celsius(&mut self) -> Result<i32, Error>;

    /// Read the current temperature in 0.1°C units
    fn read_celsius_x10(&mut self) -> Result<i16, Error> {
        self.read_milli_celsius().map(|t| (t / 100) as i16)
    }

    /// Check if the sensor currently produces readings
    fn is_valid(&mut self) -> bool {
        self.read_milli_celsius().is_ok()
    }
}
