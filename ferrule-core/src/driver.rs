//! Driver contract
//!
//! Every driver follows the same lifecycle:
//!
//! ```text
//! ┌─────────┐  configure() Ok   ┌───────┐
//! │ Created │──────────────────▶│ Ready │◀─┐
//! └─────────┘                   └───────┘  │ configure() Ok
//!      │ configure() Err            │      │
//!      ▼                            ▼      │
//! ┌──────────────┐  configure() Err        │
//! │ Failed(kind) │─────────────────────────┘
//! └──────────────┘
//! ```
//!
//! - `new(...)` only stores its arguments; it never touches the bus.
//! - `configure(config)` is the only place initialization transactions
//!   happen.
//! - Operations on a driver that is not `Ready` fail without bus traffic:
//!   with the error that made `configure` fail, or
//!   [`Error::InvalidConfig`] if `configure` was never called.

use crate::error::Error;

/// Lifecycle state of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Constructed, `configure` not yet called
    #[default]
    Created,
    /// Last `configure` succeeded
    Ready,
    /// Last `configure` failed with this error
    Failed(Error),
}

impl DriverState {
    /// Check whether operations may proceed
    pub fn ensure_ready(&self) -> Result<(), Error> {
        match *self {
            DriverState::Ready => Ok(()),
            DriverState::Created => Err(Error::InvalidConfig),
            DriverState::Failed(err) => Err(err),
        }
    }

    /// Record the outcome of a `configure` call and pass it through
    pub fn settle(&mut self, result: Result<(), Error>) -> Result<(), Error> {
        *self = match result {
            Ok(()) => DriverState::Ready,
            Err(err) => DriverState::Failed(err),
        };
        result
    }

    /// Check if the driver is ready
    pub fn is_ready(&self) -> bool {
        matches!(self, DriverState::Ready)
    }
}

/// Common contract of all device drivers
///
/// Typed operations (`read_*`, `set_*`, ...) are inherent methods on each
/// driver; this trait covers only what every driver has in common.
pub trait Driver {
    /// Plain configuration record; `Default` must be a working choice
    type Config: Default;

    /// Run the initialization transactions for `config`
    ///
    /// Must succeed before any other operation. Calling it again
    /// reconfigures the device and clears a previous failure.
    fn configure(&mut self, config: Self::Config) -> Result<(), Error>;

    /// Current lifecycle state
    fn state(&self) -> DriverState;

    /// Probe whether the device is present and answering
    ///
    /// Drivers with an identity register override this with a real probe.
    /// The default only reports whether the last `configure` succeeded.
    fn connected(&mut self) -> bool {
        self.state().is_ready()
    }
}
