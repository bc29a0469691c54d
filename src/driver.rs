//! Data source driver contract.
//!
//! A driver is a backend that produces [`VehicleMessage`]s from some transport
//! (a trace file, a live vehicle interface, ...). Drivers are made available
//! through a [`DriverFactory`] registered with the
//! [`DriverRegistry`](crate::registry::DriverRegistry); every opened
//! [`DataSource`](crate::datasource::DataSource) gets its own driver instance
//! from the factory.
//!
//! ```text
//! DriverRegistry:  "trace" -> TraceDriverFactory
//!                                   │ create()
//!                                   ▼
//! DataSource ───────────────▶ Box<dyn DataSourceDriver>
//!                             open(resource) / read() / close()
//! ```
//!
//! Optional behaviour is exposed as capability traits, looked up at runtime
//! through accessor methods that default to `None`. [`Rewindable`] is the only
//! capability so far.
//!
//! # Example: Implementing a Driver
//!
//! ```rust
//! use openxc::driver::{DataSourceDriver, DriverFactory};
//! use openxc::{OpenXcError, Result, VehicleMessage};
//!
//! #[derive(Default)]
//! struct Silent {
//!     open: bool,
//! }
//!
//! impl DataSourceDriver for Silent {
//!     fn driver_type(&self) -> &'static str {
//!         "silent"
//!     }
//!
//!     fn open(&mut self, _resource: &str) -> Result<()> {
//!         self.open = true;
//!         Ok(())
//!     }
//!
//!     fn read(&mut self) -> Result<VehicleMessage> {
//!         if self.open {
//!             Err(OpenXcError::EndOfStream)
//!         } else {
//!             Err(OpenXcError::NotOpen)
//!         }
//!     }
//!
//!     fn close(&mut self) -> Result<()> {
//!         self.open = false;
//!         Ok(())
//!     }
//! }
//!
//! struct SilentFactory;
//!
//! impl DriverFactory for SilentFactory {
//!     fn driver_type(&self) -> &'static str {
//!         "silent"
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "Silent test source"
//!     }
//!
//!     fn create(&self) -> Box<dyn DataSourceDriver> {
//!         Box::new(Silent::default())
//!     }
//! }
//! ```

use crate::error::Result;
use crate::message::VehicleMessage;

/// Backend producing vehicle messages.
///
/// Lifecycle: `open` once, any number of `read`s, `close` once. Calling `read`
/// or `close` on a driver that is not open must return
/// [`OpenXcError::NotOpen`](crate::OpenXcError::NotOpen).
///
/// Drivers must report every data-path failure as an error; they never
/// terminate the process.
pub trait DataSourceDriver: Send {
    /// Type name the driver is registered under.
    fn driver_type(&self) -> &'static str;

    /// Connect to `resource` (a file path for file-backed drivers).
    fn open(&mut self, resource: &str) -> Result<()>;

    /// Produce the next message.
    ///
    /// Returns [`OpenXcError::EndOfStream`](crate::OpenXcError::EndOfStream) once
    /// the resource is exhausted, and keeps returning it on later calls.
    fn read(&mut self) -> Result<VehicleMessage>;

    /// Release the resource.
    fn close(&mut self) -> Result<()>;

    /// Rewind capability, if the driver supports replay.
    fn as_rewindable(&mut self) -> Option<&mut dyn Rewindable> {
        None
    }
}

/// Drivers whose resource can be replayed from the beginning.
pub trait Rewindable {
    /// Reposition at the first record.
    ///
    /// A full pass after `reset` yields the same messages as the first pass.
    fn reset(&mut self) -> Result<()>;
}

/// Creates driver instances for the registry.
///
/// Factories are registered once at startup and live for the rest of the
/// process, so they must be `Send + Sync + 'static`.
pub trait DriverFactory: Send + Sync + 'static {
    /// Registry key, e.g. `"trace"`.
    fn driver_type(&self) -> &'static str;

    /// Human-readable name for diagnostics.
    fn name(&self) -> &'static str;

    /// New, unopened driver instance.
    fn create(&self) -> Box<dyn DataSourceDriver>;
}
