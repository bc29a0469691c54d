//! # OpenXC Vehicle Data Library
//!
//! This crate reads OpenXC vehicle messages from pluggable data sources and
//! projects them onto a typed vehicle state snapshot. The projection logic
//! never knows which backend produced a message: a trace file and a live
//! vehicle interface look the same behind the driver contract.
//!
//! ## Crate Structure
//!
//! - **`message`**: The wire-level `VehicleMessage` and its `VehicleValue` sum type.
//! - **`state`**: The `VehicleState` snapshot, the compiled-in signal table and
//!   projection (`project`, `Projector`).
//! - **`driver`**: The `DataSourceDriver` contract, the `Rewindable` capability and
//!   `DriverFactory`.
//! - **`registry`**: `DriverRegistry`, the name → factory map, with a process-wide
//!   instance seeded with the built-in drivers.
//! - **`datasource`**: `DataSource`, an open handle over one driver instance.
//! - **`drivers`**: Built-in drivers (`trace`, a streaming JSON trace file reader).
//! - **`ingest`**: The pull loop from a data source into a projector.
//! - **`config`**: Figment-based configuration loading.
//! - **`logging`**: `tracing-subscriber` setup.
//! - **`error`**: `OpenXcError` and `RegistrationError`.
//!
//! ## Example
//!
//! ```no_run
//! use openxc::{ingest, DataSource, MismatchPolicy, Projector};
//!
//! # fn main() -> openxc::Result<()> {
//! let mut source = DataSource::open("trace", "trace-simple.json")?;
//! let mut projector = Projector::new();
//! let summary = ingest(&mut source, &mut projector, MismatchPolicy::Skip)?;
//! source.close()?;
//!
//! println!("{} messages, gear {}", summary.read, projector.state().transmission_gear_position);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod datasource;
pub mod driver;
pub mod drivers;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod message;
pub mod registry;
pub mod state;

pub use datasource::DataSource;
pub use driver::{DataSourceDriver, DriverFactory, Rewindable};
pub use error::{OpenXcError, RegistrationError, Result};
pub use ingest::{ingest, IngestSummary, MismatchPolicy};
pub use message::{ValueKind, VehicleMessage, VehicleValue};
pub use registry::{register_driver, DriverRegistry};
pub use state::{project, signal, Projection, Projector, ProjectorStats, Signal, VehicleState, SIGNALS};
