//! Built-in data source drivers.
//!
//! | Driver | Resource | Rewindable |
//! |--------|----------|------------|
//! | `trace` | Path to a JSON trace file | yes |

pub mod trace;

pub use trace::{TraceDriver, TraceDriverFactory, TRACE_DRIVER};
