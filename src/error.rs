//! Error types for the crate.
//!
//! Two enums cover the two failure domains:
//!
//! - **`OpenXcError`**: everything that can go wrong on the data path (opening a
//!   data source, reading records, projecting them onto the vehicle state).
//!   These are always returned as `Result`s so the caller decides whether to
//!   skip, log or abort.
//! - **`RegistrationError`**: wiring mistakes made while registering drivers.
//!   [`DriverRegistry::register`](crate::registry::DriverRegistry::register)
//!   treats these as fatal; `try_register` hands them back instead.

use crate::message::ValueKind;
use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type Result<T> = std::result::Result<T, OpenXcError>;

/// Data-path error.
#[derive(Error, Debug)]
pub enum OpenXcError {
    /// No driver is registered under the requested name.
    #[error("unknown driver '{0}'")]
    UnknownDriver(String),

    /// The driver could not open the requested resource.
    ///
    /// **Recovery Strategy**: report to the user; the resource name is usually wrong.
    #[error("driver '{driver}' failed to open '{resource}': {source}")]
    DriverOpen {
        /// Driver type name.
        driver: String,
        /// Resource identifier passed to `open`.
        resource: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The backing resource has no more records.
    ///
    /// This is the normal terminator of a read loop, not a failure.
    #[error("end of stream")]
    EndOfStream,

    /// A record was truncated or malformed.
    #[error("failed to decode vehicle message: {0}")]
    Decode(#[source] serde_json::Error),

    /// A message carried a value of the wrong kind for its signal.
    #[error("type mismatch for signal '{signal}' ({field}): expected {expected}, got {actual}")]
    TypeMismatch {
        /// Signal name as it appeared on the wire.
        signal: String,
        /// State field the signal maps to.
        field: &'static str,
        /// Kind the field requires.
        expected: ValueKind,
        /// Kind the message carried.
        actual: ValueKind,
    },

    /// Operation requires an open driver.
    #[error("data source is not open")]
    NotOpen,

    /// `open` was called on a driver that is already open.
    #[error("data source is already open on '{0}'")]
    AlreadyOpen(String),

    /// The driver does not provide an optional capability.
    #[error("driver '{driver}' does not support {operation}")]
    Unsupported {
        /// Driver type name.
        driver: String,
        /// Name of the missing operation.
        operation: &'static str,
    },

    /// I/O failure outside of `open`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Configuration loaded but failed semantic validation.
    #[error("configuration validation error: {0}")]
    Configuration(String),
}

impl OpenXcError {
    /// True for the end-of-stream marker.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, OpenXcError::EndOfStream)
    }
}

impl From<figment::Error> for OpenXcError {
    fn from(err: figment::Error) -> Self {
        OpenXcError::Config(Box::new(err))
    }
}

/// Driver registration failure.
///
/// These indicate a misconfigured binary, not a runtime data condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A driver with this name is already registered.
    #[error("driver '{0}' is already registered")]
    DuplicateRegistration(String),

    /// The driver reported an empty name, so it could never be looked up.
    #[error("driver registered without a name")]
    NilDriver,
}
