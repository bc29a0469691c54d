//! OpenXC vehicle message model.
//!
//! Two encodings of the same record are accepted on the wire:
//!
//! ```text
//! Simple:    {"name": "headlamp_status", "value": false}
//! Extended:  {"name": "headlamp_status", "value": false, "event": false}
//! ```
//!
//! `value` is one of boolean, string or number. It is decoded into the
//! [`VehicleValue`] sum type and checked against the signal table at
//! projection time; no implicit coercion happens between kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a [`VehicleValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// `true` / `false`
    Bool,
    /// UTF-8 string
    Text,
    /// Floating-point number
    Number,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::Bool => "bool",
            ValueKind::Text => "string",
            ValueKind::Number => "number",
        };
        write!(f, "{}", label)
    }
}

/// Value carried by a vehicle message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleValue {
    /// Boolean signal value.
    Bool(bool),
    /// Numeric signal value.
    Number(f64),
    /// String signal value (enumerations such as gear positions).
    Text(String),
}

impl VehicleValue {
    /// Kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            VehicleValue::Bool(_) => ValueKind::Bool,
            VehicleValue::Number(_) => ValueKind::Number,
            VehicleValue::Text(_) => ValueKind::Text,
        }
    }
}

impl From<bool> for VehicleValue {
    fn from(value: bool) -> Self {
        VehicleValue::Bool(value)
    }
}

impl From<f64> for VehicleValue {
    fn from(value: f64) -> Self {
        VehicleValue::Number(value)
    }
}

impl From<&str> for VehicleValue {
    fn from(value: &str) -> Self {
        VehicleValue::Text(value.to_string())
    }
}

impl From<String> for VehicleValue {
    fn from(value: String) -> Self {
        VehicleValue::Text(value)
    }
}

/// One decoded OpenXC record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleMessage {
    /// Signal name, e.g. `"vehicle_speed"`.
    pub name: String,
    /// Signal value.
    pub value: VehicleValue,
    /// Extended-message event flag; absent on the wire means `false`.
    #[serde(default)]
    pub event: bool,
}

impl VehicleMessage {
    /// Create a simple (non-event) message.
    pub fn new(name: impl Into<String>, value: impl Into<VehicleValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            event: false,
        }
    }

    /// Set the event flag.
    pub fn with_event(mut self, event: bool) -> Self {
        self.event = event;
        self
    }
}
