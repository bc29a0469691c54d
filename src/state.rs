//! Vehicle state snapshot and message projection.
//!
//! [`VehicleState`] holds the last known value of every recognized signal.
//! Projection looks the message name up in the compiled-in signal table,
//! checks the value kind and overwrites the field (last write wins). Names
//! outside the table are dropped with a `debug` event; [`Projector`] also
//! counts them.

use crate::error::{OpenXcError, Result};
use crate::message::{ValueKind, VehicleMessage, VehicleValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Entry of the recognized signal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    /// Name on the wire.
    pub name: &'static str,
    /// Field of [`VehicleState`] it updates.
    pub field: &'static str,
    /// Kind the value must have.
    pub kind: ValueKind,
}

/// Mutable view of one state field, tagged with its kind.
enum FieldMut<'a> {
    Bool(&'a mut bool),
    Text(&'a mut String),
    Number(&'a mut f64),
}

macro_rules! vehicle_state {
    ($( $kind:ident $ty:ty { $( $name:literal => $field:ident ),* $(,)? } )*) => {
        /// Latest known value of each recognized signal.
        ///
        /// Fields that have not been seen yet hold their zero value.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct VehicleState {
            $( $(
                #[doc = concat!("Last `", $name, "` value.")]
                pub $field: $ty,
            )* )*
        }

        /// Every signal the projector recognizes.
        pub static SIGNALS: &[Signal] = &[
            $( $( Signal { name: $name, field: stringify!($field), kind: ValueKind::$kind }, )* )*
        ];

        impl VehicleState {
            fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
                match name {
                    $( $( $name => Some(FieldMut::$kind(&mut self.$field)), )* )*
                    _ => None,
                }
            }
        }
    };
}

vehicle_state! {
    Bool bool {
        "headlamp_status" => headlamp_status,
        "high_beam_status" => high_beam_status,
        "windshield_wiper_status" => windshield_wiper_status,
        "brake_pedal_status" => brake_pedal_status,
        "parking_brake_status" => parking_brake_status,
    }
    Text String {
        "door_status" => door_status,
        "ignition_status" => ignition_status,
        "turn_signal_status" => turn_signal_status,
        "gear_lever_position" => gear_lever_position,
        "transmission_gear_position" => transmission_gear_position,
    }
    Number f64 {
        "fuel_level" => fuel_level,
        "latitude" => latitude,
        "longitude" => longitude,
        "accelerator_pedal_position" => accelerator_pedal_position,
        "engine_speed" => engine_speed,
        "vehicle_speed" => vehicle_speed,
        "fuel_consumed_since_restart" => fuel_consumed_since_restart,
        "odometer" => odometer,
        "steering_wheel_angle" => steering_wheel_angle,
        "torque_at_transmission" => torque_at_transmission,
    }
}

/// Look up a recognized signal by wire name.
pub fn signal(name: &str) -> Option<&'static Signal> {
    SIGNALS.iter().find(|s| s.name == name)
}

/// Result of applying one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// The message updated the field described by the signal.
    Applied(&'static Signal),
    /// The signal is not in the table; state is unchanged.
    Ignored,
}

impl VehicleState {
    /// Create a state with every field at its zero value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one message to the state.
    ///
    /// On `TypeMismatch` the field keeps its previous value.
    pub fn apply(&mut self, msg: &VehicleMessage) -> Result<Projection> {
        let (Some(signal), Some(field)) = (signal(&msg.name), self.field_mut(&msg.name)) else {
            debug!(signal = %msg.name, "ignoring unrecognized signal");
            return Ok(Projection::Ignored);
        };

        match (field, &msg.value) {
            (FieldMut::Bool(slot), VehicleValue::Bool(v)) => *slot = *v,
            (FieldMut::Text(slot), VehicleValue::Text(v)) => slot.clone_from(v),
            (FieldMut::Number(slot), VehicleValue::Number(v)) => *slot = *v,
            (_, value) => {
                return Err(OpenXcError::TypeMismatch {
                    signal: msg.name.clone(),
                    field: signal.field,
                    expected: signal.kind,
                    actual: value.kind(),
                })
            }
        }

        Ok(Projection::Applied(signal))
    }
}

/// Apply one message to `state`.
///
/// Unrecognized signals are a no-op.
pub fn project(state: &mut VehicleState, msg: &VehicleMessage) -> Result<()> {
    state.apply(msg).map(|_| ())
}

/// Projection counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectorStats {
    /// Messages that updated a field.
    pub applied: u64,
    /// Messages with an unrecognized signal name.
    pub ignored: u64,
    /// Messages rejected with a type mismatch.
    pub rejected: u64,
}

/// Owns a [`VehicleState`] and keeps counters of what happened to each message.
#[derive(Debug, Clone, Default)]
pub struct Projector {
    state: VehicleState,
    stats: ProjectorStats,
}

impl Projector {
    /// Start from an all-zero state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state.
    pub fn with_state(state: VehicleState) -> Self {
        Self {
            state,
            stats: ProjectorStats::default(),
        }
    }

    /// Apply one message and update the counters.
    pub fn project(&mut self, msg: &VehicleMessage) -> Result<Projection> {
        let outcome = self.state.apply(msg);
        match &outcome {
            Ok(Projection::Applied(_)) => self.stats.applied += 1,
            Ok(Projection::Ignored) => self.stats.ignored += 1,
            Err(_) => self.stats.rejected += 1,
        }
        outcome
    }

    /// Current snapshot.
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// Counters so far.
    pub fn stats(&self) -> ProjectorStats {
        self.stats
    }

    /// Consume the projector, returning the snapshot.
    pub fn into_state(self) -> VehicleState {
        self.state
    }
}
