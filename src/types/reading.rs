//! Per-actuator state reported by the actuator service.

use serde::{Deserialize, Serialize};

/// One actuator's reported state.
///
/// The snapshot transmits only the (transformed) position; velocity is
/// surfaced so sources don't have to discard it and hosts can log it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorReading {
    /// Actuator identifier as assigned by the service.
    pub id: u32,

    /// Position in degrees.
    pub position: f64,

    /// Angular velocity in degrees per second.
    pub velocity: f64,
}

impl ActuatorReading {
    /// Create a reading with zero velocity.
    pub fn at(id: u32, position: f64) -> Self {
        Self { id, position, velocity: 0.0 }
    }
}
