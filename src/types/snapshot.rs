//! The merged telemetry snapshot transmitted each cycle.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::error::Result;

/// One merged, timestamped view of joint and finger state.
///
/// Constructed fresh each scheduler cycle, immutable once built, and
/// discarded after transmission. The serialized field names are the wire
/// contract and must not change.
///
/// Invariants:
/// - `fingers` always has exactly the configured channel count; on pose
///   sensor failure the previous cycle's values are reused.
/// - `joints` may be empty (actuator source failure) but is never absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Wall-clock seconds since the Unix epoch, captured at composition.
    pub timestamp: f64,

    /// Actuator id → position in degrees, one decimal place.
    pub joints: BTreeMap<String, f64>,

    /// Flipped finger channel values, in fixed channel order.
    pub fingers: Vec<i32>,
}

impl Snapshot {
    /// Build a snapshot stamped with the current wall-clock time.
    pub fn now(joints: BTreeMap<String, f64>, fingers: Vec<i32>) -> Self {
        Self { timestamp: wall_clock_secs(), joints, fingers }
    }

    /// Serialize into the compact UTF-8 JSON datagram body.
    pub fn to_datagram(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Current wall-clock time as float seconds since the Unix epoch.
///
/// A clock set before the epoch yields 0.0 rather than failing the cycle.
pub(crate) fn wall_clock_secs() -> f64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs_f64()).unwrap_or(0.0)
}
