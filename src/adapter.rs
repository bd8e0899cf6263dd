//! Source adapters: bounded, failure-normalizing query wrappers.
//!
//! Each adapter issues exactly one upstream call under a timeout, applies
//! the transform stage to the raw readings, and normalizes every failure
//! mode (timeout, upstream fault, malformed reading) into `None`. Failures
//! are logged here and absorbed — retry and backoff are entirely the
//! scheduler's concern.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use tracing::warn;

use crate::source::{ActuatorSource, PoseSensor};
use crate::transform::{flip_range, invert_if_listed, round_tenth};

/// Query the actuator service once, bounded by `timeout`.
///
/// Applies sign inversion and one-decimal rounding per reading and builds
/// the id → position mapping. Returns `None` on timeout or upstream fault;
/// a failed query never yields a partial mapping.
pub async fn query_joints<S: ActuatorSource>(
    source: &mut S,
    timeout: Duration,
    inverted: &HashSet<u32>,
) -> Option<BTreeMap<String, f64>> {
    match tokio::time::timeout(timeout, source.query_all()).await {
        Ok(Ok(readings)) => Some(
            readings
                .into_iter()
                .map(|reading| {
                    let position = invert_if_listed(reading.id, reading.position, inverted);
                    (reading.id.to_string(), round_tenth(position))
                })
                .collect(),
        ),
        Ok(Err(err)) => {
            warn!(error = %err, "actuator query failed");
            None
        }
        Err(_) => {
            warn!(?timeout, "actuator query timed out");
            None
        }
    }
}

/// Read the pose sensor once, bounded by `timeout`.
///
/// Applies the range flip per channel. A reading with the wrong channel
/// count is treated as a fault: the fixed-arity invariant on transmitted
/// finger data is enforced here, before the value can reach a snapshot.
pub async fn query_fingers<S: PoseSensor>(
    sensor: &mut S,
    timeout: Duration,
    finger_max: i32,
    finger_count: usize,
) -> Option<Vec<i32>> {
    match tokio::time::timeout(timeout, sensor.read_channels()).await {
        Ok(Ok(raw)) => {
            if raw.len() != finger_count {
                warn!(got = raw.len(), expected = finger_count, "pose reading has wrong arity");
                return None;
            }
            Some(raw.into_iter().map(|value| flip_range(value, finger_max)).collect())
        }
        Ok(Err(err)) => {
            warn!(error = %err, "pose sensor read failed");
            None
        }
        Err(_) => {
            warn!(?timeout, "pose sensor read timed out");
            None
        }
    }
}
