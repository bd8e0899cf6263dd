//! Snapshot composer: concurrent dual-source read under one deadline.
//!
//! The composer fans out to both source adapters concurrently, joins them
//! under a single overall deadline, and merges the results into one
//! [`Snapshot`]. Individual source failures are absorbed (empty joints,
//! stale fingers); only the overall deadline elapsing surfaces as an error,
//! and that error is what the scheduler counts as a cycle failure.

use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

use crate::adapter;
use crate::config::SenderConfig;
use crate::error::{BridgeError, Result};
use crate::source::{ActuatorSource, PoseSensor};
use crate::types::Snapshot;

/// Builds one [`Snapshot`] per cycle from the two upstream sources.
///
/// Holds the only piece of cross-cycle state in the data path: the last
/// successfully read finger values, reused verbatim when the pose sensor
/// fails. Joints have no such fallback — a worn glove is expected to hold
/// its pose, a failed actuator query just reads as empty.
pub struct Composer {
    source_timeout: Duration,
    deadline: Duration,
    inverted: HashSet<u32>,
    finger_max: i32,
    finger_count: usize,
    last_fingers: Vec<i32>,
}

impl Composer {
    pub fn new(config: &SenderConfig) -> Self {
        Self {
            source_timeout: config.source_timeout(),
            deadline: config.compose_deadline(),
            inverted: config.inverted_ids.clone(),
            finger_max: config.finger_max,
            finger_count: config.finger_count,
            last_fingers: vec![0; config.finger_count],
        }
    }

    /// Compose one snapshot from the two sources.
    ///
    /// Both queries run concurrently; the pair is awaited under the overall
    /// deadline. If the deadline elapses both readings are discarded and
    /// the per-source fallbacks apply, surfaced to the caller as a single
    /// [`BridgeError::CompositionTimeout`].
    pub async fn compose<A, P>(&mut self, actuators: &mut A, sensor: &mut P) -> Result<Snapshot>
    where
        A: ActuatorSource,
        P: PoseSensor,
    {
        let joined = tokio::time::timeout(self.deadline, async {
            tokio::join!(
                adapter::query_joints(actuators, self.source_timeout, &self.inverted),
                adapter::query_fingers(
                    sensor,
                    self.source_timeout,
                    self.finger_max,
                    self.finger_count
                ),
            )
        })
        .await;

        let (joints, fingers) = match joined {
            Ok(results) => results,
            Err(_) => {
                return Err(BridgeError::CompositionTimeout { duration: self.deadline });
            }
        };

        let joints = joints.unwrap_or_default();
        let fingers = match fingers {
            Some(fresh) => {
                self.last_fingers.clone_from(&fresh);
                fresh
            }
            None => {
                debug!("pose read unavailable, reusing last finger values");
                self.last_fingers.clone()
            }
        };

        Ok(Snapshot::now(joints, fingers))
    }

    /// The finger values the next failed pose read would fall back to.
    pub fn last_fingers(&self) -> &[i32] {
        &self.last_fingers
    }
}
