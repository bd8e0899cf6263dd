//! Upstream source traits.
//!
//! The bridge samples two independently failing collaborators: the robot's
//! actuator-state service and the wearable pose sensor. Both are abstracted
//! behind handle traits so the core loop can be driven against real drivers
//! or scripted test doubles.
//!
//! Connectors exist separately from handles because the reconnection
//! procedure replaces handles wholesale: tear the old one down, build a new
//! one from the same connector.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ActuatorReading;

/// A session with the actuator-state service.
///
/// Implementations perform one upstream request per [`query_all`] call and
/// do not retry internally; bounding the call in time is the adapter's job.
///
/// [`query_all`]: ActuatorSource::query_all
#[async_trait]
pub trait ActuatorSource: Send + 'static {
    /// Query the current state of every actuator.
    async fn query_all(&mut self) -> Result<Vec<ActuatorReading>>;

    /// Close the session. Called during teardown and reconnection; errors
    /// are reported but never block either.
    async fn close(&mut self) -> Result<()>;
}

/// A session with the wearable pose sensor.
#[async_trait]
pub trait PoseSensor: Send + 'static {
    /// Read the raw multi-channel position values, one per finger channel.
    async fn read_channels(&mut self) -> Result<Vec<i32>>;

    /// Close the device. Same teardown contract as [`ActuatorSource::close`].
    async fn close(&mut self) -> Result<()>;
}

/// Factory for actuator-state sessions.
#[async_trait]
pub trait ActuatorConnector: Send + Sync + 'static {
    type Source: ActuatorSource;

    /// Establish a fresh session with the actuator-state service.
    async fn connect(&self) -> Result<Self::Source>;
}

/// Factory for pose sensor sessions.
#[async_trait]
pub trait PoseConnector: Send + Sync + 'static {
    type Sensor: PoseSensor;

    /// Open a fresh session with the pose sensor.
    async fn connect(&self) -> Result<Self::Sensor>;
}
