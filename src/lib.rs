//! Resilient UDP telemetry bridge for robot actuator and glove pose data.
//!
//! Puppetlink samples two live, independently failing sources — a robot's
//! actuator-state service and a wearable position-sensing glove — and
//! forwards a merged, timestamped snapshot over UDP at a fixed rate, so a
//! downstream consumer (animation, teleoperation, monitoring) can observe
//! low-latency pose data without a session or acknowledgment protocol.
//!
//! # Features
//!
//! - **Degraded-mode resilience**: either source can fail per cycle; joints
//!   read as empty, fingers hold their last known pose, the loop keeps going
//! - **Bounded latency**: every upstream call is bounded, and one overall
//!   deadline caps each cycle's I/O
//! - **Congestion-aware transport**: non-blocking sends classify a full
//!   buffer as a dropped packet, never a stall
//! - **Self-healing**: sustained failure tears down and reconnects both
//!   sources automatically
//!
//! # Quick Start
//!
//! Implement the two source traits for your hardware, then run a sender:
//!
//! ```rust,no_run
//! use puppetlink::{Puppetlink, SenderConfig};
//! use tokio_util::sync::CancellationToken;
//! # use puppetlink::{ActuatorConnector, ActuatorSource, PoseConnector, PoseSensor};
//! # use puppetlink::{ActuatorReading, Result};
//! # struct Robot;
//! # struct RobotSession;
//! # #[async_trait::async_trait]
//! # impl ActuatorConnector for Robot {
//! #     type Source = RobotSession;
//! #     async fn connect(&self) -> Result<RobotSession> { Ok(RobotSession) }
//! # }
//! # #[async_trait::async_trait]
//! # impl ActuatorSource for RobotSession {
//! #     async fn query_all(&mut self) -> Result<Vec<ActuatorReading>> { Ok(vec![]) }
//! #     async fn close(&mut self) -> Result<()> { Ok(()) }
//! # }
//! # struct Glove;
//! # struct GloveSession;
//! # #[async_trait::async_trait]
//! # impl PoseConnector for Glove {
//! #     type Sensor = GloveSession;
//! #     async fn connect(&self) -> Result<GloveSession> { Ok(GloveSession) }
//! # }
//! # #[async_trait::async_trait]
//! # impl PoseSensor for GloveSession {
//! #     async fn read_channels(&mut self) -> Result<Vec<i32>> { Ok(vec![0; 6]) }
//! #     async fn close(&mut self) -> Result<()> { Ok(()) }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> puppetlink::Result<()> {
//!     let config = SenderConfig { host: "10.33.10.154".into(), ..SenderConfig::default() };
//!     let sender = Puppetlink::sender(config, Robot, Glove)?;
//!
//!     let cancel = CancellationToken::new();
//!     let report = sender.run(cancel).await?;
//!     println!("sent {} datagrams", report.packets_sent);
//!     Ok(())
//! }
//! ```
//!
//! The cancellation token is the only stop mechanism: wire it to Ctrl-C or
//! whatever shutdown signal the host process uses. The handler's only job
//! is to call `cancel()`; the loop checks it once per iteration and always
//! finishes the in-flight cycle first.

pub mod adapter;
mod composer;
mod config;
mod error;
mod health;
mod sender;
pub mod source;
#[cfg(test)]
mod test_utils;
pub mod transform;
mod transport;
pub mod types;

// Core exports
pub use composer::Composer;
pub use config::SenderConfig;
pub use error::{BridgeError, Result};
pub use health::{HealthMonitor, LinkState};
pub use sender::{Sender, SenderReport};
pub use source::{ActuatorConnector, ActuatorSource, PoseConnector, PoseSensor};
pub use transport::{SendOutcome, UdpTransport};
pub use types::{ActuatorReading, Snapshot};

/// Unified entry point for building senders.
///
/// A thin factory over [`Sender::new`], mirroring the one-call setup most
/// hosts want.
pub struct Puppetlink;

impl Puppetlink {
    /// Build a telemetry sender from a configuration and the two source
    /// connectors.
    ///
    /// # Errors
    ///
    /// Returns a setup error if the configuration fails validation. Source
    /// and socket initialization happen later, inside [`Sender::run`].
    pub fn sender<AC, PC>(
        config: SenderConfig,
        actuators: AC,
        pose_sensor: PC,
    ) -> Result<Sender<AC, PC>>
    where
        AC: ActuatorConnector,
        PC: PoseConnector,
    {
        Sender::new(config, actuators, pose_sensor)
    }
}
