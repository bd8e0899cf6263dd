//! The scheduler loop driving the sample/merge/transmit cycle.
//!
//! One [`Sender`] owns everything with a lifetime: the source handles, the
//! outbound socket, the composer's fallback state, and the health monitor.
//! The run proceeds through Setup, Running, Stopping, and Stopped phases;
//! any setup failure aborts before the loop is entered, and a stop request
//! is honored at loop-iteration granularity — an in-flight cycle always
//! completes its send and health update first.

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::composer::Composer;
use crate::config::SenderConfig;
use crate::error::{BridgeError, Result};
use crate::health::HealthMonitor;
use crate::source::{ActuatorConnector, ActuatorSource, PoseConnector, PoseSensor};
use crate::transport::{SendOutcome, UdpTransport};

/// Summary of a completed run, returned once the loop stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderReport {
    /// Cycles started (including failed ones).
    pub cycles: u64,
    /// Datagrams handed to the network stack.
    pub packets_sent: u64,
    /// Datagrams discarded due to send-buffer congestion.
    pub packets_dropped: u64,
    /// Source reconnections triggered by the failure threshold.
    pub reconnects: u32,
}

/// Fixed-rate telemetry sender.
///
/// Construct with [`Sender::new`], then drive with [`Sender::run`]. The
/// connectors are kept for the whole run so the reconnection procedure can
/// replace source handles wholesale.
pub struct Sender<AC, PC>
where
    AC: ActuatorConnector,
    PC: PoseConnector,
{
    config: SenderConfig,
    actuator_connector: AC,
    pose_connector: PC,
}

impl<AC, PC> Sender<AC, PC>
where
    AC: ActuatorConnector,
    PC: PoseConnector,
{
    /// Create a sender. Fails fast on an invalid configuration.
    pub fn new(config: SenderConfig, actuator_connector: AC, pose_connector: PC) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, actuator_connector, pose_connector })
    }

    /// Run the telemetry loop until `cancel` is triggered.
    ///
    /// Returns the delivery summary on a clean stop, or the setup error if
    /// initialization failed before the loop was entered.
    pub async fn run(self, cancel: CancellationToken) -> Result<SenderReport> {
        let Self { config, actuator_connector, pose_connector } = self;

        // Setup: sources first, then the socket. No retries here — a host
        // that wants retry-on-boot wraps the whole run.
        info!(
            host = %config.host,
            port = config.port,
            rate_hz = config.rate_hz,
            "starting telemetry bridge"
        );
        let mut actuators = actuator_connector.connect().await.map_err(|err| {
            BridgeError::setup_failure_with_source(
                "actuator connect",
                "could not establish actuator session",
                Box::new(err),
            )
        })?;
        let mut sensor = match pose_connector.connect().await {
            Ok(sensor) => sensor,
            Err(err) => {
                // Don't leak the session established one line up.
                let _ = actuators.close().await;
                return Err(BridgeError::setup_failure_with_source(
                    "pose sensor open",
                    "could not open pose sensor",
                    Box::new(err),
                ));
            }
        };
        let transport = match UdpTransport::bind(&config) {
            Ok(transport) => transport,
            Err(err) => {
                let _ = actuators.close().await;
                let _ = sensor.close().await;
                return Err(err);
            }
        };

        let mut composer = Composer::new(&config);
        let mut health = HealthMonitor::new(config.reconnect_threshold);
        let mut interval = tokio::time::interval(config.period());
        // An overrunning cycle starts the next one immediately; missed
        // ticks are absorbed rather than replayed as a burst.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut cycles = 0u64;
        info!(destination = %transport.destination(), "entering run loop");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("stop requested");
                    break;
                }
                _ = interval.tick() => {}
            }

            cycles += 1;
            let cycle_result = match composer.compose(&mut actuators, &mut sensor).await {
                Ok(snapshot) => {
                    trace!(
                        joints = snapshot.joints.len(),
                        fingers = snapshot.fingers.len(),
                        "snapshot composed"
                    );
                    transport.send(&snapshot)
                }
                Err(err) => Err(err),
            };

            match cycle_result {
                Ok(SendOutcome::Sent) => {
                    health.record_sent();
                    health.record_success();
                }
                Ok(SendOutcome::Dropped) => {
                    warn!("send buffer full, datagram dropped");
                    health.record_dropped();
                    health.record_success();
                }
                Err(err) => {
                    warn!(error = %err, consecutive = health.consecutive_failures() + 1, "cycle failed");
                    if health.record_cycle_failure() {
                        reconnect(
                            &actuator_connector,
                            &pose_connector,
                            &mut actuators,
                            &mut sensor,
                            &mut health,
                        )
                        .await;
                    }
                }
            }

            health.report_if_due();
        }

        // Stopping: orderly, best-effort teardown.
        debug!("tearing down sources");
        if let Err(err) = actuators.close().await {
            debug!(error = %err, "actuator close failed");
        }
        if let Err(err) = sensor.close().await {
            debug!(error = %err, "pose sensor close failed");
        }

        let report = SenderReport {
            cycles,
            packets_sent: health.packets_sent(),
            packets_dropped: health.packets_dropped(),
            reconnects: health.reconnects(),
        };
        info!(
            cycles = report.cycles,
            sent = report.packets_sent,
            dropped = report.packets_dropped,
            reconnects = report.reconnects,
            "telemetry bridge stopped"
        );
        Ok(report)
    }
}

/// Replace both source handles after sustained failure.
///
/// Teardown errors are swallowed and each reconnect sub-step failure is
/// logged but not fatal: the link returns to the healthy state either way,
/// and a still-broken source just fails cycles until the threshold trips
/// again. The failure counter was already reset when reconnection began.
async fn reconnect<AC, PC>(
    actuator_connector: &AC,
    pose_connector: &PC,
    actuators: &mut AC::Source,
    sensor: &mut PC::Sensor,
    health: &mut HealthMonitor,
) where
    AC: ActuatorConnector,
    PC: PoseConnector,
{
    health.begin_reconnect();
    warn!("failure threshold reached, reconnecting sources");

    if let Err(err) = actuators.close().await {
        debug!(error = %err, "actuator teardown failed");
    }
    if let Err(err) = sensor.close().await {
        debug!(error = %err, "pose sensor teardown failed");
    }

    match actuator_connector.connect().await {
        Ok(fresh) => *actuators = fresh,
        Err(err) => warn!(error = %err, "actuator reconnect failed"),
    }
    match pose_connector.connect().await {
        Ok(fresh) => *sensor = fresh,
        Err(err) => warn!(error = %err, "pose sensor reconnect failed"),
    }

    health.finish_reconnect();
}
