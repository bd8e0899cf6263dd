//! Sender configuration.
//!
//! All tunable constants of the bridge live in [`SenderConfig`] and are passed
//! explicitly into [`Sender::new`](crate::Sender::new) — there is no global
//! state. Defaults carry the reference deployment values; a YAML document can
//! override any subset of fields.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Configuration for a [`Sender`](crate::Sender).
///
/// ```rust
/// use puppetlink::SenderConfig;
///
/// let config = SenderConfig::from_yaml("host: 10.33.10.154\nrate_hz: 32.0")?;
/// assert_eq!(config.port, 8888); // unset fields keep their defaults
/// # Ok::<(), puppetlink::BridgeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SenderConfig {
    /// Destination host for outgoing datagrams.
    pub host: String,

    /// Destination port for outgoing datagrams.
    pub port: u16,

    /// Snapshot send rate in Hz; the cycle period is its reciprocal.
    pub rate_hz: f64,

    /// Bound on each individual upstream query, in seconds.
    pub source_timeout_secs: f64,

    /// Slack added on top of the per-source bound to form the overall
    /// composition deadline, in seconds.
    pub compose_slack_secs: f64,

    /// Consecutive cycle failures that trigger source reconnection.
    pub reconnect_threshold: u32,

    /// Number of finger channels reported by the pose sensor.
    pub finger_count: usize,

    /// Full-scale finger channel value; readings are flipped against it.
    pub finger_max: i32,

    /// Actuator ids whose positions are sign-inverted before transmission.
    pub inverted_ids: HashSet<u32>,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
            rate_hz: 10.0,
            source_timeout_secs: 0.5,
            compose_slack_secs: 0.1,
            reconnect_threshold: 10,
            finger_count: 6,
            finger_max: 65535,
            inverted_ids: [11, 15, 21, 25].into_iter().collect(),
        }
    }
}

impl SenderConfig {
    /// Parse a configuration from a YAML document.
    ///
    /// Fields absent from the document keep their defaults. The parsed
    /// configuration is validated before being returned.
    pub fn from_yaml(doc: &str) -> Result<Self> {
        let config: SenderConfig = serde_yaml_ng::from_str(doc).map_err(|err| {
            BridgeError::setup_failure_with_source(
                "configuration",
                "invalid YAML document",
                Box::new(err),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the bridge cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.rate_hz.is_finite() && self.rate_hz > 0.0) {
            return Err(BridgeError::setup_failure(
                "configuration",
                format!("rate_hz must be positive, got {}", self.rate_hz),
            ));
        }
        if !(self.source_timeout_secs.is_finite() && self.source_timeout_secs > 0.0) {
            return Err(BridgeError::setup_failure(
                "configuration",
                format!("source_timeout_secs must be positive, got {}", self.source_timeout_secs),
            ));
        }
        if !(self.compose_slack_secs.is_finite() && self.compose_slack_secs >= 0.0) {
            return Err(BridgeError::setup_failure(
                "configuration",
                format!("compose_slack_secs must be non-negative, got {}", self.compose_slack_secs),
            ));
        }
        if self.reconnect_threshold == 0 {
            return Err(BridgeError::setup_failure(
                "configuration",
                "reconnect_threshold must be at least 1",
            ));
        }
        if self.finger_count == 0 {
            return Err(BridgeError::setup_failure(
                "configuration",
                "finger_count must be at least 1",
            ));
        }
        Ok(())
    }

    /// Interval between cycle starts.
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate_hz)
    }

    /// Bound on each individual upstream query.
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.source_timeout_secs)
    }

    /// Overall deadline for one snapshot composition: the per-source bound
    /// plus the configured slack.
    pub fn compose_deadline(&self) -> Duration {
        Duration::from_secs_f64(self.source_timeout_secs + self.compose_slack_secs)
    }
}
