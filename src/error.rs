//! Error types for the telemetry bridge.
//!
//! The bridge distinguishes errors by where they are absorbed:
//!
//! - **Source errors** (`Source`, `SourceTimeout`): a single upstream query
//!   failed or overran its bound. Recovered locally by the source adapters,
//!   which substitute an empty or stale reading. Never reach the scheduler.
//! - **Cycle failures** (`CompositionTimeout`, `Transport`, `Encode`): the
//!   cycle as a whole produced nothing transmittable. These feed the
//!   consecutive-failure counter and can trigger reconnection.
//! - **Setup failures** (`Setup`): initialization errors. Fatal to the run;
//!   the scheduler loop is never entered.
//!
//! Use [`BridgeError::is_cycle_failure`] to tell the middle class apart:
//!
//! ```rust
//! use puppetlink::BridgeError;
//! use std::time::Duration;
//!
//! let error = BridgeError::CompositionTimeout { duration: Duration::from_millis(600) };
//! assert!(error.is_cycle_failure());
//! ```

use std::time::Duration;
use thiserror::Error;

/// Result type alias for bridge operations.
pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

/// Main error type for the telemetry bridge.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BridgeError {
    #[error("{source_name} query failed: {reason}")]
    Source {
        source_name: &'static str,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{source_name} query timed out after {duration:?}")]
    SourceTimeout { source_name: &'static str, duration: Duration },

    #[error("snapshot composition timed out after {duration:?}")]
    CompositionTimeout { duration: Duration },

    #[error("transport fault during {operation}")]
    Transport {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot encoding failed")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error("setup failed during {stage}: {reason}")]
    Setup {
        stage: &'static str,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl BridgeError {
    /// Returns whether this error counts toward the consecutive-failure
    /// threshold that drives reconnection.
    ///
    /// Per-source errors are absorbed by the adapters before the scheduler
    /// sees them, and setup errors abort the run before the counter exists,
    /// so neither is a cycle failure.
    pub fn is_cycle_failure(&self) -> bool {
        match self {
            BridgeError::CompositionTimeout { .. } => true,
            BridgeError::Transport { .. } => true,
            BridgeError::Encode { .. } => true,
            BridgeError::Source { .. } => false,
            BridgeError::SourceTimeout { .. } => false,
            BridgeError::Setup { .. } => false,
        }
    }

    /// Returns whether this error is fatal to the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BridgeError::Setup { .. })
    }

    /// Helper constructor for upstream faults.
    pub fn source_fault(source_name: &'static str, reason: impl Into<String>) -> Self {
        BridgeError::Source { source_name, reason: reason.into(), source: None }
    }

    /// Helper constructor for upstream faults with an underlying cause.
    pub fn source_fault_with_source(
        source_name: &'static str,
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        BridgeError::Source { source_name, reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for upstream timeouts.
    pub fn source_timeout(source_name: &'static str, duration: Duration) -> Self {
        BridgeError::SourceTimeout { source_name, duration }
    }

    /// Helper constructor for transport faults.
    pub fn transport_fault(operation: &'static str, source: std::io::Error) -> Self {
        BridgeError::Transport { operation, source }
    }

    /// Helper constructor for setup failures.
    pub fn setup_failure(stage: &'static str, reason: impl Into<String>) -> Self {
        BridgeError::Setup { stage, reason: reason.into(), source: None }
    }

    /// Helper constructor for setup failures with an underlying cause.
    pub fn setup_failure_with_source(
        stage: &'static str,
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        BridgeError::Setup { stage, reason: reason.into(), source: Some(source) }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Encode { source: err }
    }
}
