//! Scripted source doubles shared across the crate's unit tests.
//!
//! Each scripted source plays back a queue of [`SourceStep`]s, then keeps
//! yielding its fallback value, so tests can express per-call outcomes
//! (reading, fault, stall) without standing up real hardware.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{BridgeError, Result};
use crate::source::{ActuatorConnector, ActuatorSource, PoseConnector, PoseSensor};
use crate::types::ActuatorReading;

/// One scripted upstream call outcome.
pub enum SourceStep<T> {
    /// Return this reading.
    Yield(T),
    /// Fail with an upstream fault.
    Fail(&'static str),
    /// Sleep for the given duration, then fail; models a stalled upstream.
    Stall(Duration),
}

pub struct ScriptedActuators {
    steps: VecDeque<SourceStep<Vec<ActuatorReading>>>,
    fallback: Vec<ActuatorReading>,
    closes: Arc<AtomicU32>,
}

impl ScriptedActuators {
    pub fn with_steps(steps: Vec<SourceStep<Vec<ActuatorReading>>>) -> Self {
        Self { steps: steps.into(), fallback: Vec::new(), closes: Arc::default() }
    }

    pub fn with_fallback(fallback: Vec<ActuatorReading>) -> Self {
        Self { steps: VecDeque::new(), fallback, closes: Arc::default() }
    }

    /// Shared close-call counter, for asserting teardown happened.
    pub fn close_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.closes)
    }
}

#[async_trait]
impl ActuatorSource for ScriptedActuators {
    async fn query_all(&mut self) -> Result<Vec<ActuatorReading>> {
        match self.steps.pop_front() {
            Some(SourceStep::Yield(readings)) => Ok(readings),
            Some(SourceStep::Fail(reason)) => {
                Err(BridgeError::source_fault("actuator service", reason))
            }
            Some(SourceStep::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Err(BridgeError::source_timeout("actuator service", delay))
            }
            None => Ok(self.fallback.clone()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct ScriptedGlove {
    steps: VecDeque<SourceStep<Vec<i32>>>,
    fallback: Vec<i32>,
    fail_forever: bool,
    closes: Arc<AtomicU32>,
}

impl ScriptedGlove {
    pub fn with_steps(steps: Vec<SourceStep<Vec<i32>>>) -> Self {
        Self { steps: steps.into(), fallback: vec![0; 6], fail_forever: false, closes: Arc::default() }
    }

    pub fn with_fallback(fallback: Vec<i32>) -> Self {
        Self { steps: VecDeque::new(), fallback, fail_forever: false, closes: Arc::default() }
    }

    /// A glove whose every read fails, modelling an unplugged device.
    pub fn failing() -> Self {
        Self {
            steps: VecDeque::new(),
            fallback: Vec::new(),
            fail_forever: true,
            closes: Arc::default(),
        }
    }

    pub fn close_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.closes)
    }
}

#[async_trait]
impl PoseSensor for ScriptedGlove {
    async fn read_channels(&mut self) -> Result<Vec<i32>> {
        match self.steps.pop_front() {
            Some(SourceStep::Yield(channels)) => Ok(channels),
            Some(SourceStep::Fail(reason)) => Err(BridgeError::source_fault("pose sensor", reason)),
            Some(SourceStep::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Err(BridgeError::source_timeout("pose sensor", delay))
            }
            None if self.fail_forever => {
                Err(BridgeError::source_fault("pose sensor", "device unplugged"))
            }
            None => Ok(self.fallback.clone()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Connector producing fresh [`ScriptedActuators`] with a fixed fallback.
pub struct ScriptedActuatorConnector {
    pub fallback: Vec<ActuatorReading>,
    pub connects: Arc<AtomicU32>,
    pub refuse: bool,
}

impl ScriptedActuatorConnector {
    pub fn yielding(fallback: Vec<ActuatorReading>) -> Self {
        Self { fallback, connects: Arc::default(), refuse: false }
    }

    pub fn refusing() -> Self {
        Self { fallback: Vec::new(), connects: Arc::default(), refuse: true }
    }
}

#[async_trait]
impl ActuatorConnector for ScriptedActuatorConnector {
    type Source = ScriptedActuators;

    async fn connect(&self) -> Result<ScriptedActuators> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(BridgeError::source_fault("actuator service", "connection refused"));
        }
        Ok(ScriptedActuators::with_fallback(self.fallback.clone()))
    }
}

/// Connector producing fresh [`ScriptedGlove`]s with a fixed fallback.
pub struct ScriptedGloveConnector {
    pub fallback: Vec<i32>,
    pub connects: Arc<AtomicU32>,
    pub refuse: bool,
    pub sensors_fail: bool,
}

impl ScriptedGloveConnector {
    pub fn yielding(fallback: Vec<i32>) -> Self {
        Self { fallback, connects: Arc::default(), refuse: false, sensors_fail: false }
    }

    pub fn refusing() -> Self {
        Self { fallback: vec![0; 6], connects: Arc::default(), refuse: true, sensors_fail: false }
    }

    /// Connects fine, but every sensor it hands out fails on read.
    pub fn with_failing_sensors() -> Self {
        Self { fallback: Vec::new(), connects: Arc::default(), refuse: false, sensors_fail: true }
    }
}

#[async_trait]
impl PoseConnector for ScriptedGloveConnector {
    type Sensor = ScriptedGlove;

    async fn connect(&self) -> Result<ScriptedGlove> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(BridgeError::source_fault("pose sensor", "device not found"));
        }
        if self.sensors_fail {
            return Ok(ScriptedGlove::failing());
        }
        Ok(ScriptedGlove::with_fallback(self.fallback.clone()))
    }
}
