//! Worker thread implementation
//!
//! Producers and consumers are the execution units of a pipeline run. Each one
//! runs in its own thread and shares only three things with the rest of the
//! system: the rendezvous work channel, the stop requester and the stop signal.
//!
//! # Cancellation
//!
//! Cancellation is cooperative. A worker checks the stop signal at the head of
//! every iteration and races each blocking channel operation against it, so a
//! worker exits within one iteration of the signal firing. Nothing interrupts
//! a worker between those points.
//!
//! # Example
//!
//! ```
//! use stopline::coordinator::{stop_inbox, StopSignal};
//! use stopline::distribution::scripted::ScriptedDistribution;
//! use stopline::worker::{ExitReason, WorkerContext, producer::Producer};
//!
//! let (requester, inbox) = stop_inbox();
//! let ctx = WorkerContext::new(requester, StopSignal::new());
//! let (work_tx, _work_rx) = crossbeam::channel::bounded(0);
//!
//! // A producer that draws the sentinel straight away never touches the channel
//! let producer = Producer::new(0, 4, Box::new(ScriptedDistribution::new(vec![0])), work_tx, ctx);
//! let stats = producer.run();
//!
//! assert_eq!(stats.exit, ExitReason::Sentinel);
//! assert_eq!(inbox.accepted().unwrap().label, "producer-0");
//! ```

pub mod consumer;
pub mod owner;
pub mod producer;

use crate::coordinator::{StopRequester, StopSignal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value that makes a producer ask to stop
pub const SENTINEL: u64 = 0;

/// Value that makes a consumer ask to stop (`max - 1`)
#[inline]
pub fn terminal_value(max: u64) -> u64 {
    max.saturating_sub(1)
}

/// A unit of work handed from one producer to one consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    /// Index of the producer that generated the item
    pub producer: usize,
    /// Per-producer sequence number
    pub seq: u64,
    /// Drawn value in `[0, max)`
    pub value: u64,
}

/// Worker identity, used as the stop request label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerId {
    Producer(usize),
    Consumer(usize),
}

impl WorkerId {
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerId::Producer(i) => write!(f, "producer-{}", i),
            WorkerId::Consumer(i) => write!(f, "consumer-{}", i),
        }
    }
}

/// Why a worker left its loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Producer drew the sentinel value
    Sentinel,
    /// Stop signal observed
    Stopped,
    /// The other side of the work channel is gone
    Disconnected,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Sentinel => write!(f, "sentinel"),
            ExitReason::Stopped => write!(f, "stopped"),
            ExitReason::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Stop plumbing shared by every worker
#[derive(Clone)]
pub struct WorkerContext {
    pub requester: StopRequester,
    pub signal: StopSignal,
}

impl WorkerContext {
    pub fn new(requester: StopRequester, signal: StopSignal) -> Self {
        Self { requester, signal }
    }
}

/// Outcome of a channel operation raced against the stop signal
#[derive(Debug)]
pub(crate) enum Handoff<T> {
    Done(T),
    Stopped,
    Disconnected,
}
