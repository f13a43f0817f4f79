//! Run statistics
//!
//! A `RunReport` gathers what every producer and consumer returned when it left
//! its loop, together with the stop request that ended the run.

use crate::coordinator::StopRequest;
use crate::worker::consumer::ConsumerStats;
use crate::worker::producer::ProducerStats;
use crate::worker::WorkItem;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::time::Duration;

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// The single stop request that was honored
    pub stopped_by: StopRequest,
    pub started_at: DateTime<Utc>,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Time from start until the stop signal fired
    #[serde(rename = "stop_observed_secs", serialize_with = "serialize_secs")]
    pub stop_observed: Duration,
    pub producers: Vec<ProducerStats>,
    pub consumers: Vec<ConsumerStats>,
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl RunReport {
    /// Items handed off by all producers
    pub fn produced_total(&self) -> u64 {
        self.producers.iter().map(|p| p.produced).sum()
    }

    /// Items received by all consumers
    pub fn consumed_total(&self) -> u64 {
        self.consumers.iter().map(|c| c.consumed()).sum()
    }

    /// Items received by more than one consumer, or twice by the same one
    ///
    /// Always empty for a correct run.
    pub fn duplicate_items(&self) -> Vec<WorkItem> {
        let mut seen = HashSet::new();
        self.consumers
            .iter()
            .flat_map(|c| c.received.iter())
            .filter(|item| !seen.insert((item.producer, item.seq)))
            .copied()
            .collect()
    }

    /// Every consumed value, consumer by consumer
    pub fn consumed_values(&self) -> Vec<u64> {
        self.consumers
            .iter()
            .flat_map(|c| c.received.iter().map(|item| item.value))
            .collect()
    }
}
