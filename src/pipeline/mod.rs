//! Pipeline orchestration
//!
//! Wires one moderator, N producers and M consumers around a rendezvous
//! channel and runs them to completion.
//!
//! # Lifecycle
//!
//! 1. **Setup**: rendezvous channel, stop inbox and stop signal are created
//! 2. **Spawn**: moderator, producers and consumers each get a named thread
//! 3. **Stop**: the first worker to hit its sentinel files a stop request; the
//!    moderator accepts it and fires the signal
//! 4. **Fan-in**: the orchestrator waits for the signal, then until every
//!    consumer has exited, then joins all threads and assembles a `RunReport`

use crate::config::PipelineConfig;
use crate::coordinator::{stop_inbox, Moderator, StopSignal};
use crate::distribution::{uniform_factory, DistributionFactory};
use crate::stats::RunReport;
use crate::worker::consumer::Consumer;
use crate::worker::producer::Producer;
use crate::worker::{WorkItem, WorkerContext};
use crate::Result;
use anyhow::Context;
use chrono::Utc;
use crossbeam::channel;
use crossbeam::sync::WaitGroup;
use log::{debug, info};
use std::thread::{self, JoinHandle};
use std::time::Instant;

pub struct Pipeline {
    config: PipelineConfig,
    factory: DistributionFactory,
}

impl Pipeline {
    /// Create a pipeline whose producers draw uniform values
    pub fn new(config: PipelineConfig) -> Self {
        let factory = uniform_factory(config.seed);
        Self { config, factory }
    }

    /// Replace the producers' value sources
    pub fn with_distribution(mut self, factory: DistributionFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Run until a stop request is honored and every worker has exited
    pub fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        let start = Instant::now();
        let max = self.config.max;

        info!(
            "Starting pipeline: {} producer(s), {} consumer(s), values in [0, {})",
            self.config.producers, self.config.consumers, max
        );

        let (work_tx, work_rx) = channel::bounded::<WorkItem>(0);
        let (requester, inbox) = stop_inbox();
        let signal = StopSignal::new();
        let ctx = WorkerContext::new(requester, signal.clone());

        let moderator = Moderator::new(inbox, signal.clone());
        let moderator_signal = signal.clone();
        let moderator_handle = spawn_named("moderator".to_string(), &signal, move || {
            let outcome = moderator.run();
            // Nobody else fires on this path; release the orchestrator's wait
            if outcome.is_err() {
                moderator_signal.fire();
            }
            outcome
        })?;

        let mut producer_handles = Vec::with_capacity(self.config.producers);
        for index in 0..self.config.producers {
            let producer = Producer::new(
                index,
                max,
                (self.factory)(index),
                work_tx.clone(),
                ctx.clone(),
            );
            producer_handles.push(spawn_named(format!("producer-{}", index), &signal, move || {
                producer.run()
            })?);
        }
        drop(work_tx);

        let consumers_done = WaitGroup::new();
        let mut consumer_handles = Vec::with_capacity(self.config.consumers);
        for index in 0..self.config.consumers {
            let consumer = Consumer::new(index, max, work_rx.clone(), ctx.clone());
            let done = consumers_done.clone();
            consumer_handles.push(spawn_named(format!("consumer-{}", index), &signal, move || {
                let stats = consumer.run();
                drop(done);
                stats
            })?);
        }
        drop(work_rx);
        drop(ctx);

        signal.wait();
        let stop_observed = start.elapsed();
        debug!("Stop signal fired after {:?}", stop_observed);

        consumers_done.wait();
        debug!("All consumers finished");

        let consumers = consumer_handles
            .into_iter()
            .map(|h| h.join().map_err(|_| anyhow::anyhow!("Consumer thread panicked")))
            .collect::<Result<Vec<_>>>()?;

        let producers = producer_handles
            .into_iter()
            .map(|h| h.join().map_err(|_| anyhow::anyhow!("Producer thread panicked")))
            .collect::<Result<Vec<_>>>()?;

        let stopped_by = moderator_handle
            .join()
            .map_err(|_| anyhow::anyhow!("Moderator thread panicked"))?
            .context("Moderator failed")?;

        let elapsed = start.elapsed();
        info!("Pipeline stopped by {} after {:?}", stopped_by, elapsed);

        Ok(RunReport {
            stopped_by,
            started_at,
            elapsed,
            stop_observed,
            producers,
            consumers,
        })
    }
}

/// Spawn a named thread, firing the stop signal if the spawn fails so threads
/// already running can wind down
fn spawn_named<T, F>(name: String, signal: &StopSignal, f: F) -> Result<JoinHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(f)
        .with_context(|| {
            signal.fire();
            format!("Failed to spawn {} thread", name)
        })
}
