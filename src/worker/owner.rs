//! Owned sequence generator
//!
//! The channel owner pattern: a generator thread owns the sending half, emits
//! `0..count` and drops the sender when done, so a consumer can simply iterate
//! the receiver until it ends.

use crate::Result;
use anyhow::Context;
use crossbeam::channel::{self, Receiver};
use log::{debug, info};
use std::thread;

/// Spawn a generator thread and return the receiving half of its channel
pub fn owned_sequence(count: u64) -> Result<Receiver<u64>> {
    let (tx, rx) = channel::bounded(0);

    thread::Builder::new()
        .name("sequence-owner".to_string())
        .spawn(move || {
            for value in 0..count {
                if tx.send(value).is_err() {
                    debug!("Sequence receiver dropped after {} value(s)", value);
                    return;
                }
            }
        })
        .context("Failed to spawn sequence owner thread")?;

    Ok(rx)
}

/// Consume a sequence until its owner closes it
pub fn drain_sequence(rx: Receiver<u64>) -> Vec<u64> {
    rx.iter()
        .inspect(|value| info!("sequence value {}", value))
        .collect()
}
