//! Producer worker
//!
//! Draws values from its distribution and hands them to the rendezvous channel.
//! Drawing the sentinel `0` files a stop request and ends the producer.

use super::{ExitReason, Handoff, WorkItem, WorkerContext, WorkerId, SENTINEL};
use crate::distribution::Distribution;
use crossbeam::channel::Sender;
use crossbeam::select;
use log::debug;
use serde::{Deserialize, Serialize};

/// Per-producer results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerStats {
    pub index: usize,
    /// Items accepted by a consumer
    pub produced: u64,
    pub exit: ExitReason,
}

pub struct Producer {
    index: usize,
    max: u64,
    distribution: Box<dyn Distribution>,
    work: Sender<WorkItem>,
    ctx: WorkerContext,
}

impl Producer {
    pub fn new(
        index: usize,
        max: u64,
        distribution: Box<dyn Distribution>,
        work: Sender<WorkItem>,
        ctx: WorkerContext,
    ) -> Self {
        Self {
            index,
            max,
            distribution,
            work,
            ctx,
        }
    }

    /// Run until the sentinel is drawn or the stop signal fires
    pub fn run(self) -> ProducerStats {
        let Producer {
            index,
            max,
            mut distribution,
            work,
            ctx,
        } = self;

        let id = WorkerId::Producer(index);
        let stop = ctx.signal.listener();
        let mut seq = 0u64;

        let exit = loop {
            let value = distribution.next_value(max);

            if value == SENTINEL {
                ctx.requester.request(id.label());
                break ExitReason::Sentinel;
            }

            if ctx.signal.is_fired() {
                break ExitReason::Stopped;
            }

            let item = WorkItem {
                producer: index,
                seq,
                value,
            };

            let handoff = select! {
                send(work, item) -> res => match res {
                    Ok(()) => Handoff::Done(()),
                    Err(_) => Handoff::Disconnected,
                },
                recv(stop) -> _ => Handoff::Stopped,
            };

            match handoff {
                Handoff::Done(()) => seq += 1,
                Handoff::Stopped => break ExitReason::Stopped,
                Handoff::Disconnected => break ExitReason::Disconnected,
            }
        };

        debug!("{} exiting ({}) after {} item(s)", id, exit, seq);

        ProducerStats {
            index,
            produced: seq,
            exit,
        }
    }
}
