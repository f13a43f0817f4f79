//! Consumer worker
//!
//! Pulls items off the rendezvous channel until the stop signal fires. Seeing
//! the terminal value `max - 1` files a stop request, but the consumer keeps
//! going until the signal actually arrives.

use super::{terminal_value, ExitReason, Handoff, WorkItem, WorkerContext, WorkerId};
use crossbeam::channel::Receiver;
use crossbeam::select;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Per-consumer results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerStats {
    pub index: usize,
    /// Items received, in arrival order
    pub received: Vec<WorkItem>,
    /// Whether this consumer's stop request claimed the inbox
    pub requested_stop: bool,
    pub exit: ExitReason,
}

impl ConsumerStats {
    pub fn consumed(&self) -> u64 {
        self.received.len() as u64
    }
}

pub struct Consumer {
    index: usize,
    max: u64,
    work: Receiver<WorkItem>,
    ctx: WorkerContext,
}

impl Consumer {
    pub fn new(index: usize, max: u64, work: Receiver<WorkItem>, ctx: WorkerContext) -> Self {
        Self {
            index,
            max,
            work,
            ctx,
        }
    }

    /// Run until the stop signal fires or every producer is gone
    pub fn run(self) -> ConsumerStats {
        let Consumer {
            index,
            max,
            work,
            ctx,
        } = self;

        let id = WorkerId::Consumer(index);
        let stop = ctx.signal.listener();
        let terminal = terminal_value(max);
        let mut received = Vec::new();
        let mut requested_stop = false;

        let exit = loop {
            if ctx.signal.is_fired() {
                break ExitReason::Stopped;
            }

            let handoff = select! {
                recv(work) -> msg => match msg {
                    Ok(item) => Handoff::Done(item),
                    Err(_) => Handoff::Disconnected,
                },
                recv(stop) -> _ => Handoff::Stopped,
            };

            let item = match handoff {
                Handoff::Done(item) => item,
                Handoff::Stopped => break ExitReason::Stopped,
                Handoff::Disconnected => break ExitReason::Disconnected,
            };

            if item.value == terminal && ctx.requester.request(id.label()) {
                requested_stop = true;
            }

            info!("{} received {}", id, item.value);
            received.push(item);
        };

        debug!("{} exiting ({}) after {} item(s)", id, exit, received.len());

        ConsumerStats {
            index,
            received,
            requested_stop,
            exit,
        }
    }
}
