//! Stop request mailbox
//!
//! A single-slot mailbox in which the first claim wins. Requesters never block:
//! a claim either takes the empty slot or is dropped on the spot.

use super::CoordinatorError;
use crossbeam::channel::{self, Receiver, Sender};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// A labeled request to stop the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRequest {
    /// Identity of the worker that asked to stop
    pub label: String,
}

impl StopRequest {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl fmt::Display for StopRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

struct Slot {
    claimed: AtomicBool,
    accepted: OnceLock<StopRequest>,
    rejected: AtomicUsize,
}

/// Create a connected requester/inbox pair
pub fn stop_inbox() -> (StopRequester, StopInbox) {
    let slot = Arc::new(Slot {
        claimed: AtomicBool::new(false),
        accepted: OnceLock::new(),
        rejected: AtomicUsize::new(0),
    });
    let (tx, rx) = channel::bounded(1);

    (
        StopRequester {
            slot: slot.clone(),
            tx,
        },
        StopInbox { slot, rx },
    )
}

/// Sending side, cloned into every worker
#[derive(Clone)]
pub struct StopRequester {
    slot: Arc<Slot>,
    tx: Sender<StopRequest>,
}

impl StopRequester {
    /// Best-effort, non-blocking stop request
    ///
    /// Returns `true` if this request claimed the slot. A `false` return means
    /// another request already won; callers are free to ignore it.
    pub fn request(&self, label: impl Into<String>) -> bool {
        let label = label.into();

        if self
            .slot
            .claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.slot.rejected.fetch_add(1, Ordering::Relaxed);
            debug!("Stop request from {} dropped: slot already claimed", label);
            return false;
        }

        let request = StopRequest::new(label);
        let _ = self.slot.accepted.set(request.clone());

        // Only the winning claim reaches the channel, so the single slot is free
        let _ = self.tx.try_send(request);
        true
    }
}

/// Receiving side, owned by the moderator
pub struct StopInbox {
    slot: Arc<Slot>,
    rx: Receiver<StopRequest>,
}

impl StopInbox {
    /// Block until the winning request arrives
    ///
    /// Fails only when every requester was dropped without asking to stop.
    pub fn recv(&self) -> Result<StopRequest, CoordinatorError> {
        self.rx.recv().map_err(|_| CoordinatorError::InboxClosed)
    }

    /// The request that won the slot, if any
    pub fn accepted(&self) -> Option<StopRequest> {
        self.slot.accepted.get().cloned()
    }

    /// Number of requests dropped because the slot was already claimed
    pub fn rejected(&self) -> usize {
        self.slot.rejected.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_first_request_wins() {
        let (requester, inbox) = stop_inbox();

        assert!(requester.request("producer-0"));
        assert!(!requester.request("consumer-1"));

        assert_eq!(inbox.recv().unwrap().label, "producer-0");
        assert_eq!(inbox.accepted(), Some(StopRequest::new("producer-0")));
        assert_eq!(inbox.rejected(), 1);
    }

    #[test]
    fn test_no_request_after_drain() {
        let (requester, inbox) = stop_inbox();

        assert!(requester.request("producer-0"));
        inbox.recv().unwrap();

        // Slot stays claimed even though the channel is empty again
        assert!(!requester.request("producer-1"));
        assert!(inbox.rx.try_recv().is_err());
    }

    #[test]
    fn test_concurrent_requests_single_winner() {
        let (requester, inbox) = stop_inbox();

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let requester = requester.clone();
                thread::spawn(move || requester.request(format!("worker-{}", i)))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(inbox.rejected(), 31);

        let received = inbox.recv().unwrap();
        assert_eq!(Some(received), inbox.accepted());
    }

    #[test]
    fn test_closed_inbox() {
        let (requester, inbox) = stop_inbox();
        drop(requester);

        assert!(matches!(inbox.recv(), Err(CoordinatorError::InboxClosed)));
        assert!(inbox.accepted().is_none());
    }

    #[test]
    fn test_stop_request_display() {
        assert_eq!(StopRequest::new("consumer-3").to_string(), "consumer-3");
    }
}
