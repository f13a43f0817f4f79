//! Moderator
//!
//! Owns the stop signal. Blocks on the stop inbox and, on the first request,
//! fires the signal exactly once. There is no timeout: while any requester is
//! alive and silent, the moderator waits.

use super::{CoordinatorError, StopInbox, StopRequest, StopSignal};
use log::{debug, info};

pub struct Moderator {
    inbox: StopInbox,
    signal: StopSignal,
}

impl Moderator {
    pub fn new(inbox: StopInbox, signal: StopSignal) -> Self {
        Self { inbox, signal }
    }

    /// Wait for the winning stop request and broadcast the stop
    pub fn run(self) -> Result<StopRequest, CoordinatorError> {
        debug!("Moderator waiting for a stop request");

        let request = self.inbox.recv()?;
        info!("Stop requested by {}", request.label);

        if !self.signal.fire() {
            return Err(CoordinatorError::AlreadyFired);
        }

        debug!(
            "Stop signal fired ({} later request(s) dropped so far)",
            self.inbox.rejected()
        );
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::stop_inbox;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_moderator_fires_on_request() {
        let (requester, inbox) = stop_inbox();
        let signal = StopSignal::new();
        let moderator = Moderator::new(inbox, signal.clone());

        let handle = thread::spawn(move || moderator.run());

        assert!(!signal.is_fired());
        requester.request("consumer-0");

        let request = handle.join().unwrap().unwrap();
        assert_eq!(request.label, "consumer-0");
        assert!(signal.is_fired());
    }

    #[test]
    fn test_moderator_simultaneous_requests() {
        for _ in 0..20 {
            let (requester, inbox) = stop_inbox();
            let signal = StopSignal::new();
            let moderator = Moderator::new(inbox, signal.clone());
            let moderator_handle = thread::spawn(move || moderator.run());

            let barrier = Arc::new(Barrier::new(8));
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let requester = requester.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        requester.request(format!("producer-{}", i))
                    })
                })
                .collect();

            let winners: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            assert_eq!(winners.iter().filter(|w| **w).count(), 1);

            let request = moderator_handle.join().unwrap().unwrap();
            let winner_index = winners.iter().position(|w| *w).unwrap();
            assert_eq!(request.label, format!("producer-{}", winner_index));

            // The moderator already performed the only transition
            assert!(!signal.fire());
        }
    }

    #[test]
    fn test_moderator_inbox_closed() {
        let (requester, inbox) = stop_inbox();
        let signal = StopSignal::new();
        drop(requester);

        let result = Moderator::new(inbox, signal.clone()).run();
        assert!(matches!(result, Err(CoordinatorError::InboxClosed)));
        assert!(!signal.is_fired());
    }

    #[test]
    fn test_moderator_signal_fired_elsewhere() {
        let (requester, inbox) = stop_inbox();
        let signal = StopSignal::new();
        signal.fire();
        requester.request("producer-0");

        let result = Moderator::new(inbox, signal).run();
        assert!(matches!(result, Err(CoordinatorError::AlreadyFired)));
    }
}
