//! One-shot stop signal
//!
//! `StopSignal` is the broadcast half of shutdown. It transitions once from
//! "not fired" to "fired" and every clone observes the transition. Workers can
//! either poll it (`is_fired`) or race a channel operation against it by
//! selecting on its `listener()`, which disconnects when the signal fires.

use crossbeam::channel::{self, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Payload type for the listener channel. Nothing is ever sent on it; only the
/// disconnect is observed.
#[derive(Debug)]
pub enum Never {}

struct SignalInner {
    fired: AtomicBool,
    trigger: Mutex<Option<Sender<Never>>>,
    listener: Receiver<Never>,
}

/// Cloneable handle to a one-shot stop signal
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<SignalInner>,
}

impl StopSignal {
    /// Create a signal in the "not fired" state
    pub fn new() -> Self {
        let (trigger, listener) = channel::bounded(0);
        Self {
            inner: Arc::new(SignalInner {
                fired: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                listener,
            }),
        }
    }

    /// Fire the signal
    ///
    /// Returns `true` only for the call that performed the transition. Every
    /// later call is a no-op returning `false`.
    pub fn fire(&self) -> bool {
        if self
            .inner
            .fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        // Dropping the only sender disconnects every listener at once
        let mut trigger = self
            .inner
            .trigger
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        trigger.take();
        true
    }

    /// Non-blocking poll
    #[inline]
    pub fn is_fired(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }

    /// Receiver that becomes ready (disconnected) once the signal fires
    ///
    /// Intended for use as an arm of `crossbeam::select!`.
    pub fn listener(&self) -> Receiver<Never> {
        self.inner.listener.clone()
    }

    /// Block until the signal fires
    pub fn wait(&self) {
        // recv only returns once the trigger is dropped
        let _ = self.inner.listener.recv();
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSignal")
            .field("fired", &self.is_fired())
            .finish()
    }
}
