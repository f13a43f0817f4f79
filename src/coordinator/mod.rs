//! Coordinator module
//!
//! Centralized stop handling: workers file stop requests into a single-slot
//! inbox, the moderator accepts the first one and fires the one-shot signal
//! every worker polls.

pub mod inbox;
pub mod moderator;
pub mod signal;

pub use inbox::{stop_inbox, StopInbox, StopRequest, StopRequester};
pub use moderator::Moderator;
pub use signal::StopSignal;

use thiserror::Error;

/// Errors surfaced by the moderator
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordinatorError {
    /// Every requester was dropped without asking to stop
    #[error("stop inbox closed before any stop request arrived")]
    InboxClosed,

    /// The stop signal had already been fired by someone other than the moderator
    #[error("stop signal already fired")]
    AlreadyFired,
}
