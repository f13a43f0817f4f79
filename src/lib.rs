//! Stopline - bounded work distribution with a centralized stop signal
//!
//! Producers hand values to consumers over a rendezvous channel. Any worker
//! that hits its sentinel value files a stop request; a moderator honors the
//! first one and fires a one-shot stop signal that every worker polls.
//!
//! # Architecture
//!
//! - **Coordinator**: stop signal, first-wins stop inbox, moderator
//! - **Workers**: producers, consumers and an owned sequence generator
//! - **Pipeline**: spawns and joins everything, builds the run report
//! - **Throttle**: capacity-1 admission gate
//! - **Distributions**: uniform and scripted value sources

pub mod config;
pub mod coordinator;
pub mod distribution;
pub mod output;
pub mod pipeline;
pub mod stats;
pub mod throttle;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::Pipeline;

/// Result type used throughout Stopline
pub type Result<T> = anyhow::Result<T>;
