//! Value sources for producers
//!
//! Producers draw work item values from a `Distribution`. Each producer owns its
//! own source so no state is shared between producer threads.
//!
//! # Sources
//!
//! - **Uniform**: Equal probability for every value in `[0, max)` (default)
//! - **Scripted**: Replays a fixed list of values, used to force deterministic runs
//!
//! # Example
//!
//! ```
//! use stopline::distribution::{Distribution, uniform::UniformDistribution};
//!
//! let mut dist = UniformDistribution::with_seed(7);
//! let value = dist.next_value(4); // Value in range [0, 4)
//! assert!(value < 4);
//! ```

use std::sync::Arc;

/// Distribution trait for work item values
///
/// # Thread Safety
///
/// Distributions must be `Send` so they can be moved into the producer thread
/// that owns them.
pub trait Distribution: Send {
    /// Generate the next value within range
    ///
    /// Returns a value in the range `[0, max)`. A `max` of zero yields 0.
    fn next_value(&mut self, max: u64) -> u64;
}

/// Builds one value source per producer, keyed by producer index
pub type DistributionFactory = Arc<dyn Fn(usize) -> Box<dyn Distribution> + Send + Sync>;

/// Factory handing each producer a uniform source
///
/// With a seed, producer `i` is seeded with `seed + i` so runs are reproducible
/// while producers still draw different sequences.
pub fn uniform_factory(seed: Option<u64>) -> DistributionFactory {
    Arc::new(move |index: usize| -> Box<dyn Distribution> {
        match seed {
            Some(seed) => Box::new(uniform::UniformDistribution::with_seed(
                seed.wrapping_add(index as u64),
            )),
            None => Box::new(uniform::UniformDistribution::new()),
        }
    })
}

/// Factory handing every producer the same scripted sequence
pub fn scripted_factory(values: Vec<u64>) -> DistributionFactory {
    Arc::new(move |_: usize| -> Box<dyn Distribution> {
        Box::new(scripted::ScriptedDistribution::new(values.clone()))
    })
}

pub mod scripted;
pub mod uniform;
