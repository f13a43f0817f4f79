//! Scripted value replay
//!
//! Replays a fixed list of values in order. Once the list is exhausted the last
//! value repeats forever, so a script ending in a non-sentinel value keeps a
//! producer busy until it is stopped from outside.

use crate::distribution::Distribution;

/// Deterministic value source
#[derive(Debug, Clone)]
pub struct ScriptedDistribution {
    values: Vec<u64>,
    position: usize,
}

impl ScriptedDistribution {
    /// Create a scripted distribution from a list of values
    ///
    /// An empty script behaves like a script of `[0]`.
    pub fn new(values: Vec<u64>) -> Self {
        let values = if values.is_empty() { vec![0] } else { values };
        Self {
            values,
            position: 0,
        }
    }
}

impl Distribution for ScriptedDistribution {
    fn next_value(&mut self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }

        let value = self.values[self.position];
        if self.position + 1 < self.values.len() {
            self.position += 1;
        }

        value % max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_replays_in_order() {
        let mut dist = ScriptedDistribution::new(vec![1, 2, 3]);

        assert_eq!(dist.next_value(4), 1);
        assert_eq!(dist.next_value(4), 2);
        assert_eq!(dist.next_value(4), 3);
    }

    #[test]
    fn test_scripted_repeats_last_value() {
        let mut dist = ScriptedDistribution::new(vec![1, 2]);

        assert_eq!(dist.next_value(4), 1);
        assert_eq!(dist.next_value(4), 2);
        assert_eq!(dist.next_value(4), 2);
        assert_eq!(dist.next_value(4), 2);
    }

    #[test]
    fn test_scripted_reduces_modulo_max() {
        let mut dist = ScriptedDistribution::new(vec![9]);
        assert_eq!(dist.next_value(4), 1);
    }

    #[test]
    fn test_scripted_empty_script() {
        let mut dist = ScriptedDistribution::new(vec![]);
        assert_eq!(dist.next_value(4), 0);
    }
}
