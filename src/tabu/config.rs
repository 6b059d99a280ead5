//! Tabu Search configuration.

use std::time::Duration;

use crate::error::{FjspError, Result};

/// Lower clamp for the automatic neighbor count.
pub const MIN_AUTO_NEIGHBORS: usize = 50;

/// Upper clamp for the automatic neighbor count.
pub const MAX_AUTO_NEIGHBORS: usize = 500;

/// How many neighbors to sample per iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeighborCount {
    /// Derived from instance size, see [`auto_neighbor_count`].
    #[default]
    Auto,
    /// Exactly this many per iteration.
    Fixed(usize),
}

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use u_fjsp::tabu::{NeighborCount, TabuConfig};
///
/// let config = TabuConfig::default()
///     .with_max_iterations(1000)
///     .with_tabu_size(20)
///     .with_reset_threshold(30)
///     .with_neighbors(NeighborCount::Fixed(100))
///     .with_timeout_secs(5.0);
/// assert_eq!(config.max_iterations, 1000);
/// assert_eq!(config.tabu_size, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TabuConfig {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Capacity of the tabu list; the oldest entry is evicted beyond it.
    pub tabu_size: usize,
    /// Iterations without improvement before backtracking.
    pub reset_threshold: usize,
    /// Neighbors sampled per iteration.
    pub neighbors: NeighborCount,
    /// Wall-clock budget, sampled at the start of each iteration.
    /// `None` runs until the iteration budget is spent.
    pub timeout: Option<Duration>,
    /// Random seed (None for random).
    pub seed: Option<u64>,
    /// Evaluate neighbors with rayon (needs the `parallel` feature).
    pub parallel: bool,
    /// Whether to keep a per-iteration audit trace.
    pub record_trace: bool,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tabu_size: 7,
            reset_threshold: 50,
            neighbors: NeighborCount::Auto,
            timeout: Some(Duration::from_secs(15)),
            seed: None,
            parallel: false,
            record_trace: true,
        }
    }
}

impl TabuConfig {
    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the tabu list capacity.
    pub fn with_tabu_size(mut self, size: usize) -> Self {
        self.tabu_size = size;
        self
    }

    /// Sets the number of non-improving iterations before backtracking.
    pub fn with_reset_threshold(mut self, n: usize) -> Self {
        self.reset_threshold = n;
        self
    }

    /// Sets the per-iteration neighbor count.
    pub fn with_neighbors(mut self, neighbors: NeighborCount) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the wall-clock budget in seconds; negative or non-finite
    /// values disable the timeout.
    pub fn with_timeout_secs(mut self, secs: f64) -> Self {
        self.timeout = Duration::try_from_secs_f64(secs).ok();
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel neighbor evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables or disables the audit trace.
    pub fn with_trace(mut self, record: bool) -> Self {
        self.record_trace = record;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.reset_threshold == 0 {
            return Err(FjspError::InvalidConfig(
                "reset_threshold must be at least 1".into(),
            ));
        }
        if self.neighbors == NeighborCount::Fixed(0) {
            return Err(FjspError::InvalidConfig(
                "neighbor count must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Neighbor count for one run; `auto` maps the iteration budget to a
    /// count when [`NeighborCount::Auto`] is configured.
    pub fn resolve_neighbors(&self, auto: impl FnOnce(usize) -> usize) -> usize {
        match self.neighbors {
            NeighborCount::Fixed(n) => n,
            NeighborCount::Auto => auto(self.max_iterations),
        }
    }
}

/// `operations! * machines^operations / iterations`, clamped to
/// [`MIN_AUTO_NEIGHBORS`]..=[`MAX_AUTO_NEIGHBORS`].
///
/// Computed in the log domain so large instances saturate at the upper
/// clamp instead of overflowing.
pub fn auto_neighbor_count(operations: usize, machines: usize, iterations: usize) -> usize {
    let ln_factorial: f64 = (2..=operations).map(|k| (k as f64).ln()).sum();
    let ln_assignments = operations as f64 * (machines.max(1) as f64).ln();
    let ln_count = ln_factorial + ln_assignments - (iterations.max(1) as f64).ln();

    if ln_count >= (MAX_AUTO_NEIGHBORS as f64).ln() {
        MAX_AUTO_NEIGHBORS
    } else {
        ((ln_count.exp() + 1e-6).floor() as usize).clamp(MIN_AUTO_NEIGHBORS, MAX_AUTO_NEIGHBORS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TabuConfig::default();
        assert_eq!(config.max_iterations, 500);
        assert_eq!(config.tabu_size, 7);
        assert_eq!(config.reset_threshold, 50);
        assert_eq!(config.neighbors, NeighborCount::Auto);
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert!(config.seed.is_none());
        assert!(!config.parallel);
        assert!(config.record_trace);
    }

    #[test]
    fn test_config_builder() {
        let config = TabuConfig::default()
            .with_max_iterations(1000)
            .with_tabu_size(10)
            .with_reset_threshold(5)
            .with_neighbors(NeighborCount::Fixed(64))
            .with_timeout(None)
            .with_seed(123)
            .with_parallel(true)
            .with_trace(false);

        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.tabu_size, 10);
        assert_eq!(config.reset_threshold, 5);
        assert_eq!(config.neighbors, NeighborCount::Fixed(64));
        assert!(config.timeout.is_none());
        assert_eq!(config.seed, Some(123));
        assert!(config.parallel);
        assert!(!config.record_trace);
    }

    #[test]
    fn test_negative_timeout_disables_it() {
        assert!(TabuConfig::default().with_timeout_secs(-1.0).timeout.is_none());
        assert_eq!(
            TabuConfig::default().with_timeout_secs(2.5).timeout,
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn test_validate_rejects_zero_reset_threshold() {
        assert!(TabuConfig::default().with_reset_threshold(0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_neighbors() {
        let config = TabuConfig::default().with_neighbors(NeighborCount::Fixed(0));
        assert!(matches!(config.validate(), Err(FjspError::InvalidConfig(_))));
    }

    #[test]
    fn test_auto_neighbor_count_clamps() {
        // 2! * 1^2 / 100 -> below the floor
        assert_eq!(auto_neighbor_count(2, 1, 100), MIN_AUTO_NEIGHBORS);
        // 5! * 2^5 / 20 = 192
        assert_eq!(auto_neighbor_count(5, 2, 20), 192);
        // huge instance saturates rather than overflowing
        assert_eq!(auto_neighbor_count(400, 30, 1000), MAX_AUTO_NEIGHBORS);
        assert_eq!(auto_neighbor_count(0, 1, 0), MIN_AUTO_NEIGHBORS);
    }

    #[test]
    fn test_resolve_neighbors() {
        let fixed = TabuConfig::default().with_neighbors(NeighborCount::Fixed(3));
        assert_eq!(fixed.resolve_neighbors(|_| 99), 3);
        let auto = TabuConfig::default().with_max_iterations(40);
        assert_eq!(auto.resolve_neighbors(|iters| iters * 2), 80);
    }
}
