//! Tabu Search (TS) over flexible job-shop dispatch orders.
//!
//! A single-solution trajectory metaheuristic that keeps recently visited
//! solutions in a bounded tabu list, preventing cycling, and backtracks to
//! earlier good solutions when the search stagnates.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod memory;
mod runner;
mod trace;
mod types;

pub use config::{
    auto_neighbor_count, NeighborCount, TabuConfig, MAX_AUTO_NEIGHBORS, MIN_AUTO_NEIGHBORS,
};
pub use memory::{RollbackStack, TabuList};
pub use runner::{TabuResult, TabuRunner, Termination};
pub use trace::{Backtrack, IterationRecord, SearchSummary, SearchTrace};
pub use types::TabuProblem;
