//! Flexible Job-Shop Scheduling (FJSP) via Tabu Search.
//!
//! Each job is an ordered chain of operations; each operation may run on
//! one of several admissible machines with machine-specific durations.
//! A solution is a dispatch order of `(job, op, machine)` triples that
//! respects every job's operation order.
//!
//! - **Problem**: immutable instance and its text loader.
//! - **Solution**: value type with a canonical key, random construction,
//!   validation, and a precedence-preserving relocation neighborhood.
//! - **Evaluation**: dispatch simulation yielding the makespan or a timed
//!   schedule.
//! - **Tabu Search**: bounded tabu list, stagnation backtracking, and an
//!   audit trace.
//!
//! # Example
//!
//! ```
//! use u_fjsp::tabu::{NeighborCount, TabuConfig, TabuRunner};
//! use u_fjsp::ProblemInstance;
//!
//! let problem: ProblemInstance = "\
//! 2 2
//! 1
//! 5 1
//! 1
//! 1 5
//! ".parse().unwrap();
//!
//! let config = TabuConfig::default()
//!     .with_max_iterations(200)
//!     .with_tabu_size(3)
//!     .with_reset_threshold(10)
//!     .with_neighbors(NeighborCount::Fixed(20))
//!     .with_seed(7);
//! let result = TabuRunner::run(&problem, &config).unwrap();
//! assert_eq!(result.best_makespan, 1);
//! ```

pub mod error;
pub mod eval;
pub mod problem;
pub mod solution;
pub mod tabu;

pub use error::{FjspError, Result};
pub use eval::{makespan, schedule, Schedule, ScheduledOperation};
pub use problem::{parse_instance, InstanceRecord, ProblemInstance};
pub use solution::{is_valid, random_initial_solution, random_neighbor, validate, Assignment, Solution};
