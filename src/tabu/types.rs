//! Core trait for Tabu Search problems.

use std::fmt::Display;
use std::hash::Hash;

use rand::Rng;

use crate::eval;
use crate::problem::ProblemInstance;
use crate::solution::{random_initial_solution, random_neighbor, Solution};

use super::config::{auto_neighbor_count, MIN_AUTO_NEIGHBORS};

/// Defines a makespan-minimization problem for Tabu Search.
///
/// Solutions are compared, hashed and ordered by value; the ordering is
/// the deterministic tie-break among equally good neighbors.
pub trait TabuProblem: Send + Sync {
    /// The solution type.
    type Solution: Clone + Eq + Hash + Ord + Display + Send + Sync;

    /// Creates the initial solution. Must be valid.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Evaluates a solution (lower is better).
    fn makespan(&self, solution: &Self::Solution) -> u64;

    /// Produces one random neighbor of a valid solution. Must be valid.
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Self::Solution;

    /// Neighbors per iteration when the count is left to the search.
    fn auto_neighbor_count(&self, _iterations: usize) -> usize {
        MIN_AUTO_NEIGHBORS
    }

    /// Human-readable evaluated form of a solution, used in the trace.
    fn render(&self, solution: &Self::Solution) -> String {
        solution.to_string()
    }

    /// Description of the instance for the trace header.
    fn describe(&self) -> Option<String> {
        None
    }
}

impl TabuProblem for ProblemInstance {
    type Solution = Solution;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Solution {
        random_initial_solution(self, rng)
    }

    fn makespan(&self, solution: &Solution) -> u64 {
        eval::makespan(self, solution)
    }

    fn neighbor<R: Rng>(&self, solution: &Solution, rng: &mut R) -> Solution {
        random_neighbor(self, solution, rng)
    }

    fn auto_neighbor_count(&self, iterations: usize) -> usize {
        auto_neighbor_count(
            self.number_of_operations(),
            self.number_of_machines(),
            iterations,
        )
    }

    fn render(&self, solution: &Solution) -> String {
        format!("{solution}\n{}", eval::schedule(self, solution))
    }

    fn describe(&self) -> Option<String> {
        Some(self.to_string())
    }
}
