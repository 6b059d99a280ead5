//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Generate an initial solution
//! 2. At each iteration:
//!    a. Stop if the wall-clock budget is spent
//!    b. Sample neighbors of the current solution, drop tabu ones
//!    c. Evaluate the survivors and take all with the lowest makespan
//!    d. Update the all-time best or the stuck counter
//!    e. Move to the lexicographically last best neighbor, make it tabu,
//!       remember all best neighbors on the rollback stack
//!    f. After `reset_threshold` non-improving iterations, backtrack to
//!       the most recent rollback entry and lift its tabu status
//! 3. Terminate after the iteration budget or on timeout
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;

use super::config::TabuConfig;
use super::memory::{RollbackStack, TabuList};
use super::trace::{Backtrack, IterationRecord, SearchSummary, SearchTrace};
use super::types::TabuProblem;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The iteration budget was spent.
    #[default]
    IterationLimit,
    /// The wall-clock budget was spent.
    Timeout,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::IterationLimit => f.write_str("iteration limit"),
            Termination::Timeout => f.write_str("timeout"),
        }
    }
}

/// Result of a Tabu Search run.
#[derive(Debug, Clone)]
pub struct TabuResult<S> {
    /// Best makespan found.
    pub best_makespan: u64,
    /// All distinct solutions found at the best makespan, sorted. Solutions
    /// tying the best accumulate; an improvement replaces them.
    pub best_solutions: Vec<S>,
    /// Iterations that ran to completion.
    pub iterations: usize,
    /// Why the run stopped.
    pub termination: Termination,
    /// All-time best makespan after each iteration.
    pub makespan_history: Vec<u64>,
    /// Unique explored solutions per makespan.
    pub explored: BTreeMap<u64, usize>,
    /// Candidates dropped by the tabu filter.
    pub tabu_blocked: usize,
    /// Iterations in which every candidate was tabu.
    pub tabu_relaxations: usize,
    /// Audit trace.
    pub trace: SearchTrace,
}

/// Tabu Search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Executes Tabu Search on the given problem.
    ///
    /// # Errors
    ///
    /// Returns the [`TabuConfig::validate`] error for an invalid
    /// configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_fjsp::tabu::{NeighborCount, TabuConfig, TabuRunner};
    /// use u_fjsp::ProblemInstance;
    ///
    /// let problem = ProblemInstance::new(1, vec![vec![vec![4]], vec![vec![6]]]).unwrap();
    /// let config = TabuConfig::default()
    ///     .with_max_iterations(20)
    ///     .with_neighbors(NeighborCount::Fixed(5))
    ///     .with_seed(42);
    ///
    /// let result = TabuRunner::run(&problem, &config).unwrap();
    /// assert_eq!(result.best_makespan, 10);
    /// ```
    #[tracing::instrument(
        level = "debug",
        name = "Tabu Search",
        skip_all,
        fields(max_iterations = config.max_iterations, tabu_size = config.tabu_size)
    )]
    pub fn run<P: TabuProblem>(problem: &P, config: &TabuConfig) -> Result<TabuResult<P::Solution>> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };
        let number_of_neighbors = config
            .resolve_neighbors(|iterations| problem.auto_neighbor_count(iterations))
            .max(1);
        let started = Instant::now();

        let initial = problem.initial_solution(&mut rng);
        let mut current = initial.clone();
        let mut best_makespan: Option<u64> = None;
        let mut best_solutions: BTreeSet<P::Solution> = BTreeSet::new();

        let mut tabu: TabuList<P::Solution> = TabuList::new(config.tabu_size);
        let mut rollback = RollbackStack::new();
        let mut explored: BTreeMap<u64, HashSet<P::Solution>> = BTreeMap::new();
        let mut stuck_counter = 0usize;

        let mut makespan_history = Vec::with_capacity(config.max_iterations);
        let mut records = Vec::new();
        let mut tabu_blocked = 0usize;
        let mut tabu_relaxations = 0usize;
        let mut termination = Termination::IterationLimit;

        for iteration in 0..config.max_iterations {
            if let Some(limit) = config.timeout {
                if started.elapsed() >= limit {
                    termination = Termination::Timeout;
                    break;
                }
            }

            let current_makespan = config.record_trace.then(|| problem.makespan(&current));

            // Neighborhood sampling and tabu filter
            let candidates: Vec<P::Solution> = (0..number_of_neighbors)
                .map(|_| problem.neighbor(&current, &mut rng))
                .collect();
            let admissible: Vec<P::Solution> = candidates
                .iter()
                .filter(|c| !tabu.contains(*c))
                .cloned()
                .collect();
            let blocked = candidates.len() - admissible.len();
            tabu_blocked += blocked;

            let relaxed = admissible.is_empty();
            let pool = if relaxed {
                tabu_relaxations += 1;
                tracing::debug!(iteration, "all candidates tabu, relaxing filter");
                candidates
            } else {
                admissible
            };

            // Evaluation
            let scored = evaluate_all(problem, pool, config.parallel);
            let Some(iteration_best) = scored.iter().map(|(m, _)| *m).min() else {
                break;
            };
            for (m, s) in &scored {
                explored.entry(*m).or_default().insert(s.clone());
            }
            let best_neighbors: Vec<P::Solution> = scored
                .into_iter()
                .filter(|(m, _)| *m == iteration_best)
                .map(|(_, s)| s)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            // Improvement check
            let previous_best = best_makespan;
            match best_makespan {
                Some(best) if iteration_best >= best => {
                    stuck_counter += 1;
                    if iteration_best == best {
                        best_solutions.extend(best_neighbors.iter().cloned());
                    }
                }
                _ => {
                    best_makespan = Some(iteration_best);
                    best_solutions = best_neighbors.iter().cloned().collect();
                    stuck_counter = 0;
                }
            }
            let stuck_after_check = stuck_counter;

            // Move
            let Some(next) = best_neighbors.last().cloned() else {
                break;
            };
            tabu.push(next.clone());
            let previous = std::mem::replace(&mut current, next);
            for s in best_neighbors.iter().rev() {
                rollback.push(s.clone());
            }

            // Backtracking
            let mut backtrack = None;
            if stuck_counter >= config.reset_threshold {
                stuck_counter = 0;
                let (target, from_rollback) = match rollback.pop() {
                    Some(s) => (s, true),
                    None => (initial.clone(), false),
                };
                let removed_from_tabu = tabu.remove(&target);
                let target_makespan = problem.makespan(&target);
                tracing::debug!(
                    iteration,
                    makespan = target_makespan,
                    from_rollback,
                    "stagnation, backtracking"
                );
                if config.record_trace {
                    backtrack = Some(Backtrack {
                        target: target.to_string(),
                        makespan: target_makespan,
                        from_rollback,
                        removed_from_tabu,
                    });
                }
                current = target;
            }

            makespan_history.push(best_makespan.unwrap_or(iteration_best));
            tracing::debug!(
                iteration,
                iteration_best,
                best = best_makespan.unwrap_or(iteration_best),
                stuck = stuck_after_check,
                "iteration complete"
            );

            if let Some(current_makespan) = current_makespan {
                records.push(IterationRecord {
                    iteration,
                    current: previous.to_string(),
                    current_makespan,
                    best_makespan: previous_best,
                    iteration_best_makespan: iteration_best,
                    candidates: number_of_neighbors - blocked,
                    tabu_blocked: blocked,
                    relaxed,
                    stuck_counter: stuck_after_check,
                    backtrack,
                });
            }
        }

        // No completed iteration: report the initial solution.
        let best_makespan = match best_makespan {
            Some(m) => m,
            None => {
                best_solutions.insert(initial.clone());
                problem.makespan(&initial)
            }
        };
        let best_solutions: Vec<P::Solution> = best_solutions.into_iter().collect();
        let explored: BTreeMap<u64, usize> =
            explored.into_iter().map(|(m, set)| (m, set.len())).collect();
        let iterations = makespan_history.len();

        tracing::info!(
            best_makespan,
            iterations,
            solutions = best_solutions.len(),
            %termination,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "tabu search finished"
        );

        let summary = SearchSummary {
            instance: problem.describe(),
            completed_iterations: iterations,
            max_iterations: config.max_iterations,
            tabu_size: config.tabu_size,
            reset_threshold: config.reset_threshold,
            neighbors_requested: config.neighbors,
            neighbors_used: number_of_neighbors,
            timeout: config.timeout,
            explored: explored.clone(),
            best_makespan,
            best_solutions: best_solutions.iter().map(|s| problem.render(s)).collect(),
            tabu_blocked,
            tabu_relaxations,
            termination,
        };

        Ok(TabuResult {
            best_makespan,
            best_solutions,
            iterations,
            termination,
            makespan_history,
            explored,
            tabu_blocked,
            tabu_relaxations,
            trace: SearchTrace {
                summary,
                iterations: records,
            },
        })
    }
}

#[cfg(feature = "parallel")]
fn evaluate_all<P: TabuProblem>(
    problem: &P,
    pool: Vec<P::Solution>,
    parallel: bool,
) -> Vec<(u64, P::Solution)> {
    use rayon::prelude::*;

    if parallel {
        pool.into_par_iter()
            .map(|s| (problem.makespan(&s), s))
            .collect()
    } else {
        pool.into_iter().map(|s| (problem.makespan(&s), s)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all<P: TabuProblem>(
    problem: &P,
    pool: Vec<P::Solution>,
    _parallel: bool,
) -> Vec<(u64, P::Solution)> {
    pool.into_iter().map(|s| (problem.makespan(&s), s)).collect()
}
