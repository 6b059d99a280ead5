//! Audit trace of a search run, rendered as markdown.
//!
//! The trace has no influence on the search; it only records what each
//! iteration saw and decided.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use super::config::NeighborCount;
use super::runner::Termination;

/// A backtracking step taken at the end of an iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backtrack {
    /// The solution the search jumped to.
    pub target: String,
    /// Its makespan.
    pub makespan: u64,
    /// `false` when the rollback stack was empty and the initial solution
    /// was used.
    pub from_rollback: bool,
    /// Whether the target was removed from the tabu list.
    pub removed_from_tabu: bool,
}

/// What a single iteration saw and decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationRecord {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Current solution at the start of the iteration.
    pub current: String,
    /// Its makespan.
    pub current_makespan: u64,
    /// All-time best before this iteration.
    pub best_makespan: Option<u64>,
    /// Best makespan among this iteration's candidates.
    pub iteration_best_makespan: u64,
    /// Candidates left after the tabu filter.
    pub candidates: usize,
    /// Candidates dropped by the tabu filter.
    pub tabu_blocked: usize,
    /// Whether every candidate was tabu and the filter was relaxed.
    pub relaxed: bool,
    /// Stuck counter after the improvement check.
    pub stuck_counter: usize,
    /// Backtracking step, if one happened.
    pub backtrack: Option<Backtrack>,
}

/// Run-level figures for the trace header.
#[derive(Debug, Clone, Default)]
pub struct SearchSummary {
    /// Instance description, if the problem provides one.
    pub instance: Option<String>,
    /// Iterations that ran to completion.
    pub completed_iterations: usize,
    /// Configured iteration budget.
    pub max_iterations: usize,
    /// Configured tabu list capacity.
    pub tabu_size: usize,
    /// Configured stagnation threshold.
    pub reset_threshold: usize,
    /// Requested neighbor count.
    pub neighbors_requested: NeighborCount,
    /// Neighbor count actually used.
    pub neighbors_used: usize,
    /// Configured timeout.
    pub timeout: Option<Duration>,
    /// Unique explored solutions per makespan.
    pub explored: BTreeMap<u64, usize>,
    /// Best makespan found.
    pub best_makespan: u64,
    /// Evaluated renderings of the best solutions.
    pub best_solutions: Vec<String>,
    /// Candidates dropped by the tabu filter over the run.
    pub tabu_blocked: usize,
    /// Iterations where the tabu filter had to be relaxed.
    pub tabu_relaxations: usize,
    /// Why the run stopped.
    pub termination: Termination,
}

/// Summary plus per-iteration records.
#[derive(Debug, Clone, Default)]
pub struct SearchTrace {
    /// Run-level summary.
    pub summary: SearchSummary,
    /// One record per completed iteration (empty when tracing is off).
    pub iterations: Vec<IterationRecord>,
}

fn fmt_opt(v: Option<u64>) -> String {
    v.map_or_else(|| "none".to_string(), |v| v.to_string())
}

impl fmt::Display for SearchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Tabu search summary")?;
        if let Some(instance) = &self.instance {
            writeln!(f, "- Instance:\n\n```\n{}```\n", instance)?;
        }
        writeln!(
            f,
            "- Completed {} out of {} iterations ({})",
            self.completed_iterations, self.max_iterations, self.termination
        )?;
        writeln!(f, "- tabu_size was {}", self.tabu_size)?;
        writeln!(f, "- reset_threshold was {}", self.reset_threshold)?;
        let requested = match self.neighbors_requested {
            NeighborCount::Auto => "auto".to_string(),
            NeighborCount::Fixed(n) => n.to_string(),
        };
        writeln!(
            f,
            "- number_of_neighbors was {requested} -> {}",
            self.neighbors_used
        )?;
        match self.timeout {
            Some(t) => writeln!(f, "- timeout was {:.3}s", t.as_secs_f64())?,
            None => writeln!(f, "- timeout was disabled")?,
        }

        let total: usize = self.explored.values().sum();
        writeln!(
            f,
            "- Explored {total} unique solutions, distribution is as follows:"
        )?;
        for (makespan, count) in &self.explored {
            let pct = if total == 0 {
                0.0
            } else {
                *count as f64 / total as f64 * 100.0
            };
            writeln!(
                f,
                "  + Makespan of {makespan}: {count} unique solutions ({pct:.2}%)"
            )?;
        }
        writeln!(f, "- Best makespan found was {}", self.best_makespan)?;
        writeln!(
            f,
            "- Tabu list prevented {} solutions from being revisited (before uniqueness)",
            self.tabu_blocked
        )?;
        if self.tabu_relaxations > 0 {
            writeln!(
                f,
                "- Tabu filter relaxed in {} iterations",
                self.tabu_relaxations
            )?;
        }
        writeln!(f, "- Best solutions:")?;
        for s in &self.best_solutions {
            writeln!(f, "\n```\n{}\n```", s.trim_end())?;
        }
        Ok(())
    }
}

impl fmt::Display for IterationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Iteration {}", self.iteration)?;
        writeln!(
            f,
            "- Current solution: {} with makespan {}",
            self.current, self.current_makespan
        )?;
        writeln!(f, "- All-time best makespan: {}", fmt_opt(self.best_makespan))?;
        writeln!(
            f,
            "- This iteration's best makespan: {} ({} candidates, {} tabu)",
            self.iteration_best_makespan, self.candidates, self.tabu_blocked
        )?;
        if self.relaxed {
            writeln!(f, "- All candidates were tabu, filter relaxed")?;
        }
        if self.stuck_counter > 0 {
            writeln!(f, "- Stuck counter: {}", self.stuck_counter)?;
        }
        if let Some(b) = &self.backtrack {
            let source = if b.from_rollback {
                "rollback stack"
            } else {
                "initial solution"
            };
            writeln!(
                f,
                "- !!! Stuck for too long, backtracking to {} ({source}) with makespan {}",
                b.target, b.makespan
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for SearchTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)?;
        writeln!(f, "\n# Tabu search details")?;
        for record in &self.iterations {
            writeln!(f, "{record}")?;
        }
        if self.summary.termination == Termination::Timeout {
            writeln!(f, "- !!! Timed out!")?;
        }
        Ok(())
    }
}
