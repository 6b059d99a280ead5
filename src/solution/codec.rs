//! Solution value type, construction, validation and text codec.
//!
//! A solution is a dispatch order of `(job, op, machine)` triples. Its
//! canonical key is the text form `job-op-machine job-op-machine ...`,
//! computed once at construction and used for equality, hashing and
//! ordering.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::{FjspError, Result};
use crate::problem::ProblemInstance;

/// One dispatched operation: operation `op` of `job` on `machine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    /// Job index.
    pub job: usize,
    /// Operation index within the job.
    pub op: usize,
    /// Machine index.
    pub machine: usize,
}

impl Assignment {
    /// Creates an assignment.
    pub const fn new(job: usize, op: usize, machine: usize) -> Self {
        Self { job, op, machine }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.job, self.op, self.machine)
    }
}

/// Immutable dispatch order with a precomputed canonical key.
///
/// Every transform yields a new value. Comparison is lexicographic on the
/// key, which gives the search a reproducible tie-break.
///
/// # Examples
///
/// ```
/// use u_fjsp::Solution;
///
/// let s: Solution = "0-0-1 1-0-0 0-1-0".parse().unwrap();
/// assert_eq!(s.len(), 3);
/// assert_eq!(s.to_string(), "0-0-1 1-0-0 0-1-0");
/// ```
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Solution {
    assignments: Vec<Assignment>,
    key: String,
}

impl Solution {
    /// Wraps a dispatch order. No validity check is performed; see
    /// [`validate`] and [`Solution::parse_for`].
    pub fn new(assignments: Vec<Assignment>) -> Self {
        let key = assignments
            .iter()
            .map(Assignment::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        Self { assignments, key }
    }

    /// Parses the text form and validates it against `problem`.
    pub fn parse_for(problem: &ProblemInstance, text: &str) -> Result<Self> {
        let solution: Self = text.parse()?;
        validate(problem, &solution)?;
        Ok(solution)
    }

    /// The dispatch order.
    #[inline]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Canonical key (the text form).
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of dispatched operations.
    #[inline]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the solution dispatches nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Solution {}

impl Hash for Solution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Solution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Solution {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Solution").field(&self.key).finish()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl FromStr for Solution {
    type Err = FjspError;

    fn from_str(s: &str) -> Result<Self> {
        let assignments = s
            .split_whitespace()
            .map(|token| {
                let mut parts = token.split('-').map(str::parse::<usize>);
                match (parts.next(), parts.next(), parts.next(), parts.next()) {
                    (Some(Ok(job)), Some(Ok(op)), Some(Ok(machine)), None) => {
                        Ok(Assignment::new(job, op, machine))
                    }
                    _ => Err(FjspError::InvalidSolution(format!(
                        "malformed token '{token}', expected job-op-machine"
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(assignments))
    }
}

impl TryFrom<String> for Solution {
    type Error = FjspError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Solution> for String {
    fn from(value: Solution) -> Self {
        value.key
    }
}

/// Builds a random precedence-valid solution.
///
/// Keeps a pool of jobs with remaining operations; repeatedly picks a job
/// uniformly from the pool, dispatches its next operation on a uniformly
/// random admissible machine, and advances or retires the job.
pub fn random_initial_solution<R: Rng>(problem: &ProblemInstance, rng: &mut R) -> Solution {
    // (job, next op)
    let mut pool: Vec<(usize, usize)> = (0..problem.number_of_jobs())
        .filter(|&j| problem.ops_per_job(j) > 0)
        .map(|j| (j, 0))
        .collect();
    let mut assignments = Vec::with_capacity(problem.number_of_operations());

    while !pool.is_empty() {
        let slot = rng.random_range(0..pool.len());
        let (job, op) = pool[slot];
        let machine = problem
            .admissible_machines(job, op)
            .choose(rng)
            .copied()
            .unwrap_or_default();
        assignments.push(Assignment::new(job, op, machine));

        if op + 1 == problem.ops_per_job(job) {
            pool.swap_remove(slot);
        } else {
            pool[slot].1 = op + 1;
        }
    }

    Solution::new(assignments)
}

/// Checks precedence, index ranges, machine admissibility and length.
///
/// # Errors
///
/// [`FjspError::InvalidSolution`] describing the first violation.
pub fn validate(problem: &ProblemInstance, solution: &Solution) -> Result<()> {
    let mut next_op = vec![0usize; problem.number_of_jobs()];

    for (pos, a) in solution.assignments().iter().enumerate() {
        let Some(expected) = next_op.get_mut(a.job) else {
            return Err(FjspError::InvalidSolution(format!(
                "position {pos}: unknown job {}",
                a.job
            )));
        };
        if a.op != *expected {
            return Err(FjspError::InvalidSolution(format!(
                "position {pos}: job {} op {} dispatched, expected op {}",
                a.job, a.op, expected
            )));
        }
        if a.op >= problem.ops_per_job(a.job) {
            return Err(FjspError::InvalidSolution(format!(
                "position {pos}: job {} has no op {}",
                a.job, a.op
            )));
        }
        if !problem.admissible_machines(a.job, a.op).contains(&a.machine) {
            return Err(FjspError::InvalidSolution(format!(
                "position {pos}: machine {} is not admissible for job {} op {}",
                a.machine, a.job, a.op
            )));
        }
        *expected += 1;
    }

    for (job, &done) in next_op.iter().enumerate() {
        if done != problem.ops_per_job(job) {
            return Err(FjspError::InvalidSolution(format!(
                "job {job} dispatched {done} of {} ops",
                problem.ops_per_job(job)
            )));
        }
    }
    Ok(())
}

/// Whether `solution` passes [`validate`].
pub fn is_valid(problem: &ProblemInstance, solution: &Solution) -> bool {
    validate(problem, solution).is_ok()
}
