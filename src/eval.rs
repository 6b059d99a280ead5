//! Dispatch-order makespan evaluation.
//!
//! Assignments are dispatched in sequence order: each operation starts as
//! soon as both its machine and its job predecessor are done. The
//! sequence therefore encodes both precedence and machine priority.

use std::fmt;

use crate::problem::ProblemInstance;
use crate::solution::Solution;

/// Per-machine state during one evaluation.
#[derive(Debug, Clone, Copy, Default)]
struct MachineTimeline {
    idle_start: Option<u64>,
    cumulative_finish: u64,
}

/// An operation with its simulated time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledOperation {
    /// Job index.
    pub job: usize,
    /// Operation index within the job.
    pub op: usize,
    /// Machine index.
    pub machine: usize,
    /// Start time.
    pub start: u64,
    /// Finish time.
    pub end: u64,
}

/// A fully evaluated solution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    /// Operations in dispatch order.
    pub operations: Vec<ScheduledOperation>,
    /// Makespan of the schedule.
    pub makespan: u64,
    /// Number of machines in the instance.
    pub number_of_machines: usize,
}

/// Runs the dispatch simulation, reporting each placed operation.
///
/// Lookups outside the instance read as zero, so invalid input gives
/// unspecified numbers without panicking. Finish times saturate at
/// `u64::MAX`.
fn simulate<F>(problem: &ProblemInstance, solution: &Solution, mut on_dispatch: F) -> u64
where
    F: FnMut(ScheduledOperation),
{
    let mut machines = vec![MachineTimeline::default(); problem.number_of_machines()];
    let mut job_ready = vec![0u64; problem.number_of_jobs()];

    for a in solution.assignments() {
        let duration = problem.duration(a.job, a.op, a.machine).unwrap_or(0);
        let ready = job_ready.get(a.job).copied().unwrap_or(0);
        let Some(timeline) = machines.get_mut(a.machine) else {
            continue;
        };

        let start = timeline.cumulative_finish.max(ready);
        let end = start.saturating_add(duration);
        timeline.idle_start.get_or_insert(start);
        timeline.cumulative_finish = end;
        if let Some(r) = job_ready.get_mut(a.job) {
            *r = end;
        }

        on_dispatch(ScheduledOperation {
            job: a.job,
            op: a.op,
            machine: a.machine,
            start,
            end,
        });
    }

    let latest_finish = machines
        .iter()
        .map(|m| m.cumulative_finish)
        .max()
        .unwrap_or(0);
    let earliest_start = machines
        .iter()
        .filter_map(|m| m.idle_start)
        .min()
        .unwrap_or(0);
    latest_finish - earliest_start
}

/// Makespan of `solution`: latest machine finish minus earliest machine
/// start.
///
/// `solution` must be valid for `problem` (see
/// [`validate`](crate::solution::validate)); the result is a pure function
/// of the solution.
///
/// # Examples
///
/// ```
/// use u_fjsp::{makespan, ProblemInstance, Solution};
///
/// let problem = ProblemInstance::new(1, vec![vec![vec![3], vec![5]]]).unwrap();
/// let s = Solution::parse_for(&problem, "0-0-0 0-1-0").unwrap();
/// assert_eq!(makespan(&problem, &s), 8);
/// ```
pub fn makespan(problem: &ProblemInstance, solution: &Solution) -> u64 {
    simulate(problem, solution, |_| {})
}

/// Evaluates `solution` into a timed [`Schedule`].
pub fn schedule(problem: &ProblemInstance, solution: &Solution) -> Schedule {
    let mut operations = Vec::with_capacity(solution.len());
    let makespan = simulate(problem, solution, |op| operations.push(op));
    Schedule {
        operations,
        makespan,
        number_of_machines: problem.number_of_machines(),
    }
}

impl Schedule {
    /// Operations on `machine`, in dispatch order.
    pub fn machine_operations(&self, machine: usize) -> impl Iterator<Item = &ScheduledOperation> {
        self.operations.iter().filter(move |o| o.machine == machine)
    }
}

/// One line per machine: `M<m>: job-op[start,end) ...`.
impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "makespan {}", self.makespan)?;
        for m in 0..self.number_of_machines {
            write!(f, "M{m}:")?;
            for o in self.machine_operations(m) {
                write!(f, " {}-{}[{},{})", o.job, o.op, o.start, o.end)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
