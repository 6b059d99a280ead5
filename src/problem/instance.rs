//! Static FJSP instance definition.

use std::fmt;

use crate::error::{FjspError, Result};

/// An instance as read from text, before structural checks.
///
/// `jobs[j][o][m]` is the duration of operation `o` of job `j` on machine
/// `m`; any negative value marks the machine as inadmissible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    /// Declared number of jobs.
    pub number_of_jobs: usize,
    /// Declared number of machines.
    pub number_of_machines: usize,
    /// Raw duration rows per job and operation.
    pub jobs: Vec<Vec<Vec<i64>>>,
}

/// Immutable Flexible Job-Shop instance.
///
/// Every operation has at least one admissible machine; this is checked at
/// construction. The instance is read-only and can be shared across
/// concurrent searches by reference.
///
/// # Examples
///
/// ```
/// use u_fjsp::ProblemInstance;
///
/// // One job with two operations on a single machine.
/// let problem = ProblemInstance::new(1, vec![vec![vec![3], vec![5]]]).unwrap();
/// assert_eq!(problem.number_of_operations(), 2);
/// assert_eq!(problem.duration(0, 1, 0), Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemInstance {
    number_of_machines: usize,
    /// `durations[j][o][m]`, `None` when inadmissible.
    durations: Vec<Vec<Vec<Option<u64>>>>,
    admissible: Vec<Vec<Vec<usize>>>,
    number_of_operations: usize,
}

impl ProblemInstance {
    /// Builds an instance from raw duration rows (negative = inadmissible).
    pub fn new(number_of_machines: usize, jobs: Vec<Vec<Vec<i64>>>) -> Result<Self> {
        Self::from_record(InstanceRecord {
            number_of_jobs: jobs.len(),
            number_of_machines,
            jobs,
        })
    }

    /// Builds an instance from a parsed record.
    ///
    /// # Errors
    ///
    /// [`FjspError::MalformedInstance`] when there are no machines, the job
    /// count disagrees with the job list, a duration row has the wrong
    /// width, or an operation has no admissible machine.
    pub fn from_record(record: InstanceRecord) -> Result<Self> {
        if record.number_of_machines == 0 {
            return Err(FjspError::MalformedInstance(
                "number_of_machines must be at least 1".into(),
            ));
        }
        if record.jobs.len() != record.number_of_jobs {
            return Err(FjspError::MalformedInstance(format!(
                "declared {} jobs but found {}",
                record.number_of_jobs,
                record.jobs.len()
            )));
        }

        let mut durations = Vec::with_capacity(record.jobs.len());
        let mut admissible = Vec::with_capacity(record.jobs.len());
        let mut number_of_operations = 0;

        for (j, ops) in record.jobs.iter().enumerate() {
            let mut job_durations = Vec::with_capacity(ops.len());
            let mut job_admissible = Vec::with_capacity(ops.len());
            for (o, row) in ops.iter().enumerate() {
                if row.len() != record.number_of_machines {
                    return Err(FjspError::MalformedInstance(format!(
                        "job {j} op {o}: expected {} durations, found {}",
                        record.number_of_machines,
                        row.len()
                    )));
                }
                let row: Vec<Option<u64>> = row
                    .iter()
                    .map(|&d| u64::try_from(d).ok())
                    .collect();
                let machines: Vec<usize> = row
                    .iter()
                    .enumerate()
                    .filter_map(|(m, d)| d.map(|_| m))
                    .collect();
                if machines.is_empty() {
                    return Err(FjspError::MalformedInstance(format!(
                        "job {j} op {o} has no admissible machine"
                    )));
                }
                job_durations.push(row);
                job_admissible.push(machines);
            }
            number_of_operations += ops.len();
            durations.push(job_durations);
            admissible.push(job_admissible);
        }

        Ok(Self {
            number_of_machines: record.number_of_machines,
            durations,
            admissible,
            number_of_operations,
        })
    }

    /// Number of jobs.
    pub fn number_of_jobs(&self) -> usize {
        self.durations.len()
    }

    /// Number of machines.
    pub fn number_of_machines(&self) -> usize {
        self.number_of_machines
    }

    /// Number of operations of job `job` (0 for unknown jobs).
    pub fn ops_per_job(&self, job: usize) -> usize {
        self.durations.get(job).map_or(0, Vec::len)
    }

    /// Total number of operations over all jobs.
    pub fn number_of_operations(&self) -> usize {
        self.number_of_operations
    }

    /// Duration of `(job, op)` on `machine`, `None` when inadmissible or
    /// out of range.
    #[inline]
    pub fn duration(&self, job: usize, op: usize, machine: usize) -> Option<u64> {
        self.durations
            .get(job)
            .and_then(|ops| ops.get(op))
            .and_then(|row| row.get(machine))
            .copied()
            .flatten()
    }

    /// Machines able to process `(job, op)`, ascending. Empty when out of
    /// range.
    #[inline]
    pub fn admissible_machines(&self, job: usize, op: usize) -> &[usize] {
        self.admissible
            .get(job)
            .and_then(|ops| ops.get(op))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Renders the instance in the text file format, `-1` for inadmissible.
impl fmt::Display for ProblemInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.number_of_jobs(), self.number_of_machines)?;
        for ops in &self.durations {
            writeln!(f, "{}", ops.len())?;
            for row in ops {
                let cells: Vec<String> = row
                    .iter()
                    .map(|d| d.map_or_else(|| "-1".to_string(), |v| v.to_string()))
                    .collect();
                writeln!(f, "{}", cells.join(" "))?;
            }
        }
        Ok(())
    }
}
