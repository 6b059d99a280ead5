//! Text instance loader.
//!
//! ```text
//! # comment lines start with '#' or '//'
//! 2 3          <- number_of_jobs number_of_machines
//! 2            <- operations of job 0
//! 4 -1 2       <- durations of op 0 on each machine, negative = inadmissible
//! 3 3 -1
//! 1            <- operations of job 1
//! 5 6 7
//! ```

use std::path::Path;
use std::str::FromStr;

use crate::error::{FjspError, Result};

use super::instance::{InstanceRecord, ProblemInstance};

/// Skips comments and blank lines, yielding `(line_number, trimmed_line)`.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
}

fn parse_int<T: FromStr>(token: &str, line: usize, what: &str) -> Result<T> {
    token.parse().map_err(|_| FjspError::Parse {
        line,
        reason: format!("expected {what}, found '{token}'"),
    })
}

/// Parses instance text into an unchecked [`InstanceRecord`].
///
/// Tokens beyond the expected count on a line are ignored.
pub fn parse_instance(text: &str) -> Result<InstanceRecord> {
    let mut lines = content_lines(text);
    // End-of-input errors point just past the last content line.
    let mut last_line = 0;
    let mut next_line = |what: &str| match lines.next() {
        Some((line_no, line)) => {
            last_line = line_no;
            Ok((line_no, line))
        }
        None => Err(FjspError::Parse {
            line: last_line + 1,
            reason: format!("unexpected end of input, expected {what}"),
        }),
    };

    let (header_no, header) = next_line("header line")?;
    let mut tokens = header.split_whitespace();
    let mut header_field = |what: &str| -> Result<usize> {
        let token = tokens.next().ok_or_else(|| FjspError::Parse {
            line: header_no,
            reason: format!("expected {what}"),
        })?;
        parse_int(token, header_no, what)
    };
    let number_of_jobs = header_field("number of jobs")?;
    let number_of_machines = header_field("number of machines")?;

    let mut jobs = Vec::with_capacity(number_of_jobs.min(1024));
    for job in 0..number_of_jobs {
        let (line_no, line) = next_line(&format!("operation count of job {job}"))?;
        let first = line.split_whitespace().next().unwrap_or_default();
        let number_of_ops: usize = parse_int(first, line_no, "operation count")?;

        let mut ops = Vec::with_capacity(number_of_ops.min(1024));
        for op in 0..number_of_ops {
            let (line_no, line) = next_line(&format!("durations of job {job} op {op}"))?;
            let row = line
                .split_whitespace()
                .take(number_of_machines)
                .map(|t| parse_int::<i64>(t, line_no, "duration"))
                .collect::<Result<Vec<_>>>()?;
            if row.len() < number_of_machines {
                return Err(FjspError::Parse {
                    line: line_no,
                    reason: format!(
                        "expected {number_of_machines} durations, found {}",
                        row.len()
                    ),
                });
            }
            ops.push(row);
        }
        jobs.push(ops);
    }

    Ok(InstanceRecord {
        number_of_jobs,
        number_of_machines,
        jobs,
    })
}

impl FromStr for ProblemInstance {
    type Err = FjspError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_record(parse_instance(s)?)
    }
}

impl ProblemInstance {
    /// Reads and parses an instance file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let problem: Self = text.parse()?;
        tracing::debug!(
            path = %path.display(),
            jobs = problem.number_of_jobs(),
            machines = problem.number_of_machines(),
            operations = problem.number_of_operations(),
            "loaded instance"
        );
        Ok(problem)
    }
}
