//! Precedence-preserving relocation neighborhood.
//!
//! A neighbor moves one operation to another position between its job
//! predecessor and successor, and with [`SWITCH_MACHINE_CHANCE`] also moves
//! it to a different admissible machine.

use rand::Rng;

use crate::problem::ProblemInstance;

use super::codec::Solution;

/// Probability of reassigning the relocated operation to another machine.
pub const SWITCH_MACHINE_CHANCE: f64 = 0.8;

/// Random pivot draws before falling back to a full scan.
pub const MAX_PIVOT_ATTEMPTS: usize = 64;

/// Inclusive range of positions `pos` may move to without crossing its
/// job predecessor or successor.
fn relocation_range(solution: &Solution, pos: usize) -> (usize, usize) {
    let seq = solution.assignments();
    let pivot = seq[pos];

    let lower = match pivot.op.checked_sub(1) {
        Some(prev) => seq[..pos]
            .iter()
            .rposition(|a| a.job == pivot.job && a.op == prev)
            .map_or(0, |i| i + 1),
        None => 0,
    };
    let upper = seq[pos + 1..]
        .iter()
        .position(|a| a.job == pivot.job && a.op == pivot.op + 1)
        .map_or(seq.len() - 1, |i| pos + i);

    (lower, upper)
}

/// Finds a pivot with a non-trivial relocation range.
///
/// Random draws are bounded by [`MAX_PIVOT_ATTEMPTS`]; a linear scan from a
/// random offset follows so that any relocatable position is found.
/// Returns `None` when no operation can move.
fn pick_pivot<R: Rng>(solution: &Solution, rng: &mut R) -> Option<(usize, usize, usize)> {
    let n = solution.len();
    if n < 2 {
        return None;
    }
    for _ in 0..MAX_PIVOT_ATTEMPTS {
        let pos = rng.random_range(0..n);
        let (lower, upper) = relocation_range(solution, pos);
        if lower < upper {
            return Some((pos, lower, upper));
        }
    }
    let offset = rng.random_range(0..n);
    (0..n).map(|i| (offset + i) % n).find_map(|pos| {
        let (lower, upper) = relocation_range(solution, pos);
        (lower < upper).then_some((pos, lower, upper))
    })
}

/// With [`SWITCH_MACHINE_CHANCE`], picks a different admissible machine
/// for `(job, op)`; otherwise keeps `current`.
fn maybe_switch_machine<R: Rng>(
    problem: &ProblemInstance,
    job: usize,
    op: usize,
    current: usize,
    rng: &mut R,
) -> usize {
    let machines = problem.admissible_machines(job, op);
    if machines.len() < 2 || !rng.random_bool(SWITCH_MACHINE_CHANCE) {
        return current;
    }
    let others: Vec<usize> = machines.iter().copied().filter(|&m| m != current).collect();
    if others.is_empty() {
        return current;
    }
    others[rng.random_range(0..others.len())]
}

/// Produces one random neighbor of a valid solution.
///
/// The result is precedence-valid, has the same length and the same
/// multiset of `(job, op)` pairs. On instances where no operation can be
/// relocated only the machine switch is attempted.
pub fn random_neighbor<R: Rng>(
    problem: &ProblemInstance,
    solution: &Solution,
    rng: &mut R,
) -> Solution {
    let mut seq = solution.assignments().to_vec();

    match pick_pivot(solution, rng) {
        Some((pos, lower, upper)) => {
            // Uniform over [lower, upper] without `pos`.
            let mut target = rng.random_range(lower..upper);
            if target >= pos {
                target += 1;
            }
            let mut moved = seq.remove(pos);
            moved.machine = maybe_switch_machine(problem, moved.job, moved.op, moved.machine, rng);
            seq.insert(target, moved);
        }
        None => {
            if seq.is_empty() {
                return solution.clone();
            }
            let pos = rng.random_range(0..seq.len());
            let a = seq[pos];
            let machine = maybe_switch_machine(problem, a.job, a.op, a.machine, rng);
            if machine == a.machine {
                tracing::trace!(len = seq.len(), "degenerate neighborhood, neighbor unchanged");
                return solution.clone();
            }
            seq[pos].machine = machine;
        }
    }

    Solution::new(seq)
}
