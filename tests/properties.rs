//! Property tests over randomly generated instances.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use u_fjsp::tabu::{NeighborCount, TabuConfig, TabuList, TabuRunner};
use u_fjsp::{
    is_valid, makespan, random_initial_solution, random_neighbor, schedule, ProblemInstance,
    Solution,
};

/// Up to 4 jobs of up to 4 operations on 1-3 machines; every operation
/// keeps at least one admissible machine.
fn instance_strategy() -> impl Strategy<Value = ProblemInstance> {
    (1usize..4).prop_flat_map(|machines| {
        let row = (prop::collection::vec(-3i64..10, machines), 0..machines).prop_map(
            |(mut row, forced)| {
                if row[forced] < 0 {
                    row[forced] = -row[forced];
                }
                row
            },
        );
        let job = prop::collection::vec(row, 0..5);
        prop::collection::vec(job, 0..5)
            .prop_map(move |jobs| ProblemInstance::new(machines, jobs).unwrap())
    })
}

fn sorted_pairs(s: &Solution) -> Vec<(usize, usize)> {
    let mut v: Vec<_> = s.assignments().iter().map(|a| (a.job, a.op)).collect();
    v.sort_unstable();
    v
}

proptest! {
    #[test]
    fn initial_solution_is_valid(problem in instance_strategy(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let s = random_initial_solution(&problem, &mut rng);
        prop_assert_eq!(s.len(), problem.number_of_operations());
        prop_assert!(is_valid(&problem, &s));
    }

    #[test]
    fn neighbors_preserve_validity_and_operations(
        problem in instance_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut current = random_initial_solution(&problem, &mut rng);
        let pairs = sorted_pairs(&current);
        for _ in 0..25 {
            let next = random_neighbor(&problem, &current, &mut rng);
            prop_assert!(is_valid(&problem, &next), "invalid neighbor {}", next);
            prop_assert_eq!(next.len(), current.len());
            prop_assert_eq!(sorted_pairs(&next), pairs.clone());
            current = next;
        }
    }

    #[test]
    fn text_form_round_trips(problem in instance_strategy(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let s = random_initial_solution(&problem, &mut rng);
        let parsed = Solution::parse_for(&problem, &s.to_string()).unwrap();
        prop_assert_eq!(parsed.assignments(), s.assignments());
        prop_assert_eq!(parsed, s);
    }

    #[test]
    fn evaluation_is_pure(problem in instance_strategy(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let s = random_initial_solution(&problem, &mut rng);
        let m = makespan(&problem, &s);
        prop_assert_eq!(makespan(&problem, &s), m);
        let sched = schedule(&problem, &s);
        prop_assert_eq!(sched.makespan, m);
        // per-job operations never overlap and run in order
        for pair in sched.operations.iter().filter(|o| o.op > 0) {
            let prev = sched
                .operations
                .iter()
                .find(|o| o.job == pair.job && o.op + 1 == pair.op)
                .unwrap();
            prop_assert!(prev.end <= pair.start);
        }
    }

    #[test]
    fn tabu_list_is_bounded_and_unique(
        capacity in 0usize..8,
        ops in prop::collection::vec((any::<bool>(), 0u8..12), 0..64),
    ) {
        let mut tabu = TabuList::new(capacity);
        for (push, item) in ops {
            if push {
                tabu.push(item);
            } else {
                tabu.remove(&item);
            }
            prop_assert!(tabu.len() <= capacity);
        }
        let mut seen = HashSet::new();
        while let Some(item) = tabu.pop_oldest() {
            prop_assert!(seen.insert(item), "duplicate tabu entry {}", item);
        }
    }

    #[test]
    fn short_search_is_sound(problem in instance_strategy(), seed in any::<u64>()) {
        let config = TabuConfig::default()
            .with_max_iterations(15)
            .with_tabu_size(4)
            .with_reset_threshold(3)
            .with_neighbors(NeighborCount::Fixed(8))
            .with_timeout(None)
            .with_trace(false)
            .with_seed(seed);
        let result = TabuRunner::run(&problem, &config).unwrap();
        prop_assert_eq!(result.iterations, 15);
        for w in result.makespan_history.windows(2) {
            prop_assert!(w[1] <= w[0]);
        }
        for s in &result.best_solutions {
            prop_assert!(is_valid(&problem, s));
            prop_assert_eq!(makespan(&problem, s), result.best_makespan);
        }
    }
}
