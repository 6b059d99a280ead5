//! Solution representation and the relocation neighborhood.

mod codec;
mod neighborhood;

pub use codec::{is_valid, random_initial_solution, validate, Assignment, Solution};
pub use neighborhood::{random_neighbor, MAX_PIVOT_ATTEMPTS, SWITCH_MACHINE_CHANCE};
