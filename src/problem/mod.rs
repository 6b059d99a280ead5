//! Problem definition: the static instance and its text loader.

mod instance;
mod loading;

pub use instance::{InstanceRecord, ProblemInstance};
pub use loading::parse_instance;
