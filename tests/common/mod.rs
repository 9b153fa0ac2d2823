#![allow(dead_code)]

mod assertions;
mod fixtures;

// Re-export
pub use assertions::{assert_mesh_valid, assert_results_finite};

pub use fixtures::*;
