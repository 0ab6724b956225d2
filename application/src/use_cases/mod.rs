//! Use cases (application services)

pub mod judge;
pub mod run_comparison;
