//! biz-seed: deterministic synthetic data for the store-network reporting
//! tables.
//!
//! The binary wires these modules to the command line; integration tests
//! drive them directly against the in-memory sink.

pub mod logging;
pub mod output;
pub mod profile;
pub mod run;
pub mod target;

pub use profile::{ProfileError, SeedProfile};
pub use run::{generate_into, populate_into, RunPlan};
pub use target::SeedTarget;
