//! Individual value generators.
//!
//! Every function takes the explicit [`FixtureRng`](crate::FixtureRng); none
//! of them keep state of their own.

pub mod document;
pub mod temporal;
pub mod text;
pub mod uuid;
