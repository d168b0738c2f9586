//! Deterministic fixture generation for the biz-seed tables.
//!
//! Every generator takes an explicit [`FixtureRng`]; the same seed and
//! reference date always reproduce the same records.
//!
//! # Example
//!
//! ```rust,ignore
//! use seed_generator::{FixtureRng, OrgTree};
//! use seed_generator::fixtures::stores::generate_stores;
//! use seed_core::SeedTable;
//!
//! let tree = OrgTree::standard()?;
//! let mut rng = FixtureRng::for_table(42, SeedTable::Stores, reference_date);
//! let stores = generate_stores(&mut rng, &tree, &[10_001, 10_002]);
//! ```

pub mod error;
pub mod fixtures;
pub mod generators;
pub mod hierarchy;
pub mod rng;

pub use error::GeneratorError;
pub use fixtures::accounts::{generate_accounts, sample_store_keys, AccountRecord};
pub use fixtures::activity::{generate_activity, ActivityRecord};
pub use fixtures::hotlist::{generate_hotlist, HotlistRecord};
pub use fixtures::municipalities::{
    generate_municipalities, MunicipalityAnchor, MunicipalityRecord,
};
pub use fixtures::opportunities::{generate_opportunities, OpportunityRecord};
pub use fixtures::stores::{generate_stores, StoreRecord, StoreStatus};
pub use fixtures::treatments::{generate_treatments, TreatmentOptions, TreatmentRecord, YesNo};
pub use fixtures::{to_rows, Fixture, MonthlyVolumes};
pub use hierarchy::{HierarchyError, OrgTree, Tier, TreeSpec};
pub use rng::FixtureRng;
