//! Organizational hierarchy: directorate → area management → coordination →
//! supervision.
//!
//! The tree is built once into an arena of [`OrgNode`]s tagged by [`Tier`]
//! and referenced by [`NodeId`]. Records are assigned whole leaf paths
//! ([`HierarchyPath`]) so their four keys always resolve to one branch.
//!
//! ```text
//! OrgTree (arena)
//!     │
//!     ├── leaf_paths()  -> [HierarchyPath; L]
//!     │
//!     ├── distribute()  -> [HierarchyPath; N]   (N div L per leaf, shuffled)
//!     │
//!     └── verify_*()    -> HierarchyReport      (single parent per child)
//! ```

pub mod distribution;
pub mod tree;
pub mod verify;

pub use distribution::{distribute, usage_by_tier, DistributionSummary};
pub use tree::{
    HierarchyError, HierarchyKeys, HierarchyPath, NodeId, OrgNode, OrgTree, OrgTreeBuilder, Tier,
    TreeSpec,
};
pub use verify::{single_parent_violations, verify_assignments, FanInViolation, HierarchyReport};
