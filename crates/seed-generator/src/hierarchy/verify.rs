//! Fan-in checks: every child key must map to exactly one parent key.
//!
//! The same functions run over freshly generated records and over the
//! `SELECT DISTINCT` pairs read back after a load.

use super::tree::{HierarchyKeys, Tier};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A child key observed under more than one parent key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanInViolation {
    pub child_tier: Tier,
    pub child_key: i32,
    pub parent_keys: BTreeSet<i32>,
}

impl fmt::Display for FanInViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self
            .child_tier
            .parent()
            .map(|t| t.to_string())
            .unwrap_or_default();
        write!(
            f,
            "{} {} maps to {} {} keys: {:?}",
            self.child_tier,
            self.child_key,
            self.parent_keys.len(),
            parent,
            self.parent_keys
        )
    }
}

/// Child keys of `child_tier` that appear with more than one parent key.
///
/// `pairs` are `(child_key, parent_key)`; duplicates are fine.
pub fn single_parent_violations(
    child_tier: Tier,
    pairs: impl IntoIterator<Item = (i32, i32)>,
) -> Vec<FanInViolation> {
    let mut parents: BTreeMap<i32, BTreeSet<i32>> = BTreeMap::new();
    for (child, parent) in pairs {
        parents.entry(child).or_default().insert(parent);
    }
    parents
        .into_iter()
        .filter(|(_, keys)| keys.len() > 1)
        .map(|(child_key, parent_keys)| FanInViolation {
            child_tier,
            child_key,
            parent_keys,
        })
        .collect()
}

/// Result of a consistency check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchyReport {
    pub checked_records: usize,
    pub violations: Vec<FanInViolation>,
}

impl HierarchyReport {
    /// `true` when no child maps to more than one parent.
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }

    /// Append the violations of one child tier.
    pub fn extend(&mut self, violations: Vec<FanInViolation>) {
        self.violations.extend(violations);
    }
}

/// Check area → directorate, coordination → area and supervision →
/// coordination over a set of assigned key tuples.
pub fn verify_assignments<'a>(keys: impl IntoIterator<Item = &'a HierarchyKeys>) -> HierarchyReport {
    let keys: Vec<&HierarchyKeys> = keys.into_iter().collect();
    let mut report = HierarchyReport {
        checked_records: keys.len(),
        violations: Vec::new(),
    };
    report.extend(single_parent_violations(
        Tier::AreaManagement,
        keys.iter().map(|k| (k.area, k.directorate)),
    ));
    report.extend(single_parent_violations(
        Tier::Coordination,
        keys.iter().map(|k| (k.coordination, k.area)),
    ));
    report.extend(single_parent_violations(
        Tier::Supervision,
        keys.iter().map(|k| (k.supervision, k.coordination)),
    ));
    report
}
