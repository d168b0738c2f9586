//! Spreading records over the leaf paths of an [`OrgTree`].

use super::tree::{HierarchyPath, OrgTree, Tier};
use crate::FixtureRng;
use std::collections::BTreeMap;

/// Assign one leaf path to each of `count` records.
///
/// Every leaf gets `count / L` paths, the remaining `count % L` are given to
/// leaves picked uniformly at random, then the whole assignment is shuffled.
pub fn distribute(tree: &OrgTree, count: usize, rng: &mut FixtureRng) -> Vec<HierarchyPath> {
    let leaves = tree.leaf_paths();
    if leaves.is_empty() || count == 0 {
        return Vec::new();
    }

    let per_leaf = count / leaves.len();
    let remainder = count % leaves.len();

    let mut assigned = Vec::with_capacity(count);
    for path in leaves {
        assigned.extend(std::iter::repeat(*path).take(per_leaf));
    }
    for _ in 0..remainder {
        if let Some(path) = rng.choose(leaves) {
            assigned.push(*path);
        }
    }

    rng.shuffle(&mut assigned);
    assigned
}

/// Record count per node description at one tier.
pub fn usage_by_tier(
    tree: &OrgTree,
    paths: &[HierarchyPath],
    tier: Tier,
) -> BTreeMap<String, usize> {
    let mut usage = BTreeMap::new();
    for path in paths {
        let node = tree.node(path.at(tier));
        *usage.entry(node.description.clone()).or_insert(0) += 1;
    }
    usage
}

/// Per-leaf and per-tier usage of an assignment, for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSummary {
    pub total: usize,
    pub per_leaf: Vec<(String, usize)>,
    pub per_tier: BTreeMap<Tier, BTreeMap<String, usize>>,
}

impl DistributionSummary {
    /// Summarize an assignment produced by [`distribute`].
    pub fn from_paths(tree: &OrgTree, paths: &[HierarchyPath]) -> Self {
        let per_leaf = tree
            .leaf_paths()
            .iter()
            .map(|leaf| {
                let used = paths.iter().filter(|p| *p == leaf).count();
                (tree.describe(leaf), used)
            })
            .collect();
        let per_tier = Tier::ALL
            .iter()
            .map(|tier| (*tier, usage_by_tier(tree, paths, *tier)))
            .collect();
        Self {
            total: paths.len(),
            per_leaf,
            per_tier,
        }
    }

    /// Number of leaf paths that received no record.
    pub fn unused_leaves(&self) -> usize {
        self.per_leaf.iter().filter(|(_, used)| *used == 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rng(seed: u64) -> FixtureRng {
        FixtureRng::new(seed, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
    }

    #[test]
    fn test_every_leaf_used_when_count_covers_leaves() {
        let tree = OrgTree::standard().unwrap();
        for count in [6, 7, 13, 2500] {
            let paths = distribute(&tree, count, &mut rng(42));
            assert_eq!(paths.len(), count);
            let summary = DistributionSummary::from_paths(&tree, &paths);
            assert_eq!(summary.unused_leaves(), 0, "count {count}");
        }
    }

    #[test]
    fn test_distribution_is_near_uniform() {
        let tree = OrgTree::standard().unwrap();
        let paths = distribute(&tree, 2500, &mut rng(7));
        let summary = DistributionSummary::from_paths(&tree, &paths);
        // 2500 / 6 = 416 per leaf, remainder of 4 spread at random
        for (_, used) in &summary.per_leaf {
            assert!((416..=420).contains(used));
        }
        assert_eq!(summary.total, 2500);
    }

    #[test]
    fn test_fewer_records_than_leaves() {
        let tree = OrgTree::standard().unwrap();
        let paths = distribute(&tree, 3, &mut rng(1));
        assert_eq!(paths.len(), 3);
        assert!(distribute(&tree, 0, &mut rng(1)).is_empty());
    }

    #[test]
    fn test_distribution_is_deterministic() {
        let tree = OrgTree::standard().unwrap();
        assert_eq!(
            distribute(&tree, 100, &mut rng(3)),
            distribute(&tree, 100, &mut rng(3))
        );
    }

    #[test]
    fn test_usage_by_tier() {
        let tree = OrgTree::standard().unwrap();
        let paths = distribute(&tree, 600, &mut rng(5));
        let usage = usage_by_tier(&tree, &paths, Tier::Directorate);
        assert_eq!(usage.values().sum::<usize>(), 600);
        // SP INTERIOR owns three of the six leaves
        assert!(usage["SP INTERIOR"] >= 300);
    }
}
