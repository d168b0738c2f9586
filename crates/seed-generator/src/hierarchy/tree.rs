//! Typed organizational tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Error type for hierarchy construction.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    /// Two nodes of the same tier share a key
    #[error("Duplicate {tier} key {key}")]
    DuplicateKey { tier: Tier, key: i32 },

    /// Node attached under the wrong tier (or missing its parent)
    #[error("{tier} node {key} must be attached under a {}", .expected.map(|t| t.to_string()).unwrap_or_else(|| "nothing".to_string()))]
    InvalidParent {
        tier: Tier,
        key: i32,
        expected: Option<Tier>,
    },

    /// Non-leaf node without children
    #[error("{tier} node {key} has no children")]
    IncompleteBranch { tier: Tier, key: i32 },

    /// Tree without any supervision
    #[error("Organizational tree has no supervisions")]
    Empty,

    /// Error reading a tree file
    #[error("Failed to read hierarchy file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse hierarchy YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Level of the organizational tree, root first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Directorate,
    AreaManagement,
    Coordination,
    Supervision,
}

impl Tier {
    /// All tiers, root first.
    pub const ALL: [Tier; 4] = [
        Tier::Directorate,
        Tier::AreaManagement,
        Tier::Coordination,
        Tier::Supervision,
    ];

    /// Tier a node of this tier must be attached under.
    pub fn parent(&self) -> Option<Tier> {
        match self {
            Self::Directorate => None,
            Self::AreaManagement => Some(Self::Directorate),
            Self::Coordination => Some(Self::AreaManagement),
            Self::Supervision => Some(Self::Coordination),
        }
    }

    /// Whether nodes of this tier are leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Supervision)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Directorate => "directorate",
            Self::AreaManagement => "area management",
            Self::Coordination => "coordination",
            Self::Supervision => "supervision",
        };
        f.write_str(label)
    }
}

/// Index of a node within its [`OrgTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the tree's arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One organizational unit.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgNode {
    pub tier: Tier,
    pub key: i32,
    pub description: String,
    pub parent: Option<NodeId>,
}

/// One full root-to-leaf path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HierarchyPath {
    pub directorate: NodeId,
    pub area: NodeId,
    pub coordination: NodeId,
    pub supervision: NodeId,
}

impl HierarchyPath {
    /// Node of the path at a given tier.
    pub fn at(&self, tier: Tier) -> NodeId {
        match tier {
            Tier::Directorate => self.directorate,
            Tier::AreaManagement => self.area,
            Tier::Coordination => self.coordination,
            Tier::Supervision => self.supervision,
        }
    }
}

/// The four keys of a path, as they are persisted on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HierarchyKeys {
    pub directorate: i32,
    pub area: i32,
    pub coordination: i32,
    pub supervision: i32,
}

/// Arena of organizational nodes with precomputed leaf paths.
#[derive(Debug, Clone)]
pub struct OrgTree {
    nodes: Vec<OrgNode>,
    paths: Vec<HierarchyPath>,
}

impl OrgTree {
    /// Start building a tree.
    pub fn builder() -> OrgTreeBuilder {
        OrgTreeBuilder::default()
    }

    /// The built-in three-directorate tree.
    pub fn standard() -> Result<Self, HierarchyError> {
        Self::from_spec(&TreeSpec::standard())
    }

    /// Build a tree from its nested description.
    pub fn from_spec(spec: &TreeSpec) -> Result<Self, HierarchyError> {
        let mut builder = Self::builder();
        for dir in &spec.directorates {
            let dir_id = builder.add(Tier::Directorate, dir.key, &dir.description, None)?;
            for area in &dir.areas {
                let area_id =
                    builder.add(Tier::AreaManagement, area.key, &area.description, Some(dir_id))?;
                for coord in &area.coordinations {
                    let coord_id = builder.add(
                        Tier::Coordination,
                        coord.key,
                        &coord.description,
                        Some(area_id),
                    )?;
                    for sup in &coord.supervisions {
                        builder.add(
                            Tier::Supervision,
                            sup.key,
                            &sup.description,
                            Some(coord_id),
                        )?;
                    }
                }
            }
        }
        builder.build()
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> &OrgNode {
        &self.nodes[id.0]
    }

    /// All nodes of one tier, in insertion order.
    pub fn nodes_of(&self, tier: Tier) -> impl Iterator<Item = (NodeId, &OrgNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.tier == tier)
            .map(|(i, n)| (NodeId(i), n))
    }

    /// Find a node by tier and key.
    pub fn find(&self, tier: Tier, key: i32) -> Option<NodeId> {
        self.nodes_of(tier)
            .find(|(_, n)| n.key == key)
            .map(|(id, _)| id)
    }

    /// Every root-to-leaf path, in leaf insertion order.
    pub fn leaf_paths(&self) -> &[HierarchyPath] {
        &self.paths
    }

    /// The path ending at the given supervision key.
    pub fn path_for_supervision(&self, key: i32) -> Option<HierarchyPath> {
        let leaf = self.find(Tier::Supervision, key)?;
        self.paths.iter().copied().find(|p| p.supervision == leaf)
    }

    /// Persisted keys of a path.
    pub fn keys(&self, path: &HierarchyPath) -> HierarchyKeys {
        HierarchyKeys {
            directorate: self.node(path.directorate).key,
            area: self.node(path.area).key,
            coordination: self.node(path.coordination).key,
            supervision: self.node(path.supervision).key,
        }
    }

    /// Human-readable `DIR → AREA → COORD → SUP` rendering of a path.
    pub fn describe(&self, path: &HierarchyPath) -> String {
        Tier::ALL
            .iter()
            .map(|tier| {
                let node = self.node(path.at(*tier));
                format!("{} ({})", node.description, node.key)
            })
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

/// Incremental, validating tree constructor.
#[derive(Debug, Default)]
pub struct OrgTreeBuilder {
    nodes: Vec<OrgNode>,
}

impl OrgTreeBuilder {
    /// Add a node under `parent`.
    ///
    /// The parent must belong to the tier directly above; directorates take
    /// no parent. Keys are unique within a tier.
    pub fn add(
        &mut self,
        tier: Tier,
        key: i32,
        description: impl Into<String>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, HierarchyError> {
        let parent_ok = match (tier.parent(), parent) {
            (None, None) => true,
            (Some(expected), Some(p)) => self.nodes.get(p.0).map(|n| n.tier) == Some(expected),
            _ => false,
        };
        if !parent_ok {
            return Err(HierarchyError::InvalidParent {
                tier,
                key,
                expected: tier.parent(),
            });
        }
        if self.nodes.iter().any(|n| n.tier == tier && n.key == key) {
            return Err(HierarchyError::DuplicateKey { tier, key });
        }

        self.nodes.push(OrgNode {
            tier,
            key,
            description: description.into(),
            parent,
        });
        Ok(NodeId(self.nodes.len() - 1))
    }

    /// Validate completeness and precompute leaf paths.
    pub fn build(self) -> Result<OrgTree, HierarchyError> {
        for (i, node) in self.nodes.iter().enumerate() {
            if node.tier.is_leaf() {
                continue;
            }
            let has_child = self.nodes.iter().any(|n| n.parent == Some(NodeId(i)));
            if !has_child {
                return Err(HierarchyError::IncompleteBranch {
                    tier: node.tier,
                    key: node.key,
                });
            }
        }

        let mut paths = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if !node.tier.is_leaf() {
                continue;
            }
            let supervision = NodeId(i);
            let path = self
                .parent_of(supervision)
                .and_then(|coordination| {
                    let area = self.parent_of(coordination)?;
                    let directorate = self.parent_of(area)?;
                    Some(HierarchyPath {
                        directorate,
                        area,
                        coordination,
                        supervision,
                    })
                })
                .ok_or(HierarchyError::InvalidParent {
                    tier: node.tier,
                    key: node.key,
                    expected: node.tier.parent(),
                })?;
            paths.push(path);
        }

        if paths.is_empty() {
            return Err(HierarchyError::Empty);
        }

        Ok(OrgTree {
            nodes: self.nodes,
            paths,
        })
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }
}

// ============================================================================
// Nested description (YAML)
// ============================================================================

/// Nested tree description, as written in a seed profile.
///
/// ```yaml
/// directorates:
///   - key: 10002
///     description: SUL
///     areas:
///       - key: 20002
///         description: SUL
///         coordinations:
///           - key: 30003
///             description: COORD SUL
///             supervisions:
///               - key: 40004
///                 description: SUP SUL REGIAO
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub directorates: Vec<DirectorateSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorateSpec {
    pub key: i32,
    pub description: String,
    pub areas: Vec<AreaSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSpec {
    pub key: i32,
    pub description: String,
    pub coordinations: Vec<CoordinationSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationSpec {
    pub key: i32,
    pub description: String,
    pub supervisions: Vec<SupervisionSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisionSpec {
    pub key: i32,
    pub description: String,
}

fn sup(key: i32, description: &str) -> SupervisionSpec {
    SupervisionSpec {
        key,
        description: description.to_string(),
    }
}

fn coord(key: i32, description: &str, supervisions: Vec<SupervisionSpec>) -> CoordinationSpec {
    CoordinationSpec {
        key,
        description: description.to_string(),
        supervisions,
    }
}

fn single_area_directorate(
    key: i32,
    description: &str,
    area_key: i32,
    area_description: &str,
    coordinations: Vec<CoordinationSpec>,
) -> DirectorateSpec {
    DirectorateSpec {
        key,
        description: description.to_string(),
        areas: vec![AreaSpec {
            key: area_key,
            description: area_description.to_string(),
            coordinations,
        }],
    }
}

impl TreeSpec {
    /// Built-in tree: three directorates, six supervisions.
    pub fn standard() -> Self {
        Self {
            directorates: vec![
                single_area_directorate(
                    10001,
                    "SP INTERIOR",
                    20001,
                    "SAO PAULO",
                    vec![
                        coord(
                            30001,
                            "COORD LESTE",
                            vec![sup(40001, "SUP LESTE"), sup(40002, "SUP OESTE")],
                        ),
                        coord(30002, "COORD OESTE", vec![sup(40003, "SUP SUL")]),
                    ],
                ),
                single_area_directorate(
                    10002,
                    "SUL",
                    20002,
                    "SUL",
                    vec![coord(30003, "COORD SUL", vec![sup(40004, "SUP SUL REGIAO")])],
                ),
                single_area_directorate(
                    10003,
                    "NORDESTE 1",
                    20003,
                    "NORDESTE 1",
                    vec![coord(
                        30004,
                        "COORD NORDESTE",
                        vec![sup(40005, "SUP NORDESTE A"), sup(40006, "SUP NORDESTE B")],
                    )],
                ),
            ],
        }
    }

    /// Parse a tree description from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, HierarchyError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a tree description from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HierarchyError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

impl Default for TreeSpec {
    fn default() -> Self {
        Self::standard()
    }
}
