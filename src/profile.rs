//! YAML seed profiles.
//!
//! A profile overrides row counts, the treatment probabilities, the
//! supervision priority municipalities are filed under, and the
//! organizational tree:
//!
//! ```yaml
//! counts:
//!   accounts: 500
//!   hotlist: 50
//! treatments:
//!   count: 40
//!   p_sem_cnpj: 0.3
//! municipality_supervision: 40002
//! hierarchy:
//!   directorates:
//!     - key: 10001
//!       description: SP INTERIOR
//!       areas: [...]
//! ```
//!
//! Every field is optional; missing fields keep the built-in defaults.

use seed_generator::{HierarchyError, MunicipalityAnchor, OrgTree, TreatmentOptions, TreeSpec};
use seed_populate::{PopulateSettings, RowCounts};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading a seed profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read profile {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid profile YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid hierarchy: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Invalid profile: {0}")]
    Invalid(String),
}

/// Overrides applied on top of the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedProfile {
    pub counts: RowCounts,
    pub treatments: TreatmentOptions,
    pub municipality_supervision: i32,
    /// Replaces the built-in tree when present.
    pub hierarchy: Option<TreeSpec>,
}

impl Default for SeedProfile {
    fn default() -> Self {
        Self {
            counts: RowCounts::default(),
            treatments: TreatmentOptions::default(),
            municipality_supervision: MunicipalityAnchor::DEFAULT_SUPERVISION,
            hierarchy: None,
        }
    }
}

impl SeedProfile {
    /// Parse and validate a profile.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load a profile from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ProfileError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ProfileError> {
        let p = self.treatments.p_sem_cnpj;
        if !(0.0..=1.0).contains(&p) {
            return Err(ProfileError::Invalid(format!(
                "treatments.p_sem_cnpj must be within [0, 1], got {p}"
            )));
        }
        Ok(())
    }

    /// The organizational tree: the profile's, or the built-in one.
    pub fn tree(&self) -> Result<OrgTree, ProfileError> {
        let tree = match &self.hierarchy {
            Some(spec) => OrgTree::from_spec(spec)?,
            None => OrgTree::standard()?,
        };
        Ok(tree)
    }

    /// Apply the profile to run settings.
    pub fn apply(&self, mut settings: PopulateSettings) -> PopulateSettings {
        settings.counts = self.counts;
        settings.treatments = self.treatments;
        settings.municipality_supervision = self.municipality_supervision;
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_generator::Tier;

    #[test]
    fn test_empty_profile_keeps_defaults() {
        let profile = SeedProfile::from_yaml("{}").unwrap();
        assert_eq!(profile, SeedProfile::default());
        assert_eq!(profile.tree().unwrap().leaf_paths().len(), 6);
    }

    #[test]
    fn test_partial_counts() {
        let profile = SeedProfile::from_yaml("counts:\n  hotlist: 5\n").unwrap();
        assert_eq!(profile.counts.hotlist, 5);
        assert_eq!(profile.counts.accounts, RowCounts::default().accounts);
    }

    #[test]
    fn test_probability_out_of_range() {
        let err = SeedProfile::from_yaml("treatments:\n  p_sem_cnpj: 1.5\n").unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SeedProfile::from_yaml("rows: 10\n").unwrap_err();
        assert!(matches!(err, ProfileError::Yaml(_)));
    }

    #[test]
    fn test_custom_hierarchy() {
        let yaml = r#"
hierarchy:
  directorates:
    - key: 1
      description: NORTE
      areas:
        - key: 11
          description: MANAUS
          coordinations:
            - key: 111
              description: CENTRO
              supervisions:
                - key: 1111
                  description: CENTRO 1
"#;
        let profile = SeedProfile::from_yaml(yaml).unwrap();
        let tree = profile.tree().unwrap();
        assert_eq!(tree.leaf_paths().len(), 1);
        assert!(tree.find(Tier::Supervision, 1111).is_some());
    }
}
