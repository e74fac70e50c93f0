//! Unit manifest declaration and validation.

use crate::model::is_valid_nav_id;
use crate::model::unit::Group;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Declarative record for one navigable unit.
///
/// Manifests are authored statically (in-process or as JSON documents) and
/// validated before any registry state exists. Group membership keys name
/// groups from the group catalog; dangling keys fail registry load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitManifest {
    /// Stable unit identifier, e.g. `svc-hvdc-data-timeline`.
    pub id: String,
    /// Operator-facing label.
    pub label: String,
    /// Work-package membership keys, e.g. `["wp4", "wp5"]`.
    #[serde(default)]
    pub workpackages: Vec<String>,
    /// Category membership keys.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Baseline display order; omitted manifests sort last.
    #[serde(default)]
    pub order: Option<i64>,
    /// Declared unit version string.
    #[serde(default)]
    pub version: Option<String>,
    /// Owning partner/team short code.
    #[serde(default)]
    pub owner: Option<String>,
    /// Lifecycle status, e.g. `active`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Display order assigned when a manifest declares none.
pub const DEFAULT_UNIT_ORDER: i64 = 999;

impl UnitManifest {
    /// Validates declaration-level manifest invariants.
    pub fn validate(&self) -> Result<(), ManifestValidationError> {
        if self.id.trim().is_empty() {
            return Err(ManifestValidationError::EmptyId);
        }
        if !is_valid_nav_id(self.id.trim()) {
            return Err(ManifestValidationError::InvalidId(self.id.clone()));
        }
        if self.label.trim().is_empty() {
            return Err(ManifestValidationError::EmptyLabel(self.id.clone()));
        }

        validate_group_keys(&self.id, "workpackages", &self.workpackages)?;
        validate_group_keys(&self.id, "categories", &self.categories)?;
        Ok(())
    }
}

fn validate_group_keys(
    unit_id: &str,
    field: &'static str,
    keys: &[String],
) -> Result<(), ManifestValidationError> {
    let mut dedup = BTreeSet::<&str>::new();
    for key in keys {
        let normalized = key.trim();
        if normalized.is_empty() || !is_valid_nav_id(normalized) {
            return Err(ManifestValidationError::InvalidGroupKey {
                unit_id: unit_id.to_string(),
                field,
                key: key.clone(),
            });
        }
        if !dedup.insert(normalized) {
            return Err(ManifestValidationError::DuplicateGroupKey {
                unit_id: unit_id.to_string(),
                field,
                key: normalized.to_string(),
            });
        }
    }
    Ok(())
}

/// Parses a JSON-authored manifest set.
pub fn manifests_from_json(payload: &str) -> Result<Vec<UnitManifest>, ManifestValidationError> {
    serde_json::from_str(payload)
        .map_err(|err| ManifestValidationError::MalformedDocument(err.to_string()))
}

/// Declared groups per navigation axis.
///
/// Declaration order is meaningful: the first group of an axis is that
/// axis's default selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCatalog {
    /// Work-package groups, in display order.
    #[serde(default)]
    pub workpackages: Vec<Group>,
    /// Category groups, in display order.
    #[serde(default)]
    pub categories: Vec<Group>,
}

impl GroupCatalog {
    /// Validates group id shape and uniqueness per axis.
    pub fn validate(&self) -> Result<(), ManifestValidationError> {
        validate_groups("workpackages", &self.workpackages)?;
        validate_groups("categories", &self.categories)?;
        Ok(())
    }
}

fn validate_groups(field: &'static str, groups: &[Group]) -> Result<(), ManifestValidationError> {
    let mut dedup = BTreeSet::<&str>::new();
    for group in groups {
        if group.id.trim().is_empty() || !is_valid_nav_id(group.id.trim()) {
            return Err(ManifestValidationError::InvalidGroupId {
                field,
                group_id: group.id.clone(),
            });
        }
        if group.label.trim().is_empty() {
            return Err(ManifestValidationError::EmptyGroupLabel {
                field,
                group_id: group.id.clone(),
            });
        }
        if !dedup.insert(group.id.as_str()) {
            return Err(ManifestValidationError::DuplicateGroupId {
                field,
                group_id: group.id.clone(),
            });
        }
    }
    Ok(())
}

/// Baseline group catalog of the demo console: four work packages and
/// three service categories.
pub fn baseline_group_catalog() -> GroupCatalog {
    GroupCatalog {
        workpackages: vec![
            Group {
                id: "wp3".to_string(),
                label: "WP3 - Data Management & Analytics".to_string(),
            },
            Group {
                id: "wp4".to_string(),
                label: "WP4 - Monitoring & Diagnostics".to_string(),
            },
            Group {
                id: "wp5".to_string(),
                label: "WP5 - Innovative Cable System Technologies".to_string(),
            },
            Group {
                id: "wp6".to_string(),
                label: "WP6 - System Integration & Validation".to_string(),
            },
        ],
        categories: vec![
            Group {
                id: "cat-monitoring".to_string(),
                label: "Monitoring & Analytics".to_string(),
            },
            Group {
                id: "cat-awareness".to_string(),
                label: "Cable System Awareness".to_string(),
            },
            Group {
                id: "cat-human".to_string(),
                label: "Human Factors".to_string(),
            },
        ],
    }
}

/// Baseline unit manifest set of the demo console.
pub fn baseline_manifests() -> Vec<UnitManifest> {
    fn m(
        id: &str,
        label: &str,
        workpackages: &[&str],
        categories: &[&str],
        order: i64,
        version: &str,
        owner: &str,
    ) -> UnitManifest {
        UnitManifest {
            id: id.to_string(),
            label: label.to_string(),
            workpackages: workpackages.iter().map(|g| g.to_string()).collect(),
            categories: categories.iter().map(|g| g.to_string()).collect(),
            order: Some(order),
            version: Some(version.to_string()),
            owner: Some(owner.to_string()),
            status: Some("active".to_string()),
        }
    }

    vec![
        m(
            "svc-hvdc-operational-monitoring",
            "Operational Monitoring",
            &["wp4"],
            &["cat-monitoring"],
            110,
            "v1.2.7",
            "ucy",
        ),
        m(
            "svc-diagnostics",
            "Diagnostics & Early Warning",
            &["wp4"],
            &["cat-monitoring"],
            120,
            "v0.9.3",
            "ucy",
        ),
        m(
            "svc-asset-degradation",
            "Asset Degradation Explorer",
            &["wp5"],
            &["cat-awareness"],
            140,
            "v0.7.0",
            "iccs",
        ),
        m(
            "svc-service-topology",
            "Service Topology",
            &["wp6"],
            &["cat-awareness"],
            150,
            "v0.6.2",
            "iccs",
        ),
        m(
            "svc-lifecycle",
            "Lifecycle Overview",
            &["wp3", "wp6"],
            &["cat-human"],
            160,
            "v0.5.0",
            "iccs",
        ),
        m(
            "svc-hvdc-data-timeline",
            "Data Timeline Viewer",
            &["wp4", "wp5", "wp6"],
            &["cat-monitoring", "cat-awareness"],
            230,
            "v0.8.1",
            "uos",
        ),
    ]
}

/// Manifest and group-catalog validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestValidationError {
    EmptyId,
    InvalidId(String),
    EmptyLabel(String),
    InvalidGroupKey {
        unit_id: String,
        field: &'static str,
        key: String,
    },
    DuplicateGroupKey {
        unit_id: String,
        field: &'static str,
        key: String,
    },
    InvalidGroupId {
        field: &'static str,
        group_id: String,
    },
    EmptyGroupLabel {
        field: &'static str,
        group_id: String,
    },
    DuplicateGroupId {
        field: &'static str,
        group_id: String,
    },
    MalformedDocument(String),
}

impl Display for ManifestValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "unit manifest id must not be empty"),
            Self::InvalidId(value) => write!(f, "unit manifest id is invalid: {value}"),
            Self::EmptyLabel(unit_id) => {
                write!(f, "unit manifest label must not be empty: {unit_id}")
            }
            Self::InvalidGroupKey {
                unit_id,
                field,
                key,
            } => write!(f, "unit `{unit_id}` has invalid {field} key: {key}"),
            Self::DuplicateGroupKey {
                unit_id,
                field,
                key,
            } => write!(f, "unit `{unit_id}` repeats {field} key: {key}"),
            Self::InvalidGroupId { field, group_id } => {
                write!(f, "group catalog {field} id is invalid: {group_id}")
            }
            Self::EmptyGroupLabel { field, group_id } => {
                write!(f, "group catalog {field} label must not be empty: {group_id}")
            }
            Self::DuplicateGroupId { field, group_id } => {
                write!(f, "group catalog {field} id is duplicated: {group_id}")
            }
            Self::MalformedDocument(message) => {
                write!(f, "manifest document is malformed: {message}")
            }
        }
    }
}

impl Error for ManifestValidationError {}
