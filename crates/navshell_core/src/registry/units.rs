//! Read-only unit registry built from validated manifests.
//!
//! # Responsibility
//! - Load the manifest set once and index units per group and dimension.
//! - Provide lookup APIs for every downstream component.
//!
//! # Invariants
//! - Unit ids are unique; duplicate manifests fail the load.
//! - Membership keys name catalog groups; dangling keys fail the load.
//! - The registry never mutates after `load` returns; it is safe to share
//!   read-only without synchronization.

use crate::model::unit::{Group, GroupDimension, GroupId, Unit, UnitId};
use crate::registry::manifest::{
    GroupCatalog, ManifestValidationError, UnitManifest, DEFAULT_UNIT_ORDER,
};
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry load errors. All variants are fatal at startup; downstream
/// addressing depends on a fully valid registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidManifest(ManifestValidationError),
    DuplicateUnitId(String),
    UnknownGroupKey {
        unit_id: String,
        dimension: GroupDimension,
        key: String,
    },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidManifest(err) => write!(f, "invalid unit manifest: {err}"),
            Self::DuplicateUnitId(value) => write!(f, "unit id already registered: {value}"),
            Self::UnknownGroupKey {
                unit_id,
                dimension,
                key,
            } => write!(
                f,
                "unit `{unit_id}` names unknown {} group: {key}",
                dimension.as_str()
            ),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidManifest(err) => Some(err),
            Self::DuplicateUnitId(_) | Self::UnknownGroupKey { .. } => None,
        }
    }
}

impl From<ManifestValidationError> for RegistryError {
    fn from(value: ManifestValidationError) -> Self {
        Self::InvalidManifest(value)
    }
}

/// Immutable unit metadata registry.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: BTreeMap<UnitId, Unit>,
    registration_order: Vec<UnitId>,
    group_index: BTreeMap<(GroupDimension, GroupId), BTreeSet<UnitId>>,
    groups: BTreeMap<GroupDimension, Vec<Group>>,
}

impl UnitRegistry {
    /// Loads a registry from a group catalog and a manifest set.
    ///
    /// # Errors
    /// - `InvalidManifest` when catalog or any manifest fails validation.
    /// - `DuplicateUnitId` when two manifests share an id.
    /// - `UnknownGroupKey` when a membership key names no catalog group.
    pub fn load(catalog: GroupCatalog, manifests: Vec<UnitManifest>) -> RegistryResult<Self> {
        catalog.validate()?;

        let mut groups = BTreeMap::new();
        groups.insert(GroupDimension::WorkPackage, catalog.workpackages);
        groups.insert(GroupDimension::Category, catalog.categories);

        let mut registry = Self {
            units: BTreeMap::new(),
            registration_order: Vec::with_capacity(manifests.len()),
            group_index: BTreeMap::new(),
            groups,
        };

        for (seq, manifest) in manifests.into_iter().enumerate() {
            registry.register(seq as u64, manifest)?;
        }

        info!(
            "event=registry_load module=registry status=ok units={} workpackages={} categories={}",
            registry.units.len(),
            registry.groups(GroupDimension::WorkPackage).len(),
            registry.groups(GroupDimension::Category).len()
        );
        Ok(registry)
    }

    /// Loads the built-in demo console registry.
    pub fn load_baseline() -> RegistryResult<Self> {
        Self::load(
            crate::registry::manifest::baseline_group_catalog(),
            crate::registry::manifest::baseline_manifests(),
        )
    }

    fn register(&mut self, seq: u64, manifest: UnitManifest) -> RegistryResult<()> {
        manifest.validate()?;

        let id = manifest.id.trim().to_string();
        if self.units.contains_key(id.as_str()) {
            return Err(RegistryError::DuplicateUnitId(id));
        }

        let mut group_keys: BTreeMap<GroupDimension, BTreeSet<GroupId>> = BTreeMap::new();
        for (dimension, keys) in [
            (GroupDimension::WorkPackage, &manifest.workpackages),
            (GroupDimension::Category, &manifest.categories),
        ] {
            for key in keys {
                let key = key.trim().to_string();
                if self.group(dimension, &key).is_none() {
                    return Err(RegistryError::UnknownGroupKey {
                        unit_id: id.clone(),
                        dimension,
                        key,
                    });
                }
                group_keys.entry(dimension).or_default().insert(key.clone());
                self.group_index
                    .entry((dimension, key))
                    .or_default()
                    .insert(id.clone());
            }
        }

        let unit = Unit {
            id: id.clone(),
            label: manifest.label.trim().to_string(),
            group_keys,
            default_order: manifest.order.unwrap_or(DEFAULT_UNIT_ORDER),
            version: manifest.version,
            owner: manifest.owner,
            status: manifest.status,
            registration_seq: seq,
        };

        self.registration_order.push(id.clone());
        self.units.insert(id, unit);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns one unit by id.
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.get(id)
    }

    /// Returns whether `id` names a loaded unit.
    pub fn contains(&self, id: &str) -> bool {
        self.units.contains_key(id)
    }

    /// Returns the unit's label, falling back to the raw id for unknown
    /// units so render surfaces always have something to show.
    pub fn unit_label(&self, id: &str) -> String {
        self.units
            .get(id)
            .map(|unit| unit.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Returns unit ids in manifest registration order.
    pub fn unit_ids(&self) -> &[UnitId] {
        &self.registration_order
    }

    /// Returns the member units of one group. Empty set (not an error) for
    /// empty or unknown groups.
    pub fn units_in_group(&self, dimension: GroupDimension, group_id: &str) -> BTreeSet<UnitId> {
        self.group_index
            .get(&(dimension, group_id.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the declared groups of one dimension, in catalog order.
    pub fn groups(&self, dimension: GroupDimension) -> &[Group] {
        self.groups
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns one declared group by id.
    pub fn group(&self, dimension: GroupDimension, group_id: &str) -> Option<&Group> {
        self.groups(dimension)
            .iter()
            .find(|group| group.id == group_id)
    }

    /// Returns the default group of one dimension: the first declared one.
    pub fn default_group(&self, dimension: GroupDimension) -> Option<&Group> {
        self.groups(dimension).first()
    }
}
