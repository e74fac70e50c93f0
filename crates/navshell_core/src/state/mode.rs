//! Mode descriptors and the enabled-mode catalog.

use crate::model::is_valid_nav_id;
use crate::model::nav::ModeId;
use crate::model::unit::GroupDimension;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Status label shown when no mode id resolves to a descriptor.
pub const MODE_LABEL_FALLBACK: &str = "Not configured";

/// Per-mode rule set for unit/group coupling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainmentPolicy {
    /// Selecting a unit requires a group selection on the mode's axis.
    pub requires_group: bool,
    /// The selected unit must be a member of the selected group.
    pub strict_containment: bool,
    /// Link navigation may switch the selected group to reach a target.
    pub allow_group_switch: bool,
}

impl ContainmentPolicy {
    /// Policy for modes without a grouping axis.
    pub const FLAT: ContainmentPolicy = ContainmentPolicy {
        requires_group: false,
        strict_containment: false,
        allow_group_switch: false,
    };
}

/// One declared navigation mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeDescriptor {
    /// Stable mode identifier, e.g. `by_work_package`.
    pub id: ModeId,
    /// Operator-facing label, e.g. `Per Work Package`.
    pub label: String,
    /// Grouping axis governed by this mode; `None` for flat modes.
    pub dimension: Option<GroupDimension>,
    pub policy: ContainmentPolicy,
    /// Disabled modes stay declared (future work) but are never assignable.
    pub enabled: bool,
}

/// Declared mode list with the enabled allow-list derived from it.
///
/// Declaration order is meaningful: the first enabled mode is the default.
#[derive(Debug, Clone)]
pub struct ModeCatalog {
    modes: Vec<ModeDescriptor>,
}

impl ModeCatalog {
    /// Builds a catalog after validating declaration invariants.
    ///
    /// # Errors
    /// - `InvalidModeId` / `DuplicateModeId` on malformed declarations.
    /// - `NoEnabledMode` when nothing could ever be assigned.
    pub fn new(modes: Vec<ModeDescriptor>) -> Result<Self, ModeCatalogError> {
        let mut dedup = BTreeSet::<&str>::new();
        for mode in &modes {
            if !is_valid_nav_id(mode.id.as_str()) {
                return Err(ModeCatalogError::InvalidModeId(mode.id.clone()));
            }
            if !dedup.insert(mode.id.as_str()) {
                return Err(ModeCatalogError::DuplicateModeId(mode.id.clone()));
            }
        }
        if !modes.iter().any(|mode| mode.enabled) {
            return Err(ModeCatalogError::NoEnabledMode);
        }
        Ok(Self { modes })
    }

    /// Baseline console catalog: the two live navigation paradigms plus the
    /// declared-but-disabled future modes.
    pub fn baseline() -> Self {
        Self::new(vec![
            ModeDescriptor {
                id: "by_work_package".to_string(),
                label: "Per Work Package".to_string(),
                dimension: Some(GroupDimension::WorkPackage),
                policy: ContainmentPolicy {
                    requires_group: true,
                    strict_containment: true,
                    allow_group_switch: true,
                },
                enabled: true,
            },
            ModeDescriptor {
                id: "by_category".to_string(),
                label: "Per Category".to_string(),
                dimension: Some(GroupDimension::Category),
                policy: ContainmentPolicy {
                    requires_group: true,
                    strict_containment: true,
                    allow_group_switch: false,
                },
                enabled: true,
            },
            ModeDescriptor {
                id: "by_function".to_string(),
                label: "Per Function".to_string(),
                dimension: None,
                policy: ContainmentPolicy::FLAT,
                enabled: false,
            },
            ModeDescriptor {
                id: "favorites".to_string(),
                label: "Favorites".to_string(),
                dimension: None,
                policy: ContainmentPolicy::FLAT,
                enabled: false,
            },
        ])
        .expect("baseline mode catalog is statically valid")
    }

    /// Returns all declared modes, in declaration order.
    pub fn modes(&self) -> &[ModeDescriptor] {
        &self.modes
    }

    /// Returns the enabled modes, in declaration order.
    pub fn enabled_modes(&self) -> impl Iterator<Item = &ModeDescriptor> {
        self.modes.iter().filter(|mode| mode.enabled)
    }

    /// Returns one declared mode by id, enabled or not.
    pub fn mode(&self, mode_id: &str) -> Option<&ModeDescriptor> {
        self.modes.iter().find(|mode| mode.id == mode_id)
    }

    /// Returns whether `mode_id` names an enabled mode.
    pub fn is_enabled(&self, mode_id: &str) -> bool {
        self.mode(mode_id).is_some_and(|mode| mode.enabled)
    }

    /// Returns the default mode: the first enabled declaration.
    pub fn default_mode(&self) -> &ModeDescriptor {
        self.enabled_modes()
            .next()
            .expect("catalog construction guarantees an enabled mode")
    }

    /// Returns the status label for one mode id, with a stable fallback for
    /// unknown ids so status surfaces never render raw identifiers.
    pub fn mode_label(&self, mode_id: &str) -> &str {
        self.mode(mode_id)
            .map(|mode| mode.label.as_str())
            .unwrap_or(MODE_LABEL_FALLBACK)
    }
}

/// Mode catalog declaration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeCatalogError {
    InvalidModeId(String),
    DuplicateModeId(String),
    NoEnabledMode,
}

impl Display for ModeCatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidModeId(value) => write!(f, "mode id is invalid: {value}"),
            Self::DuplicateModeId(value) => write!(f, "mode id is duplicated: {value}"),
            Self::NoEnabledMode => write!(f, "mode catalog declares no enabled mode"),
        }
    }
}

impl Error for ModeCatalogError {}
