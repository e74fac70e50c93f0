//! Unit and grouping value types.
//!
//! # Responsibility
//! - Define the canonical record for one navigable unit (a tool/service
//!   panel entry).
//! - Define the navigation axes and their group descriptors.
//!
//! # Invariants
//! - `Unit.id` is globally unique and immutable after registry load.
//! - `registration_seq` reflects manifest load order and never changes.
//! - Group membership is carried on the unit; groups do not own member
//!   lists of their own.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Stable identifier of one navigable unit.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type UnitId = String;

/// Stable identifier of one group within a dimension.
pub type GroupId = String;

/// Navigation axis along which units are grouped.
///
/// New axes are added here; each axis gets its own slot in
/// `NavigationState::selected_group`, so existing transition logic is
/// unaffected by additions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupDimension {
    /// Project work-package membership (WP3, WP4, ...).
    WorkPackage,
    /// Functional category membership (monitoring, awareness, ...).
    Category,
}

impl GroupDimension {
    /// All declared dimensions, in canonical order.
    pub const ALL: &'static [GroupDimension] =
        &[GroupDimension::WorkPackage, GroupDimension::Category];

    /// Stable string id used in logs and persisted payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WorkPackage => "work_package",
            Self::Category => "category",
        }
    }
}

/// One selectable group on a navigation axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Stable group identifier, e.g. `wp4`.
    pub id: GroupId,
    /// Operator-facing label, e.g. `WP4 - Monitoring & Diagnostics`.
    pub label: String,
}

/// Canonical record for one navigable unit.
///
/// Built from a validated manifest at registry load time and immutable
/// thereafter. Owned exclusively by the registry; every other component
/// borrows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Stable global id used for addressing, links and persistence.
    pub id: UnitId,
    /// Operator-facing label.
    pub label: String,
    /// Group membership per dimension. Many-to-many; an absent dimension
    /// means the unit is unreachable through that axis.
    pub group_keys: BTreeMap<GroupDimension, BTreeSet<GroupId>>,
    /// Baseline display order. Lower sorts first.
    pub default_order: i64,
    /// Declared unit version string, e.g. `v0.8.1`.
    pub version: Option<String>,
    /// Owning partner/team short code.
    pub owner: Option<String>,
    /// Lifecycle status, e.g. `active`.
    pub status: Option<String>,
    /// Manifest load position; stable resolver tie-break.
    pub registration_seq: u64,
}

impl Unit {
    /// Returns whether this unit belongs to `group_id` under `dimension`.
    pub fn is_member(&self, dimension: GroupDimension, group_id: &str) -> bool {
        self.group_keys
            .get(&dimension)
            .is_some_and(|groups| groups.contains(group_id))
    }

    /// Returns the unit's group ids under one dimension, sorted.
    pub fn groups_in(&self, dimension: GroupDimension) -> impl Iterator<Item = &GroupId> {
        self.group_keys.get(&dimension).into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::{Group, GroupDimension, Unit};
    use std::collections::{BTreeMap, BTreeSet};

    fn unit_with_groups(dimension: GroupDimension, groups: &[&str]) -> Unit {
        let mut group_keys = BTreeMap::new();
        group_keys.insert(
            dimension,
            groups.iter().map(|g| g.to_string()).collect::<BTreeSet<_>>(),
        );
        Unit {
            id: "svc-timeline".to_string(),
            label: "Data Timeline Viewer".to_string(),
            group_keys,
            default_order: 230,
            version: Some("v0.8.1".to_string()),
            owner: Some("uos".to_string()),
            status: Some("active".to_string()),
            registration_seq: 0,
        }
    }

    #[test]
    fn membership_checks_are_dimension_scoped() {
        let unit = unit_with_groups(GroupDimension::WorkPackage, &["wp4", "wp5"]);
        assert!(unit.is_member(GroupDimension::WorkPackage, "wp4"));
        assert!(!unit.is_member(GroupDimension::WorkPackage, "wp6"));
        assert!(!unit.is_member(GroupDimension::Category, "wp4"));
    }

    #[test]
    fn groups_in_returns_sorted_members() {
        let unit = unit_with_groups(GroupDimension::WorkPackage, &["wp5", "wp4"]);
        let groups: Vec<&String> = unit.groups_in(GroupDimension::WorkPackage).collect();
        assert_eq!(groups, ["wp4", "wp5"]);
    }

    #[test]
    fn dimension_serializes_as_snake_case() {
        let json = serde_json::to_value(GroupDimension::WorkPackage).expect("dimension to json");
        assert_eq!(json, serde_json::json!("work_package"));
    }

    #[test]
    fn group_roundtrips_through_json() {
        let group = Group {
            id: "wp4".to_string(),
            label: "WP4".to_string(),
        };
        let json = serde_json::to_value(&group).expect("group to json");
        let decoded: Group = serde_json::from_value(json).expect("group from json");
        assert_eq!(decoded, group);
    }
}
