//! Navigation state root.
//!
//! # Responsibility
//! - Define the single mutable orchestration record the whole shell reads.
//!
//! # Invariants
//! - Created once per session; reset to defaults, never destroyed.
//! - Only `state::NavStateMachine` mutates it; every other component reads
//!   it or proposes transitions.

use crate::model::unit::{GroupDimension, GroupId, UnitId};
use std::collections::BTreeMap;

/// Stable identifier of one navigation mode.
pub type ModeId = String;

/// The single authoritative navigation selection.
///
/// `selected_group` keeps one slot per declared dimension so switching
/// modes does not forget the selection made on another axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    /// Active navigation mode; always one of the enabled catalog modes.
    pub mode: ModeId,
    /// Selected group per dimension; `None` means no selection yet.
    pub selected_group: BTreeMap<GroupDimension, Option<GroupId>>,
    /// Selected unit, if any.
    pub selected_unit: Option<UnitId>,
}

impl NavigationState {
    /// Creates the initial state for `mode` with no selections.
    pub fn initial(mode: ModeId) -> Self {
        let selected_group = GroupDimension::ALL
            .iter()
            .map(|dimension| (*dimension, None))
            .collect();
        Self {
            mode,
            selected_group,
            selected_unit: None,
        }
    }

    /// Returns the selected group under one dimension.
    pub fn group_in(&self, dimension: GroupDimension) -> Option<&GroupId> {
        self.selected_group
            .get(&dimension)
            .and_then(|slot| slot.as_ref())
    }
}
