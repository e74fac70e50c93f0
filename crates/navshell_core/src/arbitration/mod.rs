//! Selection arbitration over re-rendered control activity.
//!
//! # Responsibility
//! - Distill one batch of raw activity signals from regenerated selection
//!   controls into at most one genuine user intent.
//!
//! # Invariants
//! - A batch whose timestamps are all absent is a pure re-render and
//!   produces no intent; ambiguity is the defined case, not an error.
//! - Within one batch the maximum timestamp wins; declaration order breaks
//!   ties. Across batches, arrival order rules.
//! - An intent equal to the already-active value is suppressed, so double
//!   application cannot occur.

use crate::model::nav::NavigationState;
use crate::model::unit::{GroupDimension, GroupId, UnitId};

/// What one selection control points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionTarget {
    /// A mode option in the orchestrator panel.
    Mode(String),
    /// A group button on one navigation bar.
    Group(GroupDimension, GroupId),
    /// A unit button on the tool bar.
    Unit(UnitId),
}

/// One raw activity signal from a rendered control.
///
/// `last_activity_ms` is absent on freshly (re)created controls and is
/// populated only by an actual pointer action; that distinction is the
/// whole arbitration contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawActivityEvent {
    pub target: SelectionTarget,
    pub last_activity_ms: Option<i64>,
}

impl RawActivityEvent {
    pub fn new(target: SelectionTarget, last_activity_ms: Option<i64>) -> Self {
        Self {
            target,
            last_activity_ms,
        }
    }
}

/// One genuine user intent, ready for the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionIntent {
    pub target: SelectionTarget,
}

/// Arbitrates one render cycle's activity batch.
///
/// Returns `None` for pure re-renders and for intents that would re-apply
/// the already-active value.
pub fn arbitrate(batch: &[RawActivityEvent], current: &NavigationState) -> Option<SelectionIntent> {
    let mut winner: Option<(&RawActivityEvent, i64)> = None;
    for event in batch {
        let Some(stamp) = event.last_activity_ms else {
            continue;
        };
        // Strictly greater keeps the first-declared event on ties.
        if winner.map_or(true, |(_, best)| stamp > best) {
            winner = Some((event, stamp));
        }
    }

    let (event, _) = winner?;
    if is_already_active(&event.target, current) {
        return None;
    }
    Some(SelectionIntent {
        target: event.target.clone(),
    })
}

fn is_already_active(target: &SelectionTarget, current: &NavigationState) -> bool {
    match target {
        SelectionTarget::Mode(mode_id) => current.mode == *mode_id,
        SelectionTarget::Group(dimension, group_id) => {
            current.group_in(*dimension) == Some(group_id)
        }
        SelectionTarget::Unit(unit_id) => current.selected_unit.as_ref() == Some(unit_id),
    }
}
