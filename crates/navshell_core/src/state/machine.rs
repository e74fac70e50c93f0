//! Single-writer navigation state machine.

use crate::model::nav::NavigationState;
use crate::model::unit::{GroupDimension, GroupId, UnitId};
use crate::registry::units::UnitRegistry;
use crate::state::mode::{ModeCatalog, ModeDescriptor};
use log::{debug, info};
use std::fmt::{Display, Formatter};

/// Result of one proposed transition.
///
/// Rejections are ordinary data: resolution issues are absorbed here and
/// must never abort a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The state changed.
    Applied,
    /// The proposal equals the current state; nothing to do.
    Unchanged,
    /// The proposal is not valid right now; state untouched.
    Rejected(RejectReason),
}

impl TransitionOutcome {
    /// Returns whether this outcome committed a state change.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Why a proposed transition was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The mode id names no declared mode.
    UnknownMode(String),
    /// The mode is declared but not on the enabled allow-list.
    ModeDisabled(String),
    /// The dimension is not governed by the active mode.
    DimensionNotActive(GroupDimension),
    /// The group id names no declared group on that dimension.
    UnknownGroup {
        dimension: GroupDimension,
        group_id: GroupId,
    },
    /// The unit id names no loaded unit.
    UnknownUnit(UnitId),
    /// The unit exists but is not reachable under the current
    /// mode + group containment policy.
    Unreachable(UnitId),
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMode(id) => write!(f, "unknown mode: {id}"),
            Self::ModeDisabled(id) => write!(f, "mode is disabled: {id}"),
            Self::DimensionNotActive(dimension) => {
                write!(f, "dimension not governed by active mode: {}", dimension.as_str())
            }
            Self::UnknownGroup {
                dimension,
                group_id,
            } => write!(f, "unknown {} group: {group_id}", dimension.as_str()),
            Self::UnknownUnit(id) => write!(f, "unknown unit: {id}"),
            Self::Unreachable(id) => write!(f, "unit not reachable in current context: {id}"),
        }
    }
}

/// Owner and sole mutator of `NavigationState`.
///
/// Catalog and registry are passed into each transition instead of being
/// owned here; the machine stays a pure state holder and the execution
/// model stays single-writer by function-call discipline.
#[derive(Debug, Clone)]
pub struct NavStateMachine {
    state: NavigationState,
}

impl NavStateMachine {
    /// Creates the machine in the catalog's default initial state: first
    /// enabled mode, no group, no unit.
    pub fn new(catalog: &ModeCatalog) -> Self {
        Self {
            state: NavigationState::initial(catalog.default_mode().id.clone()),
        }
    }

    /// Read access for render surfaces and collaborators.
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Resets to the default initial state.
    pub fn reset(&mut self, catalog: &ModeCatalog) {
        self.state = NavigationState::initial(catalog.default_mode().id.clone());
        info!("event=nav_reset module=state status=ok mode={}", self.state.mode);
    }

    /// Switches the active mode.
    ///
    /// The selected unit survives only when still valid under the new
    /// mode's containment policy; otherwise it is cleared, never left
    /// dangling. Group selections on other axes are kept.
    pub fn set_mode(
        &mut self,
        catalog: &ModeCatalog,
        registry: &UnitRegistry,
        mode_id: &str,
    ) -> TransitionOutcome {
        let mode = match catalog.mode(mode_id) {
            Some(mode) => mode,
            None => return self.reject(RejectReason::UnknownMode(mode_id.to_string())),
        };
        if !mode.enabled {
            return self.reject(RejectReason::ModeDisabled(mode_id.to_string()));
        }
        if self.state.mode == mode.id {
            return TransitionOutcome::Unchanged;
        }

        self.state.mode = mode.id.clone();
        if let Some(unit_id) = self.state.selected_unit.clone() {
            if !self.unit_valid_under(registry, mode, &unit_id) {
                self.state.selected_unit = None;
            }
        }
        info!(
            "event=nav_transition module=state op=set_mode status=applied mode={}",
            self.state.mode
        );
        TransitionOutcome::Applied
    }

    /// Selects a group on the active mode's axis.
    ///
    /// Under strict containment a selected unit that is not a member of the
    /// new group is cleared.
    pub fn select_group(
        &mut self,
        catalog: &ModeCatalog,
        registry: &UnitRegistry,
        dimension: GroupDimension,
        group_id: &str,
    ) -> TransitionOutcome {
        let mode = self.active_mode(catalog);
        if mode.dimension != Some(dimension) {
            return self.reject(RejectReason::DimensionNotActive(dimension));
        }
        if registry.group(dimension, group_id).is_none() {
            return self.reject(RejectReason::UnknownGroup {
                dimension,
                group_id: group_id.to_string(),
            });
        }
        if self.state.group_in(dimension).map(String::as_str) == Some(group_id) {
            return TransitionOutcome::Unchanged;
        }

        self.state
            .selected_group
            .insert(dimension, Some(group_id.to_string()));
        if mode.policy.strict_containment {
            let stale = self
                .state
                .selected_unit
                .as_ref()
                .and_then(|unit_id| registry.unit(unit_id))
                .map(|unit| !unit.is_member(dimension, group_id))
                .unwrap_or(false);
            if stale {
                self.state.selected_unit = None;
            }
        }
        info!(
            "event=nav_transition module=state op=select_group status=applied dimension={} group={}",
            dimension.as_str(),
            group_id
        );
        TransitionOutcome::Applied
    }

    /// Selects a unit, if reachable under the current mode + group context.
    ///
    /// Unreachable selections are reported no-ops; the state is untouched.
    pub fn select_unit(
        &mut self,
        catalog: &ModeCatalog,
        registry: &UnitRegistry,
        unit_id: &str,
    ) -> TransitionOutcome {
        if !registry.contains(unit_id) {
            return self.reject(RejectReason::UnknownUnit(unit_id.to_string()));
        }
        let mode = self.active_mode(catalog);
        if !self.unit_valid_under(registry, mode, unit_id) {
            return self.reject(RejectReason::Unreachable(unit_id.to_string()));
        }
        if self.state.selected_unit.as_deref() == Some(unit_id) {
            return TransitionOutcome::Unchanged;
        }

        self.state.selected_unit = Some(unit_id.to_string());
        info!(
            "event=nav_transition module=state op=select_unit status=applied unit={}",
            unit_id
        );
        TransitionOutcome::Applied
    }

    /// Adopts a restored state if it fully validates against the current
    /// catalog and registry. On any failure the machine keeps its current
    /// state and reports `false`.
    pub fn restore(
        &mut self,
        catalog: &ModeCatalog,
        registry: &UnitRegistry,
        candidate: NavigationState,
    ) -> bool {
        if !catalog.is_enabled(&candidate.mode) {
            return false;
        }
        for dimension in GroupDimension::ALL {
            if let Some(Some(group_id)) = candidate.selected_group.get(dimension) {
                if registry.group(*dimension, group_id).is_none() {
                    return false;
                }
            }
        }
        if let Some(unit_id) = &candidate.selected_unit {
            if !registry.contains(unit_id) {
                return false;
            }
            let mode = catalog
                .mode(&candidate.mode)
                .expect("enabled mode is declared");
            let valid = match mode.dimension {
                Some(dimension) if mode.policy.strict_containment => {
                    match candidate.selected_group.get(&dimension) {
                        Some(Some(group_id)) => registry
                            .unit(unit_id)
                            .is_some_and(|unit| unit.is_member(dimension, group_id)),
                        _ => !mode.policy.requires_group,
                    }
                }
                _ => true,
            };
            if !valid {
                return false;
            }
        }

        self.state = candidate;
        info!(
            "event=nav_restore module=state status=ok mode={} unit={}",
            self.state.mode,
            self.state.selected_unit.as_deref().unwrap_or("-")
        );
        true
    }

    fn active_mode<'a>(&self, catalog: &'a ModeCatalog) -> &'a ModeDescriptor {
        // The mode invariant guarantees this lookup; falling back to the
        // default keeps the machine total even against a swapped catalog.
        catalog
            .mode(&self.state.mode)
            .unwrap_or_else(|| catalog.default_mode())
    }

    fn unit_valid_under(
        &self,
        registry: &UnitRegistry,
        mode: &ModeDescriptor,
        unit_id: &str,
    ) -> bool {
        let Some(unit) = registry.unit(unit_id) else {
            return false;
        };
        let Some(dimension) = mode.dimension else {
            return true;
        };
        if !mode.policy.strict_containment {
            return true;
        }
        match self.state.group_in(dimension) {
            Some(group_id) => unit.is_member(dimension, group_id),
            None => !mode.policy.requires_group,
        }
    }

    fn reject(&self, reason: RejectReason) -> TransitionOutcome {
        debug!(
            "event=nav_transition module=state status=rejected reason=\"{}\"",
            reason
        );
        TransitionOutcome::Rejected(reason)
    }
}
