//! Symbolic unit-link resolution.
//!
//! # Responsibility
//! - Turn an `open unit X` request from anywhere in the UI into regular
//!   state-machine transitions under the active mode's policy.
//!
//! # Invariants
//! - Unresolvable links are inert: no visible error, no state change.
//! - Links never partially apply; a group switch without the unit landing
//!   is rolled back.
//! - All mutation flows through the same transitions as direct clicks.

use crate::model::unit::{GroupId, UnitId};
use crate::registry::units::UnitRegistry;
use crate::state::machine::NavStateMachine;
use crate::state::mode::ModeCatalog;
use log::{debug, info};
use std::fmt::{Display, Formatter};

/// Result of one link resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The target unit is now selected.
    Opened {
        unit_id: UnitId,
        /// Group the resolver had to switch to, when the mode allowed it.
        switched_group: Option<GroupId>,
    },
    /// The target unit was already the active selection.
    AlreadyOpen(UnitId),
    /// The link was absorbed without touching state.
    Ignored(LinkIgnoreReason),
}

/// Why a link was absorbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkIgnoreReason {
    /// The target names no loaded unit.
    UnknownUnit(UnitId),
    /// The target exists but the active mode forbids reaching it from the
    /// current context.
    Unreachable(UnitId),
}

impl Display for LinkIgnoreReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownUnit(id) => write!(f, "link target is unknown: {id}"),
            Self::Unreachable(id) => write!(f, "link target not reachable in current mode: {id}"),
        }
    }
}

/// Resolves one symbolic link against the machine.
///
/// Policy by active mode: a target outside the selected group switches the
/// group only when the mode's policy permits it (deterministically to the
/// lexically-first group containing the target); otherwise the link is a
/// reported no-op.
pub fn resolve_link(
    machine: &mut NavStateMachine,
    catalog: &ModeCatalog,
    registry: &UnitRegistry,
    target_id: &str,
) -> LinkOutcome {
    let Some(unit) = registry.unit(target_id) else {
        debug!(
            "event=link_resolve module=link status=ignored reason=unknown_unit target={}",
            target_id
        );
        return LinkOutcome::Ignored(LinkIgnoreReason::UnknownUnit(target_id.to_string()));
    };

    if machine.state().selected_unit.as_deref() == Some(target_id) {
        return LinkOutcome::AlreadyOpen(target_id.to_string());
    }

    let mode = catalog
        .mode(&machine.state().mode)
        .unwrap_or_else(|| catalog.default_mode());

    let switch_to: Option<GroupId> = match mode.dimension {
        None => None,
        Some(dimension) => {
            let in_selected_group = machine
                .state()
                .group_in(dimension)
                .is_some_and(|group_id| unit.is_member(dimension, group_id));
            if in_selected_group {
                None
            } else if mode.policy.allow_group_switch {
                match unit.groups_in(dimension).next().cloned() {
                    Some(group_id) => Some(group_id),
                    // Unit has no group on this axis; nothing to switch to.
                    None => {
                        return ignored_unreachable(target_id);
                    }
                }
            } else {
                return ignored_unreachable(target_id);
            }
        }
    };

    // Snapshot so a rejected follow-up transition cannot leave a half
    // applied link behind.
    let snapshot = machine.state().clone();

    if let Some(group_id) = &switch_to {
        let dimension = mode
            .dimension
            .expect("group switch only planned on a grouped mode");
        if !machine
            .select_group(catalog, registry, dimension, group_id)
            .is_applied()
        {
            return ignored_unreachable(target_id);
        }
    }

    let selected = machine.select_unit(catalog, registry, target_id);
    if !selected.is_applied() {
        if switch_to.is_some() {
            machine.restore(catalog, registry, snapshot);
        }
        return ignored_unreachable(target_id);
    }

    info!(
        "event=link_resolve module=link status=opened target={} switched_group={}",
        target_id,
        switch_to.as_deref().unwrap_or("-")
    );
    LinkOutcome::Opened {
        unit_id: target_id.to_string(),
        switched_group: switch_to,
    }
}

fn ignored_unreachable(target_id: &str) -> LinkOutcome {
    debug!(
        "event=link_resolve module=link status=ignored reason=unreachable target={}",
        target_id
    );
    LinkOutcome::Ignored(LinkIgnoreReason::Unreachable(target_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{resolve_link, LinkIgnoreReason, LinkOutcome};
    use crate::model::unit::{Group, GroupDimension};
    use crate::registry::manifest::{GroupCatalog, UnitManifest};
    use crate::registry::units::UnitRegistry;
    use crate::state::machine::NavStateMachine;
    use crate::state::mode::ModeCatalog;

    fn registry() -> UnitRegistry {
        let catalog = GroupCatalog {
            workpackages: vec![
                Group {
                    id: "wp4".to_string(),
                    label: "WP4".to_string(),
                },
                Group {
                    id: "wp5".to_string(),
                    label: "WP5".to_string(),
                },
            ],
            categories: vec![
                Group {
                    id: "cat-awareness".to_string(),
                    label: "Cable System Awareness".to_string(),
                },
                Group {
                    id: "cat-monitoring".to_string(),
                    label: "Monitoring & Analytics".to_string(),
                },
            ],
        };
        let manifests = vec![
            manifest("svc-a", &["wp4"], &["cat-monitoring"]),
            manifest("svc-b", &["wp5"], &["cat-awareness"]),
            manifest("svc-c", &["wp5", "wp4"], &[]),
        ];
        UnitRegistry::load(catalog, manifests).expect("registry load")
    }

    fn manifest(id: &str, workpackages: &[&str], categories: &[&str]) -> UnitManifest {
        UnitManifest {
            id: id.to_string(),
            label: format!("Unit {id}"),
            workpackages: workpackages.iter().map(|g| g.to_string()).collect(),
            categories: categories.iter().map(|g| g.to_string()).collect(),
            order: None,
            version: None,
            owner: None,
            status: None,
        }
    }

    #[test]
    fn unknown_target_leaves_state_untouched() {
        let catalog = ModeCatalog::baseline();
        let registry = registry();
        let mut machine = NavStateMachine::new(&catalog);
        machine.select_group(&catalog, &registry, GroupDimension::WorkPackage, "wp4");
        let before = machine.state().clone();

        let outcome = resolve_link(&mut machine, &catalog, &registry, "svc-missing");
        assert_eq!(
            outcome,
            LinkOutcome::Ignored(LinkIgnoreReason::UnknownUnit("svc-missing".to_string()))
        );
        assert_eq!(machine.state(), &before);
    }

    #[test]
    fn link_in_selected_group_opens_without_switch() {
        let catalog = ModeCatalog::baseline();
        let registry = registry();
        let mut machine = NavStateMachine::new(&catalog);
        machine.select_group(&catalog, &registry, GroupDimension::WorkPackage, "wp4");

        let outcome = resolve_link(&mut machine, &catalog, &registry, "svc-a");
        assert_eq!(
            outcome,
            LinkOutcome::Opened {
                unit_id: "svc-a".to_string(),
                switched_group: None,
            }
        );
        assert_eq!(machine.state().selected_unit, Some("svc-a".to_string()));
    }

    #[test]
    fn group_switch_mode_teleports_to_first_containing_group() {
        let catalog = ModeCatalog::baseline();
        let registry = registry();
        let mut machine = NavStateMachine::new(&catalog);
        machine.select_group(&catalog, &registry, GroupDimension::WorkPackage, "wp5");

        // svc-a lives only in wp4; by_work_package allows switching.
        let outcome = resolve_link(&mut machine, &catalog, &registry, "svc-a");
        assert_eq!(
            outcome,
            LinkOutcome::Opened {
                unit_id: "svc-a".to_string(),
                switched_group: Some("wp4".to_string()),
            }
        );
        assert_eq!(
            machine.state().group_in(GroupDimension::WorkPackage),
            Some(&"wp4".to_string())
        );
    }

    #[test]
    fn multi_group_unit_switches_to_lexically_first_group() {
        let catalog = ModeCatalog::baseline();
        let registry = registry();
        let mut machine = NavStateMachine::new(&catalog);

        // No work-package selected yet; svc-c lives in wp4 and wp5, so the
        // resolver lands on the lexically-first one.
        let outcome = resolve_link(&mut machine, &catalog, &registry, "svc-c");
        assert_eq!(
            outcome,
            LinkOutcome::Opened {
                unit_id: "svc-c".to_string(),
                switched_group: Some("wp4".to_string()),
            }
        );

        // From a group the unit already belongs to, no switch happens.
        let mut other = NavStateMachine::new(&catalog);
        other.select_group(&catalog, &registry, GroupDimension::WorkPackage, "wp5");
        let outcome = resolve_link(&mut other, &catalog, &registry, "svc-c");
        assert_eq!(
            outcome,
            LinkOutcome::Opened {
                unit_id: "svc-c".to_string(),
                switched_group: None,
            }
        );
    }

    #[test]
    fn strict_mode_refuses_to_teleport() {
        let catalog = ModeCatalog::baseline();
        let registry = registry();
        let mut machine = NavStateMachine::new(&catalog);
        machine.set_mode(&catalog, &registry, "by_category");
        machine.select_group(&catalog, &registry, GroupDimension::Category, "cat-monitoring");
        let before = machine.state().clone();

        // svc-b lives in cat-awareness; by_category forbids group switches.
        let outcome = resolve_link(&mut machine, &catalog, &registry, "svc-b");
        assert_eq!(
            outcome,
            LinkOutcome::Ignored(LinkIgnoreReason::Unreachable("svc-b".to_string()))
        );
        assert_eq!(machine.state(), &before);
    }

    #[test]
    fn link_to_active_unit_reports_already_open() {
        let catalog = ModeCatalog::baseline();
        let registry = registry();
        let mut machine = NavStateMachine::new(&catalog);
        machine.select_group(&catalog, &registry, GroupDimension::WorkPackage, "wp4");
        machine.select_unit(&catalog, &registry, "svc-a");

        let outcome = resolve_link(&mut machine, &catalog, &registry, "svc-a");
        assert_eq!(outcome, LinkOutcome::AlreadyOpen("svc-a".to_string()));
    }
}
