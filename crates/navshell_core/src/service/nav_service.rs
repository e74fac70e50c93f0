//! Navigation orchestration service.
//!
//! # Responsibility
//! - Drive the state machine from arbitrated activity batches and link
//!   requests; persist every committed transition.
//! - Expose the read-only queries render surfaces consume.
//!
//! # Invariants
//! - All state mutation goes through machine transitions; the service
//!   never edits `NavigationState` fields directly.
//! - A failed session write is logged and absorbed; in-memory state always
//!   wins over the store.

use crate::arbitration::{arbitrate, RawActivityEvent, SelectionTarget};
use crate::link::{resolve_link, LinkOutcome};
use crate::model::nav::NavigationState;
use crate::model::unit::{GroupDimension, GroupId, UnitId};
use crate::ordering::{self, OrderOverrides};
use crate::registry::units::UnitRegistry;
use crate::repo::session_repo::{PersistedNavState, SessionRepository};
use crate::search;
use crate::state::machine::{NavStateMachine, TransitionOutcome};
use crate::state::mode::ModeCatalog;
use log::{error, info};

/// Facade over the navigation core.
///
/// Owns every collaborator; the embedding shell holds one value of this
/// type and calls it synchronously from its event loop.
pub struct NavService<R: SessionRepository> {
    registry: UnitRegistry,
    catalog: ModeCatalog,
    overrides: OrderOverrides,
    machine: NavStateMachine,
    session: R,
}

impl<R: SessionRepository> NavService<R> {
    /// Creates the service in the default initial state.
    ///
    /// Persisted state is not read here; call [`NavService::restore`] once
    /// at session start.
    pub fn new(
        registry: UnitRegistry,
        catalog: ModeCatalog,
        overrides: OrderOverrides,
        session: R,
    ) -> Self {
        let machine = NavStateMachine::new(&catalog);
        info!(
            "event=service_init module=service status=ok mode={} units={}",
            machine.state().mode,
            registry.len()
        );
        Self {
            registry,
            catalog,
            overrides,
            machine,
            session,
        }
    }

    /// Restores the persisted session record, if one validates.
    ///
    /// Returns whether a record was adopted. Any failure - transport error,
    /// schema mismatch, undecodable payload, dangling reference - falls
    /// back to the default initial state.
    pub fn restore(&mut self) -> bool {
        let record = match self.session.load() {
            Ok(record) => record,
            Err(err) => {
                error!(
                    "event=session_restore module=service status=error error={}",
                    err
                );
                return false;
            }
        };
        let Some(record) = record else {
            return false;
        };

        let adopted = self
            .machine
            .restore(&self.catalog, &self.registry, record.into_state());
        if !adopted {
            info!("event=session_restore module=service status=discarded reason=invalid_reference");
        }
        adopted
    }

    /// Applies one render cycle's raw activity batch.
    ///
    /// Returns `None` when arbitration discards the batch (pure re-render
    /// or already-active value); otherwise the machine outcome. Committed
    /// transitions are persisted.
    pub fn apply_activity(&mut self, batch: &[RawActivityEvent]) -> Option<TransitionOutcome> {
        let intent = arbitrate(batch, self.machine.state())?;
        let outcome = match intent.target {
            SelectionTarget::Mode(mode_id) => {
                self.machine
                    .set_mode(&self.catalog, &self.registry, &mode_id)
            }
            SelectionTarget::Group(dimension, group_id) => {
                self.apply_group_intent(dimension, &group_id)
            }
            SelectionTarget::Unit(unit_id) => {
                self.machine
                    .select_unit(&self.catalog, &self.registry, &unit_id)
            }
        };
        if outcome.is_applied() {
            self.persist();
        }
        Some(outcome)
    }

    /// Switches the mode programmatically, with the same commit rules as an
    /// arbitrated mode intent.
    pub fn set_mode(&mut self, mode_id: &str) -> TransitionOutcome {
        let outcome = self.machine.set_mode(&self.catalog, &self.registry, mode_id);
        if outcome.is_applied() {
            self.persist();
        }
        outcome
    }

    /// Resolves a symbolic `open unit` request.
    pub fn open_unit(&mut self, target_id: &str) -> LinkOutcome {
        let outcome = resolve_link(&mut self.machine, &self.catalog, &self.registry, target_id);
        if matches!(outcome, LinkOutcome::Opened { .. }) {
            self.persist();
        }
        outcome
    }

    /// Resets to the default initial state and persists the reset.
    pub fn reset(&mut self) {
        self.machine.reset(&self.catalog);
        self.persist();
    }

    fn apply_group_intent(
        &mut self,
        dimension: GroupDimension,
        group_id: &str,
    ) -> TransitionOutcome {
        let outcome = self
            .machine
            .select_group(&self.catalog, &self.registry, dimension, group_id);
        if !outcome.is_applied() {
            return outcome;
        }
        // A fresh group lands on its first resolved unit; empty groups
        // leave the unit selection cleared for the empty-state surface.
        if let Some(unit_id) = ordering::default_unit(
            &self.registry,
            &self.overrides,
            dimension,
            &group_id.to_string(),
        ) {
            self.machine
                .select_unit(&self.catalog, &self.registry, &unit_id);
        }
        outcome
    }

    fn persist(&self) {
        let record = PersistedNavState::capture(self.machine.state());
        if let Err(err) = self.session.save(&record) {
            // Non-fatal: the in-memory state stays authoritative.
            error!(
                "event=session_save module=service status=error error={}",
                err
            );
        }
    }

    /// Current navigation state, read-only.
    pub fn current_selection(&self) -> &NavigationState {
        self.machine.state()
    }

    /// Active mode id.
    pub fn current_mode(&self) -> &str {
        &self.machine.state().mode
    }

    /// Status label of the active mode.
    pub fn current_mode_label(&self) -> &str {
        self.catalog.mode_label(self.current_mode())
    }

    /// Ordered unit list for one navigation context.
    pub fn effective_order(
        &self,
        dimension: GroupDimension,
        group_id: Option<&GroupId>,
    ) -> Vec<UnitId> {
        ordering::resolve(&self.registry, &self.overrides, dimension, group_id)
    }

    /// Visibility predicate: true only for the active unit's panel.
    pub fn visible_unit(&self, unit_id: &str) -> bool {
        self.machine.state().selected_unit.as_deref() == Some(unit_id)
    }

    /// Mode suggestions for one search probe.
    pub fn suggest_modes(&self, query: &str) -> Vec<String> {
        search::filter_modes(&self.catalog, query)
    }

    /// Unit suggestions for one search probe.
    pub fn suggest_units(&self, query: &str) -> Vec<UnitId> {
        search::filter_units(&self.registry, query)
    }

    /// Loaded unit metadata, for navigation-bar renderers.
    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    /// Declared modes, for the orchestrator panel renderer.
    pub fn modes(&self) -> &ModeCatalog {
        &self.catalog
    }
}
