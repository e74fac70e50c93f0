//! Navigation orchestration core for the operator console shell.
//! This crate is the single source of truth for navigation invariants.

pub mod arbitration;
pub mod db;
pub mod link;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod registry;
pub mod repo;
pub mod search;
pub mod service;
pub mod state;

pub use arbitration::{arbitrate, RawActivityEvent, SelectionIntent, SelectionTarget};
pub use link::{LinkIgnoreReason, LinkOutcome};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::nav::{ModeId, NavigationState};
pub use model::unit::{Group, GroupDimension, GroupId, Unit, UnitId};
pub use ordering::{OrderOverrides, OrderRule, OrderScope};
pub use registry::manifest::{
    baseline_group_catalog, baseline_manifests, manifests_from_json, GroupCatalog,
    ManifestValidationError, UnitManifest,
};
pub use registry::units::{RegistryError, RegistryResult, UnitRegistry};
pub use repo::session_repo::{
    PersistedNavState, RepoError, RepoResult, SessionRepository, SqliteSessionRepository,
    NAV_STATE_SCHEMA_VERSION,
};
pub use service::nav_service::NavService;
pub use state::machine::{NavStateMachine, RejectReason, TransitionOutcome};
pub use state::mode::{ContainmentPolicy, ModeCatalog, ModeDescriptor, MODE_LABEL_FALLBACK};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
