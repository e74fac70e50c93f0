//! Session persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the versioned persisted navigation record and its store
//!   contract.
//! - Isolate SQL details from the orchestration service.
//!
//! # Invariants
//! - Records failing the schema-version or decode checks are discarded to
//!   the default initial state, never surfaced as session-fatal errors.

pub mod session_repo;
