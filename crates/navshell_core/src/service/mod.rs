//! Orchestration facade.
//!
//! # Responsibility
//! - Wire registry, mode catalog, ordering overrides, state machine,
//!   arbitration, link resolution and session persistence into one
//!   entry point for the shell.
//!
//! # See also
//! - `state::machine` for the transition rules this facade drives.

pub mod nav_service;
