//! Metadata registry contracts.
//!
//! This module defines the declarative unit manifest, its validation rules,
//! and the read-only registry built from a validated manifest set. All
//! downstream addressing (ordering, transitions, links, persistence checks)
//! depends on registry lookups, so load failures are fatal at startup.

pub mod manifest;
pub mod units;
