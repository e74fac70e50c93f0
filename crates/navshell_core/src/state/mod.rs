//! Navigation mode catalog and state machine.
//!
//! # Responsibility
//! - Declare the available navigation modes with their containment
//!   policies and enabled flags.
//! - Own and mutate the single authoritative `NavigationState` through
//!   explicit transition operations.
//!
//! # Invariants
//! - `NavigationState.mode` only ever holds an enabled catalog mode.
//! - Transitions never leave a dangling group or unit selection.
//! - Rejections are reported as data; transition paths never panic.

pub mod machine;
pub mod mode;
