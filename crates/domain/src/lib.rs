//! gitmatch domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `ignore_rules`: Gitignore evaluation for the hashed tree
//! - `usecases`: Directory fingerprinting and history scanning

pub mod ignore_rules;
pub mod model;
pub mod ports;
pub mod usecases;

pub use ignore_rules::{IgnoreRuleSet, RuleParseError};
pub use model::*;
pub use ports::*;
