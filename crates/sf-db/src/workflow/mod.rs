//! The report workflow engine.
//!
//! - [`guard`]: the version-checked write path and `update_if_version_matches`
//! - [`transition`]: `advance` and `reject`, routed through the same write path
//! - [`cascade`]: atomic delete of a site and its dependents
//! - [`steps`]: ordered multi-step batches with compensation

pub mod cascade;
pub mod guard;
pub mod steps;
pub mod transition;
