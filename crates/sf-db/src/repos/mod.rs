//! Repository implementations as `impl WorkflowService` blocks.
//!
//! Each module adds the reads and plain writes for one table family. Status
//! changes, version-checked updates, and multi-table deletes live in
//! [`crate::workflow`].

pub mod audit;
pub mod report;
pub mod site;
