//! # sf-core
//!
//! Core types for the siteflow report workflow.
//!
//! This crate provides the foundational types shared across all siteflow crates:
//! - Entity structs (daily reports, sites, worker assignments, documents, audit entries)
//! - Status and role enums and the role-gated transition table
//! - Step descriptions for multi-step batches with compensation
//! - The workflow error taxonomy with user-facing messages
//! - The uniform `ActionResult` response shape
//! - Audit payload sub-types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod responses;
pub mod steps;
pub mod transitions;
