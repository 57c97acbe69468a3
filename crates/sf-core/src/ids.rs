//! ID prefix constants.
//!
//! IDs look like `rpt-a3f8b2c1`: a three-letter prefix, a dash, and eight hex
//! characters generated by the database.

pub const PREFIX_SITE: &str = "sit";
pub const PREFIX_REPORT: &str = "rpt";
pub const PREFIX_WORKER_ASSIGNMENT: &str = "swk";
pub const PREFIX_DOCUMENT: &str = "doc";
pub const PREFIX_AUDIT: &str = "aud";
pub const PREFIX_STEP_BATCH: &str = "stp";
/// Rows inserted by the step runner without a caller-supplied id.
pub const PREFIX_ROW: &str = "row";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_SITE,
    PREFIX_REPORT,
    PREFIX_WORKER_ASSIGNMENT,
    PREFIX_DOCUMENT,
    PREFIX_AUDIT,
    PREFIX_STEP_BATCH,
    PREFIX_ROW,
];
