//! Entity structs for siteflow domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `sf-db/migrations`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema validation.

mod audit;
mod report;
mod site;

pub use audit::AuditEntry;
pub use report::DailyReport;
pub use site::{Site, SiteDocument, SiteWorker};
