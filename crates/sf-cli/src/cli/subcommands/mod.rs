pub mod report;
pub mod site;

pub use report::ReportCommands;
pub use site::SiteCommands;
