pub mod audit;
pub mod dispatch;
pub mod init;
pub mod report;
pub mod schema;
pub mod shared;
pub mod site;
pub mod steps;
