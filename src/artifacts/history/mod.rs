//! Origin history data
//!
//! - `commit`: commit metadata and per-file change status
//! - `log_format`: the `git log` record format and its parser
//! - `since`: "since" time expressions for history scans
//! - `status_filter`: selection of file statuses to analyse

pub mod commit;
pub mod log_format;
pub mod since;
pub mod status_filter;
