//! Per-commit results and the porting suggestions derived from them

pub mod commit_analysis;
pub mod suggestion;
