//! Change classification
//!
//! - `keywords`: whole-token, case-insensitive keyword sets
//! - `classifier`: change-type precedence and the keyword relevance rule
//! - `recommendation`: whether a classified change deserves a porting task

pub mod classifier;
pub mod keywords;
pub mod recommendation;
