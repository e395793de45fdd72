//! Implementation-status checks against destination source text
//!
//! Each symbol kind has a small set of destination-language declaration patterns.
//! A symbol counts as implemented when any of them matches, ignoring case.

pub mod checker;
