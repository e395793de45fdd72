//! Unified diff text of a single changed file
//!
//! The analysis never looks at whole files on the origin side, only at the
//! added and removed lines a commit introduces for one path.

pub mod diff_text;
