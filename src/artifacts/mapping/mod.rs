//! Origin to destination path mapping
//!
//! Ordered prefix rules translate an origin path into a destination candidate.
//! When the candidate does not exist, the destination prefix directory is searched
//! for a file with the same translated name.

pub mod path_mapper;
