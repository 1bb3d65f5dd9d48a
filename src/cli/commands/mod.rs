//! CLI command implementations

pub mod apis;
pub mod scan;
