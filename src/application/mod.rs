//! Audit use cases and services

pub mod audit;
pub mod classifier;
pub mod matcher;
pub mod whitelist;

pub use audit::{AuditError, AuditService};
pub use whitelist::WhitelistIndex;
