//! External integrations: the gateway API client and report output

pub mod gateway;
pub mod report;
