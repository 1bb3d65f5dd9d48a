//! Core domain models for gateway auditing

pub mod entities;
pub mod value_objects;
