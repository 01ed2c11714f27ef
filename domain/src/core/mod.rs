//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] - selectable Claude models
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;
