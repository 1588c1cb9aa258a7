//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: identifier and text helpers

pub mod error;
pub mod string;
