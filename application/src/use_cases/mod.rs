//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod dispatch;
pub mod normalize_curies;
pub mod run_suite;
pub mod run_test_case;

#[cfg(test)]
pub(crate) mod test_support;
