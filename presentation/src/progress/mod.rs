//! Progress reporters for suite runs

pub mod reporter;
