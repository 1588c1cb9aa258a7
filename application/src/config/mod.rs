//! Application-level configuration.
//!
//! - [`DispatchParams`]: fan-out concurrency, poll interval, and timeout budgets

pub mod dispatch_params;

pub use dispatch_params::{DEFAULT_HUB_INFORES, DispatchParams};
