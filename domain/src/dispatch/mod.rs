//! Dispatch records: raw participant responses and per-payload outcomes.

pub mod record;
pub mod response;

pub use record::{DispatchRecord, MISSING_PK, PARENT_PK, PayloadOutcome};
pub use response::{
    AgentResponse, ResultsOutcome, STATUS_NO_RESPONSE, STATUS_TIMED_OUT, empty_results,
};
