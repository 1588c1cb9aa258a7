//! Query payloads: structure, content hashing, and generation from assets.

pub mod generator;
pub mod payload;

pub use generator::{AFFECTS, GenerationError, RELATED_TO, TREATS, generate_query};
pub use payload::{
    PayloadHash, QualifierConstraint, QualifierEntry, QueryEdge, QueryGraph, QueryNode, QueryPath,
    QueryPayload,
};
