//! Network participants discovered from the service registry.

pub mod entities;
pub mod version;

pub use entities::{Participant, Registry};
pub use version::{major_minor, version_matches};
