//! Declarative test model: test cases, assets, and their value objects.

pub mod entities;
pub mod value_objects;

pub use entities::{
    Expectation, INFERRED_SETTING, OBJECT_ASPECT_QUALIFIER, OBJECT_DIRECTION_QUALIFIER, PathNode,
    Qualifier, TestAsset, TestCase,
};
pub use value_objects::{Component, Environment, ExpectedOutput, TestObjective};
