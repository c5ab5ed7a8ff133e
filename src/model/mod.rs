// fhir-fuzzing/src/model/mod.rs
//! Typed FHIR R4 model subset the engine mutates
//!
//! Optional fields are `Option<T>`, repeated fields are `Vec<T>`. The
//! mutators work on these directly; there is no reflection layer.

pub mod codes;
pub mod datatypes;
pub mod resources;

pub use codes::*;
pub use datatypes::*;
pub use resources::*;
