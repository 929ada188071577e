//! Schema loading and sample payload generation
//!
//! The linear pipeline behind every tester page: fetch the schema for a
//! named resource, derive a starting payload from it, let the user edit,
//! send. This module covers the first two stages.

pub mod loader;
pub mod sample;

pub use loader::{SchemaError, SchemaLoader};
pub use sample::{default_sample, SampleGenerator};
