//! # ReqNest SDK
//!
//! Client SDK for schema-generated REST resources.
//!
//! This crate contains:
//! - The resource client for the five generated CRUD endpoints
//! - Schema loading and sample payload generation
//! - The bounded per-endpoint call log
//! - HTTP plumbing, configuration loading, and session storage
//!
//! ## Architecture
//! - Pure data shapes live in `reqnest-domain`
//! - Depends on `reqnest-domain` and `reqnest-common`
//! - Contains all "impure" code (network I/O, filesystem, clocks)

pub mod api;
pub mod config;
pub mod http;
pub mod log;
pub mod schema;
pub mod session;

// Re-export commonly used items
pub use api::{ClientError, ResourceCall, ResourceClient, ResourceClientBuilder};
pub use config::SdkConfig;
pub use http::HttpClient;
pub use log::CallLog;
pub use schema::{default_sample, SampleGenerator, SchemaError, SchemaLoader};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
