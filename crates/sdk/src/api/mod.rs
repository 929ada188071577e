//! Resource client for the generated CRUD endpoints
//!
//! Translates a resource name and an operation into exactly one HTTP
//! request against the generated `/data/{name}` routes, and normalizes the
//! result into the shared call-record shape. Status codes are never errors
//! on this path; the caller renders 4xx/5xx outcomes from the record.

pub mod errors;
pub mod input;
pub mod resource;

pub use errors::ClientError;
pub use input::{parse_body_text, parse_header_text};
pub use resource::{ResourceCall, ResourceClient, ResourceClientBuilder};
