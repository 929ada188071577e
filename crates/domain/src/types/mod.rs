//! Domain type definitions

pub mod call;
pub mod endpoint;
pub mod rate_limit;
pub mod schema;

pub use call::{CallOutcome, CallRecord, HttpResult, RequestInfo, TransportFailure};
pub use endpoint::{Endpoint, EndpointDescriptor};
pub use rate_limit::RateLimitStatus;
pub use schema::{PropertySpec, SchemaDocument};
