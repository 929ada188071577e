//! Domain constants shared across the SDK

/// Default request timeout, in seconds, for every generated-endpoint call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Maximum number of call records retained per endpoint.
pub const CALL_LOG_CAPACITY: usize = 10;

/// Property name used to identify which record an update or delete targets
/// when the caller does not choose one.
pub const DEFAULT_MATCH_FIELD: &str = "id";

/// Path prefix for generated data endpoints.
pub const DATA_PATH_PREFIX: &str = "/data";

/// Path prefix for schema documents.
pub const SCHEMA_PATH_PREFIX: &str = "/apis";

/// Path of the backend sample-generation service.
pub const GENERATE_SAMPLE_PATH: &str = "/api/schema/generate-test-data";

/// Rate-limit response headers. Lookups are case-insensitive; these are the
/// canonical lowercase forms.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// See [`RATE_LIMIT_REMAINING_HEADER`].
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
/// See [`RATE_LIMIT_REMAINING_HEADER`].
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";
