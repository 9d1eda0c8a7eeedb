use thiserror::Error;

/// Validation and contract errors exposed by `curio-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("search text cannot be empty")]
    EmptyQuery,
    #[error("search text length {len} exceeds max {max}")]
    QueryTooLong { len: usize, max: usize },
    #[error("page size {value} is outside 1..={max}")]
    PageSizeOutOfRange { value: usize, max: usize },
    #[error("page numbers are 1-based")]
    ZeroPage,

    #[error("artwork id must be a positive integer: {value}")]
    InvalidArtworkId { value: i64 },
    #[error("artwork image id cannot be empty")]
    EmptyImageId,

    #[error("invalid source '{value}', expected one of artic, fixture")]
    InvalidSource { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("hydration concurrency must be greater than zero")]
    ZeroConcurrency,

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
