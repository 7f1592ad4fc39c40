use thiserror::Error;

/// Domain-specific errors for the lesson scheduler
#[derive(Error, Debug)]
pub enum SchedulerError {
    // Input/Parse errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in '{file}': {message}")]
    JsonParse { file: String, message: String },

    // Lookup/authorization errors
    #[error("Schedule '{id}' not found")]
    ScheduleNotFound { id: String },

    #[error("Teacher '{teacher_id}' is not authorized for schedule '{schedule_id}'")]
    NotAuthorized { teacher_id: i64, schedule_id: i64 },

    // Grid construction errors
    #[error("Cannot infer slot length: lesson lengths differ ({lengths:?}); pass slot_minutes explicitly")]
    AmbiguousSlotLength { lengths: Vec<u32> },

    #[error("Invalid slot granularity: {0}")]
    InvalidSlotGranularity(String),

    #[error("Buffer must be non-negative, got {minutes}")]
    InvalidBuffer { minutes: i64 },

    // Solver errors
    #[error("Flow invariant violated: {0}")]
    InternalInvariantViolation(String),
}

/// Use anyhow::Result at application boundaries
pub type Result<T> = anyhow::Result<T>;
