//! Error types for qm-events sinks.

use thiserror::Error;

/// Errors that can occur when writing the event stream to a sink.
#[derive(Debug, Error)]
pub enum EventsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, EventsError>`.
pub type EventsResult<T> = Result<T, EventsError>;
