use thiserror::Error;

/// Errors produced by the workflow and its components.
///
/// Backend failures (timeout, connection refused) are deliberately *not*
/// a workflow-level outcome: the analyzer node catches them and folds them
/// into the state (`sentiment = error`). The variants below cover input
/// rejection, configuration mistakes, and transport errors as seen by the
/// backend adapter before the node absorbs them.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input rejected by the validation gate before the workflow ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Low-level HTTP transport failure (connection refused, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed at the serde level.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend returned a non-success status code.
    #[error("backend returned HTTP {status}: {body}")]
    HttpError {
        /// HTTP status code (e.g. 404, 500, 503).
        status: u16,
        /// Response body text.
        body: String,
    },

    /// A node tried to write a state field that was already written during
    /// this run. Always a programming error, never a data error.
    #[error("state field '{field}' written more than once in a single run")]
    FieldConflict { field: &'static str },

    /// Invalid configuration detected at build time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::Other(err.to_string())
    }
}

/// Input rejection reasons, surfaced to the host as 4xx-equivalents.
///
/// Produced only by [`validate`](crate::validation::validate), always before
/// any node runs, and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The trimmed input text is empty.
    #[error("Input text cannot be empty")]
    EmptyInput,

    /// The trimmed input is shorter than the configured minimum.
    #[error("Input text too short: {actual} characters (minimum {min})")]
    TooShort { actual: usize, min: usize },

    /// The input exceeds the configured maximum length.
    #[error("Input text too long: {actual} characters (maximum {max})")]
    TooLong { actual: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
