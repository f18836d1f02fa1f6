/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Response body was not JSON or did not carry generated text.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// Every attempt failed; carries the error of the final attempt.
    #[error("gave up after {attempts} attempts: {last_error}")]
    RetryExhausted {
        /// Total number of calls made, including the initial one.
        attempts: usize,
        last_error: Box<GeminiError>,
    },
    /// The caller cancelled the request before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl GeminiError {
    /// Short, stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GeminiError::Transport(_) => "transport",
            GeminiError::Http { .. } => "http",
            GeminiError::MalformedResponse(_) => "malformed_response",
            GeminiError::RetryExhausted { .. } => "retry_exhausted",
            GeminiError::Cancelled => "cancelled",
        }
    }

    /// Returns `true` for failures of a single attempt that the retry loop
    /// absorbs. Terminal variants return `false`.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeminiError::Transport(_) | GeminiError::Http { .. } | GeminiError::MalformedResponse(_)
        )
    }
}
