//! Transport error types.

/// Maximum number of body characters kept in error messages.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 500;

/// Errors from a single upstream call.
///
/// Never retried; the cache and query layers pass these through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Network failure or timeout. The request URL is stripped so the
    /// access key never ends up in messages or logs.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Invalid or missing access key
    #[error("unauthorized: check AVIATIONSTACK_API_KEY")]
    Unauthorized,

    /// Rate limited or monthly quota exhausted
    #[error("rate limited by aviation API")]
    RateLimited,

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not valid JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The HTTP client could not be constructed
    #[error("client setup failed: {0}")]
    Build(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Http(err.without_url())
    }
}

/// Truncate an upstream body for inclusion in an error.
pub(crate) fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
