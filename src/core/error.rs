use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum YhError {
    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// Cookie or crumb acquisition failed.
    #[error("Auth error: {0}")]
    Auth(String),

    /// The data received was in an unexpected format.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    /// The provider answered 404 for this symbol's download.
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    /// Invalid caller-supplied parameters (empty or duplicate symbol list, blank symbol).
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// An invalid date range was provided (start must not be after end or in the future).
    #[error("invalid date range: start must not be after end or in the future")]
    InvalidDates,
}
