use thiserror::Error;

/// Error types that can occur while reading documents, talking to the agent
/// platform or evaluating generated answers.
#[derive(Debug, Error)]
pub enum CvError {
    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Missing or rejected credentials
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Invalid request parameters or format
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Errors returned by a remote provider
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// API response parsing or format error
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),
    /// Filesystem errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Text could not be extracted from a document
    #[error("{0}")]
    Extraction(String),
    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),
    /// Generic error
    #[error("Generic error: {0}")]
    Generic(String),
}

/// Converts reqwest HTTP errors into CvErrors
impl From<reqwest::Error> for CvError {
    fn from(err: reqwest::Error) -> Self {
        CvError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for CvError {
    fn from(err: serde_json::Error) -> Self {
        CvError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

impl From<csv::Error> for CvError {
    fn from(err: csv::Error) -> Self {
        CvError::Csv(err.to_string())
    }
}

impl From<toml::de::Error> for CvError {
    fn from(err: toml::de::Error) -> Self {
        CvError::Config(err.to_string())
    }
}
