use thiserror::Error;

/// Banner text for a non-2xx response whose body carries no `error` field.
pub const GENERIC_SERVER_ERROR: &str = "An error occurred.";

/// Banner text for every failure that is not reported by the server itself.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// A response body could not be read or decoded.
    #[error("Invalid response format: {0}")]
    Parse(String),

    /// A successful response did not name the file it carries.
    #[error("Response has no usable Content-Disposition filename")]
    MissingFilename,

    /// The server rejected the submission and said why.
    #[error("Server error: {0}")]
    Server(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl DownloadError {
    /// Text shown in the error banner. Only server-reported messages reach the user verbatim.
    pub fn user_message(&self) -> String {
        match self {
            DownloadError::Server(message) => message.clone(),
            _ => UNEXPECTED_ERROR.to_string(),
        }
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DownloadError::Parse(err.to_string())
        } else {
            DownloadError::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        DownloadError::Io(err.to_string())
    }
}
