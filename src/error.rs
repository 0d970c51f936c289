use thiserror::Error;

/// Main error type for crossword operations
#[derive(Error, Debug)]
pub enum CrosswordError {
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Index error: {0}")]
    Index(#[from] fst::Error),

    #[error("Worker error: {0}")]
    Worker(String),
}

/// Result type alias for crossword operations
pub type Result<T> = std::result::Result<T, CrosswordError>;

impl CrosswordError {
    /// Whether the error was caused by the caller's input rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(self, CrosswordError::InvalidTemplate(_))
    }
}
