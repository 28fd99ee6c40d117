use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during JSON serialization or deserialization
    #[error("json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    /// Error when user input fails.
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Error when a Git command exits unsuccessfully
    #[error("git command failed: {0}")]
    GitCommand(String),
    /// user.name or user.email is unset
    #[error("git not configured")]
    GitNotConfigured,
    /// Error during input validation.
    #[error("validation error: {0}")]
    Validation(String),
    /// Error when a profile name is not in the collection.
    #[error("profile not found: '{0}'")]
    ProfileNotFound(String),
    /// Error during UTF-8 conversion.
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("failed to find the home directory")]
    HomeDirNotFound,
}
