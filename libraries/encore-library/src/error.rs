//! Error types for the playlist library

use thiserror::Error;

/// Playlist library errors
#[derive(Debug, Error)]
pub enum LibraryError {
    /// No playlist directory with this name
    #[error("Could not find playlist {0}")]
    NotFound(String),

    /// Playlist name would escape the music directory
    #[error("Invalid playlist name: {0}")]
    InvalidName(String),

    /// Directory traversal failed
    #[error("Failed to read {path}: {message}")]
    Walk { path: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<walkdir::Error> for LibraryError {
    fn from(err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        LibraryError::Walk {
            path,
            message: err.to_string(),
        }
    }
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, LibraryError>;
