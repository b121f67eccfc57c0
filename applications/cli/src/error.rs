/// Console front end error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Library error: {0}")]
    Library(#[from] encore_library::LibraryError),

    #[error(transparent)]
    Setup(#[from] encore_session::SetupError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
