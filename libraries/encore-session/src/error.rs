//! Error types for playback sessions

use thiserror::Error;

/// Failures that prevent a session from being created
///
/// Each is reported once on the status display with controls suppressed.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The guild already has a live voice connection
    #[error("Bot is already running in a voice channel")]
    ConnectionActive,

    /// No playlist directory with this name
    #[error("Could not find playlist {0}")]
    PlaylistNotFound(String),

    /// Playlist exists but holds no playable tracks
    #[error("Playlist {0} has no tracks")]
    EmptyPlaylist(String),

    /// No track of the playlist would start
    #[error("Could not play any track of playlist {0}")]
    NothingPlayable(String),

    /// The requesting member is not in a voice channel
    #[error("Could not find voice channel")]
    NoVoiceChannel,

    /// Joining the voice channel failed
    #[error("Could not establish connection between bot and voice channel: {0}")]
    ConnectionFailed(String),

    /// Session identifier already belongs to a live session
    #[error("Session {0} is already running")]
    DuplicateSession(String),

    /// Reading the playlist failed
    #[error("Library error: {0}")]
    Library(#[from] encore_library::LibraryError),

    /// The initial status display could not be created
    #[error("Presenter error: {0}")]
    Presenter(#[from] PresenterError),
}

/// Playback engine command failures
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine refused the command in its current state
    #[error("Engine rejected command: {0}")]
    Rejected(String),

    /// The engine could not open or stream the resource
    #[error("Engine failure: {0}")]
    Failed(String),

    /// The voice connection is gone
    #[error("Voice connection closed")]
    Disconnected,
}

/// Status display failures
#[derive(Debug, Error)]
pub enum PresenterError {
    /// The display no longer exists (deleted externally)
    #[error("Display {0} no longer exists")]
    Gone(String),

    /// Sending the update failed
    #[error("Failed to update display: {0}")]
    Transport(String),
}

/// Failures when routing events to a session
#[derive(Debug, Error)]
pub enum SessionError {
    /// No live session with this identifier
    #[error("Session {0} not found")]
    NotFound(String),

    /// The session's serial task has finished
    #[error("Session {0} has ended")]
    Closed(String),
}

/// Result type for session setup
pub type Result<T> = std::result::Result<T, SetupError>;
