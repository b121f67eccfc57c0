//! Core types for playback sessions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a session (the command invocation that started it)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Guild (server) that owns a voice connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuildId(pub String);

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Voice channel the requesting member is connected to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceChannelId(pub String);

impl fmt::Display for VoiceChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transport state of the external playback engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineStatus {
    /// Streaming a track
    Playing,

    /// Paused mid-track
    Paused,

    /// Current track finished; ready for the next command
    Idle,
}

/// The orchestrator's own view of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// A track is streaming
    Playing,

    /// Transport paused by the user
    Paused,

    /// Track list exhausted; only "prev" can resume
    Ended,
}

/// Interactive controls on the status display
///
/// The string tokens double as UI control identifiers and event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlId {
    #[serde(rename = "prev")]
    Prev,
    #[serde(rename = "next")]
    Next,
    #[serde(rename = "pause")]
    Pause,
    #[serde(rename = "stop")]
    Stop,
    #[serde(rename = "more")]
    More,
    #[serde(rename = "volumeUp")]
    VolumeUp,
    #[serde(rename = "volumeDown")]
    VolumeDown,
    #[serde(rename = "shuffle")]
    Shuffle,
}

impl ControlId {
    /// Every control, in display order
    pub const ALL: [ControlId; 8] = [
        ControlId::Prev,
        ControlId::Next,
        ControlId::Pause,
        ControlId::Stop,
        ControlId::More,
        ControlId::VolumeUp,
        ControlId::VolumeDown,
        ControlId::Shuffle,
    ];

    /// Wire token of this control
    pub fn token(self) -> &'static str {
        match self {
            ControlId::Prev => "prev",
            ControlId::Next => "next",
            ControlId::Pause => "pause",
            ControlId::Stop => "stop",
            ControlId::More => "more",
            ControlId::VolumeUp => "volumeUp",
            ControlId::VolumeDown => "volumeDown",
            ControlId::Shuffle => "shuffle",
        }
    }

    /// Whether handling this control stops or replaces the current track
    pub fn replaces_track(self) -> bool {
        matches!(
            self,
            ControlId::Prev | ControlId::Next | ControlId::Stop | ControlId::Shuffle
        )
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Control token that names no known control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownControl(pub String);

impl fmt::Display for UnknownControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown control: {}", self.0)
    }
}

impl std::error::Error for UnknownControl {}

impl FromStr for ControlId {
    type Err = UnknownControl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControlId::ALL
            .into_iter()
            .find(|c| c.token() == s)
            .ok_or_else(|| UnknownControl(s.to_string()))
    }
}

/// Status transitions reported by the playback engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// The current track finished
    Idle,

    /// Streaming failed mid-track
    Errored { message: String },
}

/// Everything a session's serial task consumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Engine(EngineEvent),
    Control(ControlId),

    /// Tear the session down in any state, bypassing the control table
    Shutdown,
}

impl From<EngineEvent> for SessionEvent {
    fn from(event: EngineEvent) -> Self {
        SessionEvent::Engine(event)
    }
}

impl From<ControlId> for SessionEvent {
    fn from(control: ControlId) -> Self {
        SessionEvent::Control(control)
    }
}
