//! Encore - Interactive Playback Sessions
//!
//! Drives a streaming playback engine from an ordered track list and keeps a
//! status display with action controls consistent with playback state.
//!
//! This crate provides:
//! - `TrackCursor`: track list, position, volume and UI expansion flag
//! - `policy`: pure control enablement for a cursor and playback state
//! - `PlaybackOrchestrator`: the session state machine (Playing, Paused, Ended)
//! - `SessionRegistry`: starts sessions and routes events to them
//! - `Presenter`, `PlaybackEngine`, `VoiceGateway`: seams to the outside world
//!
//! # Architecture
//!
//! ```text
//! control token ──┐
//!                 ├─> SessionRegistry ─> session inbox ─> PlaybackOrchestrator
//! engine event ───┘                                          │        │
//!                                                  PlaybackEngine   Presenter
//! ```
//!
//! Each session runs on its own task and handles events strictly in order.
//!
//! # Example
//!
//! ```rust,ignore
//! use encore_session::{SessionConfig, SessionRegistry, SessionRequest};
//!
//! let registry = SessionRegistry::new(library, gateway, presenter, SessionConfig::default());
//! let id = registry.start(request).await?;
//!
//! registry.dispatch(&id, "pause").await;
//! registry.dispatch(&id, "stop").await;
//! ```

mod config;
mod cursor;
mod enablement;
mod engine;
mod error;
mod orchestrator;
mod presenter;
mod registry;
mod session;
mod shuffle;
pub mod status;
mod types;

pub use config::SessionConfig;
pub use cursor::TrackCursor;
pub use enablement::{policy, EnablementSnapshot};
pub use engine::{EngineEventSink, PlaybackEngine, VoiceGateway};
pub use error::{EngineError, PresenterError, Result, SessionError, SetupError};
pub use orchestrator::{PlaybackOrchestrator, Transition};
pub use presenter::{
    control_rows, ButtonStyle, ControlButton, DisplayHandle, DisplayUpdate, Presenter,
    RenderRequest, StatusField, INITIAL_DESCRIPTION, INITIAL_TITLE,
};
pub use registry::{DispatchOutcome, SessionRequest, SessionRegistry};
pub use shuffle::{shuffle_tracks, shuffle_tracks_with};
pub use types::{
    ControlId, EngineEvent, EngineStatus, GuildId, SessionEvent, SessionId, SessionState,
    UnknownControl, VoiceChannelId,
};

pub use encore_library::Track;
