//! Playback engine and voice gateway seams
//!
//! The engine streams one track at a time and reports when it goes idle or
//! fails. Everything about encoding and transport lives behind these traits.

use crate::error::{EngineError, SessionError};
use crate::session::Envelope;
use crate::types::{EngineEvent, GuildId, SessionId, VoiceChannelId};
use async_trait::async_trait;
use encore_library::Track;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Streaming primitive bound to one voice connection
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Start streaming `track` at `volume` (0.0-1.0), replacing whatever plays
    async fn play(&self, track: &Track, volume: f32) -> Result<(), EngineError>;

    /// Pause the transport; `false` if the engine refused
    async fn pause(&self) -> bool;

    /// Resume the transport; `false` if the engine refused
    async fn resume(&self) -> bool;

    /// Stop streaming without reporting `Idle`
    async fn stop(&self) -> Result<(), EngineError>;

    /// Release the voice connection
    async fn disconnect(&self) -> Result<(), EngineError>;
}

/// Establishes voice connections
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// Whether the guild already has a live voice connection
    async fn is_connected(&self, guild: &GuildId) -> bool;

    /// Join `channel` and return an engine that reports into `events`
    async fn connect(
        &self,
        guild: &GuildId,
        channel: &VoiceChannelId,
        events: EngineEventSink,
    ) -> Result<Arc<dyn PlaybackEngine>, EngineError>;
}

/// Counts play commands and track-replacing controls of one session
///
/// Engine events are stamped with the value current when they were reported.
/// An event whose stamp is older than the counter refers to a track that has
/// since been replaced (or is about to be).
#[derive(Debug, Clone, Default)]
pub(crate) struct PlayGeneration(Arc<AtomicU64>);

impl PlayGeneration {
    pub(crate) fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Advance the counter and return the new value
    pub(crate) fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Where an engine reports status transitions for its session
///
/// Cloning is cheap; every clone feeds the same session inbox.
#[derive(Debug, Clone)]
pub struct EngineEventSink {
    session: SessionId,
    inbox: mpsc::Sender<Envelope>,
    generation: PlayGeneration,
}

impl EngineEventSink {
    pub(crate) fn new(
        session: SessionId,
        inbox: mpsc::Sender<Envelope>,
        generation: PlayGeneration,
    ) -> Self {
        Self {
            session,
            inbox,
            generation,
        }
    }

    fn envelope(&self, event: EngineEvent) -> Envelope {
        Envelope::stamped(event.into(), self.generation.current())
    }

    /// Session this sink feeds
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Queue an event, waiting for inbox space
    pub async fn notify(&self, event: EngineEvent) -> Result<(), SessionError> {
        self.inbox
            .send(self.envelope(event))
            .await
            .map_err(|_| SessionError::Closed(self.session.to_string()))
    }

    /// Queue an event without waiting
    ///
    /// Fails when the session is gone or its inbox is full.
    pub fn try_notify(&self, event: EngineEvent) -> Result<(), SessionError> {
        self.inbox
            .try_send(self.envelope(event))
            .map_err(|_| SessionError::Closed(self.session.to_string()))
    }

    /// Whether the session still accepts events
    pub fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }
}
