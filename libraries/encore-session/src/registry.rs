//! Session registry
//!
//! Maps session identifiers to live sessions so control activations and
//! engine events arriving from anywhere can find their inbox. The registry is
//! an explicit value shared by cloning; there is no global instance.

use crate::config::SessionConfig;
use crate::cursor::TrackCursor;
use crate::engine::{EngineEventSink, PlayGeneration, VoiceGateway};
use crate::error::{Result, SessionError, SetupError};
use crate::orchestrator::{PlaybackOrchestrator, Transition};
use crate::presenter::{DisplayHandle, Presenter, RenderRequest};
use crate::session::{spawn_session, Envelope};
use crate::status;
use crate::types::{ControlId, EngineEvent, GuildId, SessionEvent, SessionId, VoiceChannelId};
use encore_library::{PlaylistLibrary, Track};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

/// Everything needed to start a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    /// Identifier of the command invocation that starts the session
    pub session_id: SessionId,

    pub guild: GuildId,

    /// Voice channel of the requesting member, if they are in one
    pub voice_channel: Option<VoiceChannelId>,

    /// Playlist directory name
    pub playlist: String,
}

/// Result of routing an event to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Event is in the session's inbox
    Queued,

    /// No live session with this identifier
    NoSession,

    /// Control token names no known control
    UnknownControl,
}

struct SessionEntry {
    inbox: mpsc::Sender<Envelope>,
    generation: PlayGeneration,
    display: DisplayHandle,
    guild: GuildId,
}

/// Live sessions plus the collaborators needed to start new ones
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,

    /// Identifiers reserved by a `start` still in progress
    starting: Arc<RwLock<HashSet<SessionId>>>,
    library: Arc<PlaylistLibrary>,
    gateway: Arc<dyn VoiceGateway>,
    presenter: Arc<dyn Presenter>,
    config: Arc<SessionConfig>,
}

impl SessionRegistry {
    pub fn new(
        library: PlaylistLibrary,
        gateway: Arc<dyn VoiceGateway>,
        presenter: Arc<dyn Presenter>,
        config: SessionConfig,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            starting: Arc::new(RwLock::new(HashSet::new())),
            library: Arc::new(library),
            gateway,
            presenter,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn library(&self) -> &PlaylistLibrary {
        &self.library
    }

    // ===== Lifecycle =====

    /// Validate the request, connect, start the first track and spawn the
    /// session task
    ///
    /// Setup failures are rendered once on the display with controls
    /// suppressed, and no session is registered.
    pub async fn start(&self, request: SessionRequest) -> Result<SessionId> {
        let id = request.session_id.clone();
        self.reserve(&id).await?;
        let result = self.open_and_setup(&request).await;
        self.starting.write().await.remove(&id);
        result.map(|()| id)
    }

    /// Claim `id` so a concurrent `start` with the same identifier fails
    async fn reserve(&self, id: &SessionId) -> Result<()> {
        let sessions = self.sessions.read().await;
        let mut starting = self.starting.write().await;
        if sessions.contains_key(id) || !starting.insert(id.clone()) {
            return Err(SetupError::DuplicateSession(id.to_string()));
        }
        Ok(())
    }

    async fn open_and_setup(&self, request: &SessionRequest) -> Result<()> {
        let id = &request.session_id;
        let display = self.presenter.open(id).await?;

        match self.setup(request, display.clone()).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(session = %id, playlist = %request.playlist, error = %e, "Session setup failed");
                let notice = RenderRequest::new().description(e.to_string());
                if let Err(render_error) = self.presenter.render(&display, notice).await {
                    warn!(session = %id, error = %render_error, "Failed to report setup error");
                }
                Err(e)
            }
        }
    }

    async fn setup(&self, request: &SessionRequest, display: DisplayHandle) -> Result<()> {
        let id = &request.session_id;

        if self.gateway.is_connected(&request.guild).await {
            return Err(SetupError::ConnectionActive);
        }
        if !self.library.exists(&request.playlist) {
            return Err(SetupError::PlaylistNotFound(request.playlist.clone()));
        }
        let channel = request
            .voice_channel
            .as_ref()
            .ok_or(SetupError::NoVoiceChannel)?;
        let tracks: Vec<Track> = self.library.tracks(&request.playlist)?;
        if tracks.is_empty() {
            return Err(SetupError::EmptyPlaylist(request.playlist.clone()));
        }

        info!(
            session = %id,
            playlist = %request.playlist,
            tracks = tracks.len(),
            "Found playlist"
        );
        let found = RenderRequest::new()
            .title(status::playlist_title(&request.playlist))
            .description(status::found_playlist(&request.playlist, tracks.len()));
        let display = match self.presenter.render(&display, found).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(session = %id, error = %e, "Failed to update display");
                display
            }
        };

        let (inbox_tx, inbox_rx) = mpsc::channel(self.config.inbox_capacity.max(1));
        let generation = PlayGeneration::default();
        let sink = EngineEventSink::new(id.clone(), inbox_tx.clone(), generation.clone());
        let engine = self
            .gateway
            .connect(&request.guild, channel, sink)
            .await
            .map_err(|e| SetupError::ConnectionFailed(e.to_string()))?;

        let cursor = TrackCursor::new(tracks, self.config.initial_volume);
        let mut orchestrator = PlaybackOrchestrator::new(
            id.clone(),
            cursor,
            engine,
            Arc::clone(&self.presenter),
            display,
            (*self.config).clone(),
        )
        .with_generation(generation.clone());
        if orchestrator.try_begin().await.is_none() {
            return Err(SetupError::NothingPlayable(request.playlist.clone()));
        }

        self.sessions.write().await.insert(
            id.clone(),
            SessionEntry {
                inbox: inbox_tx,
                generation,
                display: orchestrator.display().clone(),
                guild: request.guild.clone(),
            },
        );
        spawn_session(
            orchestrator,
            inbox_rx,
            self.clone(),
            self.config.ended_linger(),
        );

        info!(session = %id, guild = %request.guild, "Session started");
        Ok(())
    }

    /// Stop every live session and wait for each to tear down
    ///
    /// Ended sessions are torn down too, without waiting for their linger.
    pub async fn shutdown(&self) {
        let ids: Vec<SessionId> = self.sessions.read().await.keys().cloned().collect();
        for id in ids {
            if let Err(e) = self
                .dispatch_and_wait(&id, SessionEvent::Shutdown)
                .await
            {
                debug!(session = %id, error = %e, "Session already gone at shutdown");
            }
        }
    }

    // ===== Routing =====

    /// Route a control token to its session
    pub async fn dispatch(&self, id: &SessionId, token: &str) -> DispatchOutcome {
        let control = match token.parse::<ControlId>() {
            Ok(control) => control,
            Err(e) => {
                warn!(session = %id, error = %e, "Ignoring control");
                return DispatchOutcome::UnknownControl;
            }
        };

        debug!(session = %id, control = %control, "Dispatching control");
        self.enqueue(id, Envelope::new(control.into())).await
    }

    /// Route an engine event to its session
    ///
    /// The event counts as reported now: a track-replacing control already
    /// queued makes it stale.
    pub async fn notify_engine(&self, id: &SessionId, event: EngineEvent) -> DispatchOutcome {
        let generation = match self.sessions.read().await.get(id) {
            Some(entry) => entry.generation.current(),
            None => return DispatchOutcome::NoSession,
        };
        self.enqueue(id, Envelope::stamped(event.into(), generation))
            .await
    }

    /// Route an event and wait until the session has handled it
    pub async fn dispatch_and_wait(
        &self,
        id: &SessionId,
        event: SessionEvent,
    ) -> std::result::Result<Transition, SessionError> {
        let (envelope, reply) = Envelope::with_reply(event);
        match self.enqueue(id, envelope).await {
            DispatchOutcome::Queued => reply
                .await
                .map_err(|_| SessionError::Closed(id.to_string())),
            _ => Err(SessionError::NotFound(id.to_string())),
        }
    }

    async fn enqueue(&self, id: &SessionId, envelope: Envelope) -> DispatchOutcome {
        let inbox = match self.sessions.read().await.get(id) {
            Some(entry) => {
                // Engine events reported before this point refer to the
                // track the control is about to replace
                if let SessionEvent::Control(control) = envelope.event {
                    if control.replaces_track() {
                        entry.generation.bump();
                    }
                }
                entry.inbox.clone()
            }
            None => {
                debug!(session = %id, "No live session");
                return DispatchOutcome::NoSession;
            }
        };

        if inbox.send(envelope).await.is_err() {
            debug!(session = %id, "Session inbox closed");
            return DispatchOutcome::NoSession;
        }
        DispatchOutcome::Queued
    }

    // ===== Queries =====

    /// Latest display handle of a live session
    pub async fn display(&self, id: &SessionId) -> Option<DisplayHandle> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|entry| entry.display.clone())
    }

    /// Live session bound to a guild, if any
    pub async fn session_for_guild(&self, guild: &GuildId) -> Option<SessionId> {
        self.sessions
            .read()
            .await
            .iter()
            .find(|(_, entry)| &entry.guild == guild)
            .map(|(id, _)| id.clone())
    }

    pub async fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    // ===== Session task hooks =====

    pub(crate) async fn update_display(&self, id: &SessionId, display: DisplayHandle) {
        if let Some(entry) = self.sessions.write().await.get_mut(id) {
            entry.display = display;
        }
    }

    pub(crate) async fn remove(&self, id: &SessionId) {
        if self.sessions.write().await.remove(id).is_some() {
            debug!(session = %id, "Session removed");
        }
    }
}
