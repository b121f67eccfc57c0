//! Playback orchestrator
//!
//! The session state machine. It consumes engine events and control
//! activations one at a time, mutates the cursor, issues engine commands and
//! finishes every state change with exactly one render.
//!
//! ```text
//!            pause                 Idle/next at last
//! Playing <---------> Paused ----------------------+
//!    |                                             v
//!    +------------ Idle/next at last --------->  Ended
//!    ^                                             |
//!    +-------------------- prev -------------------+
//! ```

use crate::config::SessionConfig;
use crate::cursor::TrackCursor;
use crate::enablement::{policy, EnablementSnapshot};
use crate::engine::{PlayGeneration, PlaybackEngine};
use crate::presenter::{DisplayHandle, Presenter, RenderRequest};
use crate::status;
use crate::types::{ControlId, EngineEvent, EngineStatus, SessionEvent, SessionId, SessionState};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What handling one event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State changed and one render was issued with this snapshot
    Rendered(EnablementSnapshot),

    /// Nothing changed; no render
    Ignored,

    /// Session torn down; no further events will be accepted
    Terminated,
}

/// Owns one session's cursor and drives its engine and display
pub struct PlaybackOrchestrator {
    session: SessionId,
    cursor: TrackCursor,
    state: SessionState,
    engine_status: EngineStatus,
    engine: Arc<dyn PlaybackEngine>,
    presenter: Arc<dyn Presenter>,
    display: DisplayHandle,
    config: SessionConfig,
    generation: PlayGeneration,

    /// Generation the current track was started under
    playing_generation: u64,

    /// The current track ended while a queued control was about to replace it
    superseded_end: bool,
}

impl PlaybackOrchestrator {
    pub fn new(
        session: SessionId,
        cursor: TrackCursor,
        engine: Arc<dyn PlaybackEngine>,
        presenter: Arc<dyn Presenter>,
        display: DisplayHandle,
        config: SessionConfig,
    ) -> Self {
        Self {
            session,
            cursor,
            state: SessionState::Playing,
            engine_status: EngineStatus::Idle,
            engine,
            presenter,
            display,
            config,
            generation: PlayGeneration::default(),
            playing_generation: 0,
            superseded_end: false,
        }
    }

    /// Share the play generation counter with the session's event sink
    pub(crate) fn with_generation(mut self, generation: PlayGeneration) -> Self {
        self.playing_generation = generation.current();
        self.generation = generation;
        self
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn engine_status(&self) -> EngineStatus {
        self.engine_status
    }

    pub fn cursor(&self) -> &TrackCursor {
        &self.cursor
    }

    /// Current display handle (updated after every successful render)
    pub fn display(&self) -> &DisplayHandle {
        &self.display
    }

    /// Enablement for the current state
    pub fn enablement(&self) -> EnablementSnapshot {
        policy(&self.cursor, self.engine_status, self.state)
    }

    /// Start playback at the cursor's current track
    pub async fn begin(&mut self) -> Transition {
        if self.start_first().await {
            self.render_now_playing(status::NOW_PLAYING).await
        } else {
            self.finish(true).await
        }
    }

    /// Start playback for a new session
    ///
    /// Returns `None` without rendering when no track would start; the engine
    /// is stopped and its connection released.
    pub(crate) async fn try_begin(&mut self) -> Option<Transition> {
        if self.start_first().await {
            Some(self.render_now_playing(status::NOW_PLAYING).await)
        } else {
            self.release_engine().await;
            self.state = SessionState::Ended;
            None
        }
    }

    async fn start_first(&mut self) -> bool {
        info!(
            session = %self.session,
            tracks = self.cursor.total(),
            "Starting playback"
        );
        self.play_current().await
    }

    /// Process one event
    pub async fn handle(&mut self, event: SessionEvent) -> Transition {
        self.handle_stamped(event, None).await
    }

    /// Process one event reported under play generation `stamp`
    ///
    /// Engine events with a stale stamp belong to a track that was replaced
    /// after they were reported and are dropped.
    pub(crate) async fn handle_stamped(
        &mut self,
        event: SessionEvent,
        stamp: Option<u64>,
    ) -> Transition {
        match event {
            SessionEvent::Engine(event) => self.on_engine_event(event, stamp).await,
            SessionEvent::Control(control) => self.on_control(control).await,
            SessionEvent::Shutdown => {
                self.teardown().await;
                Transition::Terminated
            }
        }
    }

    /// Stop the engine, release the connection and delete the display
    ///
    /// Failures are logged and never propagated.
    pub async fn teardown(&mut self) {
        info!(session = %self.session, "Tearing down session");

        self.release_engine().await;
        if let Err(e) = self.presenter.delete(&self.display).await {
            warn!(session = %self.session, display = %self.display, error = %e, "Failed to delete display");
        }
    }

    async fn release_engine(&mut self) {
        self.generation.bump();
        if let Err(e) = self.engine.stop().await {
            warn!(session = %self.session, error = %e, "Failed to stop engine");
        }
        if let Err(e) = self.engine.disconnect().await {
            warn!(session = %self.session, error = %e, "Failed to release voice connection");
        }
        self.engine_status = EngineStatus::Idle;
    }

    // ===== Engine events =====

    async fn on_engine_event(&mut self, event: EngineEvent, stamp: Option<u64>) -> Transition {
        if self.state == SessionState::Ended {
            debug!(session = %self.session, ?event, "Engine event after end ignored");
            return Transition::Ignored;
        }

        if let Some(stamp) = stamp {
            if stamp != self.generation.current() {
                if stamp >= self.playing_generation {
                    self.superseded_end = true;
                }
                debug!(
                    session = %self.session,
                    ?event,
                    stamp,
                    generation = self.generation.current(),
                    "Stale engine event dropped"
                );
                return Transition::Ignored;
            }
        }

        if let EngineEvent::Errored { message } = &event {
            warn!(
                session = %self.session,
                track = self.current_title(),
                error = %message,
                "Playback failed mid-track"
            );
        }

        self.engine_status = EngineStatus::Idle;
        self.advance_and_play(false).await
    }

    // ===== Controls =====

    async fn on_control(&mut self, control: ControlId) -> Transition {
        debug!(session = %self.session, control = %control, state = ?self.state, "Control activated");

        if self.state == SessionState::Ended && control != ControlId::Prev {
            return Transition::Ignored;
        }

        match control {
            ControlId::Prev => self.previous().await,
            ControlId::Next => self.advance_and_play(true).await,
            ControlId::Pause => self.toggle_pause().await,
            ControlId::Stop => {
                self.teardown().await;
                Transition::Terminated
            }
            ControlId::Shuffle => {
                self.cursor.shuffle();
                info!(session = %self.session, "Playlist shuffled");
                if self.play_current().await {
                    self.render_now_playing(status::SHUFFLED).await
                } else {
                    self.finish(true).await
                }
            }
            ControlId::VolumeUp => self.step_volume(self.config.volume_step).await,
            ControlId::VolumeDown => self.step_volume(-self.config.volume_step).await,
            ControlId::More => {
                self.cursor.toggle_expanded();
                let snapshot = self.enablement();
                self.render(RenderRequest::new().controls(snapshot)).await;
                Transition::Rendered(snapshot)
            }
        }
    }

    async fn previous(&mut self) -> Transition {
        if self.cursor.retreat().is_none() {
            if self.superseded_end {
                // The track finished while this press was queued
                self.engine_status = EngineStatus::Idle;
                return self.advance_and_play(false).await;
            }
            debug!(session = %self.session, "Already at first track");
            return Transition::Ignored;
        }

        if self.play_current().await {
            self.render_now_playing(status::NOW_PLAYING).await
        } else {
            self.finish(true).await
        }
    }

    /// Move to the next track and play it, ending the session at the end
    ///
    /// `explicit` is set for a user "next"; the engine may still be streaming
    /// then and must be stopped before entering `Ended`.
    async fn advance_and_play(&mut self, explicit: bool) -> Transition {
        if self.cursor.advance().is_none() {
            return self.finish(explicit).await;
        }

        if self.play_current().await {
            self.render_now_playing(status::NOW_PLAYING).await
        } else {
            self.finish(true).await
        }
    }

    async fn toggle_pause(&mut self) -> Transition {
        let description = if self.state == SessionState::Paused {
            if self.engine.resume().await {
                info!(session = %self.session, "Audio player unpaused");
                self.state = SessionState::Playing;
                self.engine_status = EngineStatus::Playing;
                status::UNPAUSED
            } else {
                warn!(session = %self.session, "Audio player could not be unpaused");
                status::UNPAUSE_FAILED
            }
        } else if self.engine.pause().await {
            info!(session = %self.session, "Audio player paused");
            self.state = SessionState::Paused;
            self.engine_status = EngineStatus::Paused;
            status::PAUSED
        } else {
            warn!(session = %self.session, "Audio player could not be paused");
            status::PAUSE_FAILED
        };

        let snapshot = self.enablement();
        self.render(RenderRequest::new().description(description).controls(snapshot))
            .await;
        Transition::Rendered(snapshot)
    }

    async fn step_volume(&mut self, delta: f32) -> Transition {
        let before = self.cursor.volume();
        self.cursor.set_volume(before + delta);
        if self.cursor.volume() == before {
            debug!(session = %self.session, volume = before, "Volume already at bound");
            return Transition::Ignored;
        }

        info!(session = %self.session, volume = self.cursor.volume(), "Volume changed");
        let description = if delta > 0.0 {
            status::VOLUME_INCREASED
        } else {
            status::VOLUME_DECREASED
        };
        self.render_now_playing(description).await
    }

    // ===== Engine commands =====

    /// Play the cursor's current track, skipping forward past failures
    ///
    /// Returns `false` when no track from the cursor onwards would start.
    async fn play_current(&mut self) -> bool {
        loop {
            let Some(track) = self.cursor.current() else {
                return false;
            };

            self.playing_generation = self.generation.bump();
            self.superseded_end = false;
            match self.engine.play(track, self.cursor.volume()).await {
                Ok(()) => {
                    info!(
                        session = %self.session,
                        track = %track,
                        position = self.cursor.position(),
                        "Now playing"
                    );
                    self.state = SessionState::Playing;
                    self.engine_status = EngineStatus::Playing;
                    return true;
                }
                Err(e) => {
                    warn!(session = %self.session, track = %track, error = %e, "Failed to play track");
                }
            }

            if self.cursor.advance().is_none() {
                return false;
            }
        }
    }

    async fn finish(&mut self, stop_engine: bool) -> Transition {
        self.generation.bump();
        self.superseded_end = false;
        if stop_engine {
            if let Err(e) = self.engine.stop().await {
                warn!(session = %self.session, error = %e, "Failed to stop engine");
            }
        }

        info!(session = %self.session, "Finished the last track");
        self.state = SessionState::Ended;
        self.engine_status = EngineStatus::Idle;
        self.render_now_playing(status::FINISHED).await
    }

    // ===== Rendering =====

    async fn render_now_playing(&mut self, description: &str) -> Transition {
        let snapshot = self.enablement();
        let request = RenderRequest::new()
            .description(description)
            .fields(status::now_playing_fields(&self.cursor, &self.config))
            .controls(snapshot);
        self.render(request).await;
        Transition::Rendered(snapshot)
    }

    /// Issue one render; on failure the previous handle is kept
    async fn render(&mut self, request: RenderRequest) {
        match self.presenter.render(&self.display, request).await {
            Ok(handle) => self.display = handle,
            Err(e) => {
                warn!(session = %self.session, display = %self.display, error = %e, "Failed to update display");
            }
        }
    }

    fn current_title(&self) -> &str {
        self.cursor.current().map_or("", |t| t.title())
    }
}
