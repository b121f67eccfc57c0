//! Test helpers: recording mocks for the engine, presenter and voice gateway

#![allow(dead_code)]

use async_trait::async_trait;
use encore_library::{LibraryConfig, PlaylistLibrary, Track};
use encore_session::{
    DisplayHandle, EngineError, EngineEventSink, GuildId, PlaybackEngine, PlaybackOrchestrator,
    Presenter, PresenterError, RenderRequest, SessionConfig, SessionId, SessionRegistry,
    TrackCursor, VoiceChannelId, VoiceGateway,
};
use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tempfile::TempDir;

static TRACING: Once = Once::new();

/// Route library logs to the test harness output
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("encore_session=debug")
            .try_init();
    });
}

pub fn create_test_track(title: &str) -> Track {
    Track::new(format!("/music/test/{title}.mp3"), title)
}

pub fn create_test_tracks(count: usize) -> Vec<Track> {
    (1..=count)
        .map(|i| create_test_track(&format!("Song {i}")))
        .collect()
}

// ===== Engine =====

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Play { title: String, volume: f32 },
    Pause,
    Resume,
    Stop,
    Disconnect,
}

/// Engine that records every command
#[derive(Default)]
pub struct RecordingEngine {
    commands: Mutex<Vec<EngineCommand>>,
    failing_titles: Mutex<HashSet<String>>,
    refuse_pause: AtomicBool,
    refuse_resume: AtomicBool,
}

impl RecordingEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn commands(&self) -> Vec<EngineCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn played_titles(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                EngineCommand::Play { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, command: &EngineCommand) -> usize {
        self.commands().iter().filter(|c| *c == command).count()
    }

    pub fn fail_track(&self, title: &str) {
        self.failing_titles.lock().unwrap().insert(title.to_string());
    }

    pub fn refuse_pause(&self, refuse: bool) {
        self.refuse_pause.store(refuse, Ordering::SeqCst);
    }

    pub fn refuse_resume(&self, refuse: bool) {
        self.refuse_resume.store(refuse, Ordering::SeqCst);
    }

    fn record(&self, command: EngineCommand) {
        self.commands.lock().unwrap().push(command);
    }
}

#[async_trait]
impl PlaybackEngine for RecordingEngine {
    async fn play(&self, track: &Track, volume: f32) -> Result<(), EngineError> {
        self.record(EngineCommand::Play {
            title: track.title().to_string(),
            volume,
        });
        if self.failing_titles.lock().unwrap().contains(track.title()) {
            return Err(EngineError::Failed(format!("cannot open {}", track.title())));
        }
        Ok(())
    }

    async fn pause(&self) -> bool {
        self.record(EngineCommand::Pause);
        !self.refuse_pause.load(Ordering::SeqCst)
    }

    async fn resume(&self) -> bool {
        self.record(EngineCommand::Resume);
        !self.refuse_resume.load(Ordering::SeqCst)
    }

    async fn stop(&self) -> Result<(), EngineError> {
        self.record(EngineCommand::Stop);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), EngineError> {
        self.record(EngineCommand::Disconnect);
        Ok(())
    }
}

// ===== Presenter =====

/// Presenter that records renders and hands out a fresh handle each time
#[derive(Default)]
pub struct RecordingPresenter {
    renders: Mutex<Vec<(DisplayHandle, RenderRequest)>>,
    deleted: Mutex<Vec<DisplayHandle>>,
    counter: AtomicUsize,
    fail_renders: AtomicBool,
}

impl RecordingPresenter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn renders(&self) -> Vec<RenderRequest> {
        self.renders
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }

    pub fn last_render(&self) -> Option<RenderRequest> {
        self.renders().pop()
    }

    pub fn deleted(&self) -> Vec<DisplayHandle> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn fail_renders(&self, fail: bool) {
        self.fail_renders.store(fail, Ordering::SeqCst);
    }

    fn next_handle(&self) -> DisplayHandle {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        DisplayHandle::new(format!("display-{n}"))
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    async fn open(&self, _session: &SessionId) -> Result<DisplayHandle, PresenterError> {
        Ok(self.next_handle())
    }

    async fn render(
        &self,
        display: &DisplayHandle,
        request: RenderRequest,
    ) -> Result<DisplayHandle, PresenterError> {
        if self.fail_renders.load(Ordering::SeqCst) {
            return Err(PresenterError::Transport("offline".to_string()));
        }
        self.renders
            .lock()
            .unwrap()
            .push((display.clone(), request));
        Ok(self.next_handle())
    }

    async fn delete(&self, display: &DisplayHandle) -> Result<(), PresenterError> {
        self.deleted.lock().unwrap().push(display.clone());
        Ok(())
    }
}

// ===== Voice gateway =====

/// Gateway that hands out a shared recording engine
pub struct MockGateway {
    engine: Arc<RecordingEngine>,
    connected: Mutex<HashSet<GuildId>>,
    fail_connect: AtomicBool,
    sink: Mutex<Option<EngineEventSink>>,
}

impl MockGateway {
    pub fn new(engine: Arc<RecordingEngine>) -> Arc<Self> {
        Arc::new(Self {
            engine,
            connected: Mutex::new(HashSet::new()),
            fail_connect: AtomicBool::new(false),
            sink: Mutex::new(None),
        })
    }

    pub fn mark_connected(&self, guild: &GuildId) {
        self.connected.lock().unwrap().insert(guild.clone());
    }

    pub fn fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Sink handed to the last engine created
    pub fn sink(&self) -> Option<EngineEventSink> {
        self.sink.lock().unwrap().clone()
    }
}

#[async_trait]
impl VoiceGateway for MockGateway {
    async fn is_connected(&self, guild: &GuildId) -> bool {
        self.connected.lock().unwrap().contains(guild)
    }

    async fn connect(
        &self,
        _guild: &GuildId,
        _channel: &VoiceChannelId,
        events: EngineEventSink,
    ) -> Result<Arc<dyn PlaybackEngine>, EngineError> {
        // Voice handshakes suspend; let other tasks run in between
        tokio::task::yield_now().await;
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(EngineError::Failed("voice handshake timed out".to_string()));
        }
        *self.sink.lock().unwrap() = Some(events);
        let engine: Arc<dyn PlaybackEngine> = self.engine.clone();
        Ok(engine)
    }
}

// ===== Fixtures =====

/// Orchestrator over `count` in-memory tracks with recording collaborators
pub fn orchestrator_with(
    count: usize,
) -> (PlaybackOrchestrator, Arc<RecordingEngine>, Arc<RecordingPresenter>) {
    let engine = RecordingEngine::new();
    let presenter = RecordingPresenter::new();
    let config = SessionConfig::default();
    let cursor = TrackCursor::new(create_test_tracks(count), config.initial_volume);
    let orchestrator = PlaybackOrchestrator::new(
        SessionId::new("session-1"),
        cursor,
        engine.clone(),
        presenter.clone(),
        DisplayHandle::new("initial"),
        config,
    );
    (orchestrator, engine, presenter)
}

/// Registry over a temporary music directory
pub struct TestRegistry {
    pub registry: SessionRegistry,
    pub engine: Arc<RecordingEngine>,
    pub presenter: Arc<RecordingPresenter>,
    pub gateway: Arc<MockGateway>,
    _music_dir: TempDir,
}

impl TestRegistry {
    /// Playlists given as (name, track file names)
    pub fn new(playlists: &[(&str, &[&str])]) -> Self {
        Self::with_config(playlists, SessionConfig::default())
    }

    pub fn with_config(playlists: &[(&str, &[&str])], config: SessionConfig) -> Self {
        let music_dir = tempfile::tempdir().expect("Failed to create temp dir");
        for (name, files) in playlists {
            let dir = music_dir.path().join(name);
            fs::create_dir_all(&dir).expect("Failed to create playlist dir");
            for file in *files {
                fs::write(dir.join(file), b"fake audio").expect("Failed to write track");
            }
        }

        let library = PlaylistLibrary::new(LibraryConfig {
            music_dir: music_dir.path().to_path_buf(),
            ..LibraryConfig::default()
        });
        let engine = RecordingEngine::new();
        let presenter = RecordingPresenter::new();
        let gateway = MockGateway::new(engine.clone());
        let registry = SessionRegistry::new(library, gateway.clone(), presenter.clone(), config);

        Self {
            registry,
            engine,
            presenter,
            gateway,
            _music_dir: music_dir,
        }
    }
}
