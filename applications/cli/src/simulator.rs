//! Simulated voice gateway and playback engine
//!
//! Stands in for a real voice connection: a "playing" track is a timer that
//! reports idle to the session once the configured track length has passed.

use crate::config::SimulatorSettings;
use async_trait::async_trait;
use encore_library::Track;
use encore_session::{
    EngineError, EngineEvent, EngineEventSink, GuildId, PlaybackEngine, VoiceChannelId,
    VoiceGateway,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

type Connections = Arc<Mutex<HashSet<GuildId>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Hands out simulated engines, one live connection per guild
pub struct SimulatedGateway {
    settings: SimulatorSettings,
    connections: Connections,
}

impl SimulatedGateway {
    pub fn new(settings: SimulatorSettings) -> Self {
        Self {
            settings,
            connections: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

#[async_trait]
impl VoiceGateway for SimulatedGateway {
    async fn is_connected(&self, guild: &GuildId) -> bool {
        lock(&self.connections).contains(guild)
    }

    async fn connect(
        &self,
        guild: &GuildId,
        channel: &VoiceChannelId,
        events: EngineEventSink,
    ) -> Result<Arc<dyn PlaybackEngine>, EngineError> {
        if !lock(&self.connections).insert(guild.clone()) {
            return Err(EngineError::Rejected(format!(
                "guild {guild} already has a voice connection"
            )));
        }

        info!(guild = %guild, channel = %channel, "Joined voice channel");
        let engine: Arc<dyn PlaybackEngine> = Arc::new(SimulatedEngine {
            guild: guild.clone(),
            connections: Arc::clone(&self.connections),
            events,
            track_length: Duration::from_secs(self.settings.track_secs),
            require_files: self.settings.require_files,
            transport: Mutex::new(Transport::default()),
        });
        Ok(engine)
    }
}

#[derive(Default)]
struct Transport {
    timer: Option<JoinHandle<()>>,
    started_at: Option<Instant>,
    remaining: Duration,
    paused: bool,
}

impl Transport {
    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.started_at = None;
        self.paused = false;
    }
}

/// Timer-driven stand-in for a streaming engine
pub struct SimulatedEngine {
    guild: GuildId,
    connections: Connections,
    events: EngineEventSink,
    track_length: Duration,
    require_files: bool,
    transport: Mutex<Transport>,
}

impl SimulatedEngine {
    fn start_timer(&self, transport: &mut Transport, length: Duration) {
        let events = self.events.clone();
        transport.remaining = length;
        transport.started_at = Some(Instant::now());
        transport.paused = false;
        transport.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(length).await;
            if let Err(e) = events.notify(EngineEvent::Idle).await {
                debug!(error = %e, "Track finished after session closed");
            }
        }));
    }
}

#[async_trait]
impl PlaybackEngine for SimulatedEngine {
    async fn play(&self, track: &Track, volume: f32) -> Result<(), EngineError> {
        if self.require_files && !track.path().exists() {
            return Err(EngineError::Failed(format!(
                "file not found: {}",
                track.path().display()
            )));
        }

        let mut transport = lock(&self.transport);
        transport.cancel();
        self.start_timer(&mut transport, self.track_length);
        debug!(guild = %self.guild, track = %track, volume, "Streaming track");
        Ok(())
    }

    async fn pause(&self) -> bool {
        let mut transport = lock(&self.transport);
        if transport.paused || transport.timer.is_none() {
            return false;
        }

        let elapsed = transport
            .started_at
            .map_or(Duration::ZERO, |started| started.elapsed());
        let remaining = transport.remaining.saturating_sub(elapsed);
        transport.cancel();
        transport.remaining = remaining;
        transport.paused = true;
        true
    }

    async fn resume(&self) -> bool {
        let mut transport = lock(&self.transport);
        if !transport.paused {
            return false;
        }

        let remaining = transport.remaining;
        self.start_timer(&mut transport, remaining);
        true
    }

    async fn stop(&self) -> Result<(), EngineError> {
        lock(&self.transport).cancel();
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), EngineError> {
        lock(&self.transport).cancel();
        lock(&self.connections).remove(&self.guild);
        info!(guild = %self.guild, "Left voice channel");
        Ok(())
    }
}
