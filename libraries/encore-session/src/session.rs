//! Serial session task
//!
//! Each live session runs one task that owns its orchestrator and drains a
//! bounded inbox. Engine events and control activations are handled strictly
//! one after another, so a track-ended event can never interleave with a
//! button press halfway through.

use crate::orchestrator::{PlaybackOrchestrator, Transition};
use crate::registry::SessionRegistry;
use crate::types::{SessionEvent, SessionState};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info};

/// One queued event, optionally with a reply slot for its outcome
#[derive(Debug)]
pub(crate) struct Envelope {
    pub(crate) event: SessionEvent,

    /// Play generation an engine event was reported under; `None` is current
    pub(crate) generation: Option<u64>,
    pub(crate) reply: Option<oneshot::Sender<Transition>>,
}

impl Envelope {
    pub(crate) fn new(event: SessionEvent) -> Self {
        Self {
            event,
            generation: None,
            reply: None,
        }
    }

    pub(crate) fn stamped(event: SessionEvent, generation: u64) -> Self {
        Self {
            event,
            generation: Some(generation),
            reply: None,
        }
    }

    pub(crate) fn with_reply(event: SessionEvent) -> (Self, oneshot::Receiver<Transition>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                event,
                generation: None,
                reply: Some(tx),
            },
            rx,
        )
    }
}

/// Spawn the task that drives `orchestrator` until it terminates
///
/// An ended session is torn down once `linger` passes without a "prev".
pub(crate) fn spawn_session(
    orchestrator: PlaybackOrchestrator,
    inbox: mpsc::Receiver<Envelope>,
    registry: SessionRegistry,
    linger: Duration,
) -> JoinHandle<()> {
    tokio::spawn(run(orchestrator, inbox, registry, linger))
}

async fn run(
    mut orchestrator: PlaybackOrchestrator,
    mut inbox: mpsc::Receiver<Envelope>,
    registry: SessionRegistry,
    linger: Duration,
) {
    let session = orchestrator.session().clone();
    let mut ended_at = ended_deadline(&orchestrator, None, linger);

    loop {
        let next = match ended_at {
            Some(deadline) => match timeout_at(deadline, inbox.recv()).await {
                Ok(envelope) => envelope,
                Err(_) => {
                    info!(session = %session, "Ended session lingered out");
                    registry.remove(&session).await;
                    orchestrator.teardown().await;
                    break;
                }
            },
            None => inbox.recv().await,
        };

        let Some(envelope) = next else {
            debug!(session = %session, "Inbox closed");
            break;
        };

        let transition = orchestrator
            .handle_stamped(envelope.event, envelope.generation)
            .await;

        match transition {
            Transition::Rendered(_) => {
                registry
                    .update_display(&session, orchestrator.display().clone())
                    .await;
            }
            Transition::Terminated => registry.remove(&session).await,
            Transition::Ignored => {}
        }

        if let Some(reply) = envelope.reply {
            // Caller may have stopped waiting
            let _ = reply.send(transition);
        }

        if transition == Transition::Terminated {
            break;
        }

        ended_at = ended_deadline(&orchestrator, ended_at, linger);
    }

    debug!(session = %session, "Session task finished");
}

/// Deadline for an ended session; keeps an existing one, clears it on resume
fn ended_deadline(
    orchestrator: &PlaybackOrchestrator,
    current: Option<Instant>,
    linger: Duration,
) -> Option<Instant> {
    if orchestrator.state() == SessionState::Ended {
        Some(current.unwrap_or_else(|| Instant::now() + linger))
    } else {
        None
    }
}
