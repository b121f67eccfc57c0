//! Control enablement policy
//!
//! Derives which controls are usable from the cursor and the playback state.
//! The result is recomputed on every render and never stored.

use crate::cursor::TrackCursor;
use crate::types::{EngineStatus, SessionState};
use serde::{Deserialize, Serialize};

/// Disabled state of every control plus the flags that pick labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct EnablementSnapshot {
    pub disable_prev: bool,
    pub disable_next: bool,
    pub disable_pause: bool,
    pub disable_stop: bool,
    pub disable_more: bool,
    pub disable_volume_up: bool,
    pub disable_volume_down: bool,
    pub disable_shuffle: bool,

    /// Pause control shows "resume"
    pub is_paused: bool,

    /// Secondary control row is visible
    pub is_expanded: bool,

    /// Track list exhausted
    pub is_ended: bool,
}

/// Compute the enablement snapshot for the given cursor and state
///
/// Pure: identical inputs always give identical snapshots.
///
/// When ended, only "prev" (if the cursor can retreat) and the volume/shuffle
/// flags derived from the cursor remain meaningful; the secondary row collapses.
pub fn policy(
    cursor: &TrackCursor,
    engine_status: EngineStatus,
    state: SessionState,
) -> EnablementSnapshot {
    let is_ended = state == SessionState::Ended;
    let is_paused = !is_ended
        && (state == SessionState::Paused || engine_status == EngineStatus::Paused);

    EnablementSnapshot {
        disable_prev: cursor.at_first() || (is_paused && !is_ended),
        disable_next: cursor.at_last() || is_paused || is_ended,
        disable_pause: is_ended,
        disable_stop: is_ended,
        disable_more: is_ended,
        disable_volume_up: cursor.volume() >= 1.0,
        disable_volume_down: cursor.volume() <= 0.0,
        disable_shuffle: false,
        is_paused,
        is_expanded: cursor.expanded() && !is_ended,
        is_ended,
    }
}
