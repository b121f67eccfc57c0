//! Session settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for playback sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Volume for new sessions (0.0-1.0, default: 0.5)
    pub initial_volume: f32,

    /// Change applied per volumeUp/volumeDown activation (default: 0.1)
    pub volume_step: f32,

    /// Seconds an ended session stays on screen before teardown (default: 300)
    pub ended_linger_secs: u64,

    /// Pending events buffered per session (default: 64)
    pub inbox_capacity: usize,

    /// Shown in the "Previous" field at the first track
    pub no_previous_placeholder: String,

    /// Shown in the "Next" field at the last track
    pub no_next_placeholder: String,
}

impl SessionConfig {
    /// Linger period as a duration
    pub fn ended_linger(&self) -> Duration {
        Duration::from_secs(self.ended_linger_secs)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(format!(
                "session.initial_volume must be within 0.0..=1.0, got {}",
                self.initial_volume
            ));
        }
        if self.volume_step.is_nan() || self.volume_step <= 0.0 || self.volume_step > 1.0 {
            return Err(format!(
                "session.volume_step must be within (0.0, 1.0], got {}",
                self.volume_step
            ));
        }
        if self.inbox_capacity == 0 {
            return Err("session.inbox_capacity must be >= 1".to_string());
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_volume: 0.5,
            volume_step: 0.1,
            ended_linger_secs: 300,
            inbox_capacity: 64,
            no_previous_placeholder: "Nothing prev in queue".to_string(),
            no_next_placeholder: "Nothing next in queue".to_string(),
        }
    }
}
