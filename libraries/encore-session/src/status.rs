//! Status texts and fields shown on the display

use crate::config::SessionConfig;
use crate::cursor::TrackCursor;
use crate::presenter::StatusField;
use encore_library::Track;

pub const NOW_PLAYING: &str = "Now playing.";
pub const PAUSED: &str = "Audio player is paused.";
pub const UNPAUSED: &str = "Audio player is unpaused.";
pub const PAUSE_FAILED: &str = "Audio player could not be paused.";
pub const UNPAUSE_FAILED: &str = "Audio player could not be unpaused.";
pub const SHUFFLED: &str = "Playlist is shuffled.";
pub const VOLUME_INCREASED: &str = "Volume will be increased after the current track changes.";
pub const VOLUME_DECREASED: &str = "Volume will be decreased after the current track changes.";
pub const FINISHED: &str = "Audio player finished playing the last track.";

/// Display title for a playlist
pub fn playlist_title(playlist: &str) -> String {
    format!("Playlist {playlist}")
}

/// Description shown once a playlist is resolved
pub fn found_playlist(playlist: &str, track_count: usize) -> String {
    format!("Found playlist {playlist} which has {track_count} tracks.")
}

/// Now-playing fields for the cursor's current position
pub fn now_playing_fields(cursor: &TrackCursor, config: &SessionConfig) -> Vec<StatusField> {
    let current = cursor.current().map_or_else(String::new, |t| t.title().to_string());
    let previous = cursor
        .peek_previous()
        .map_or_else(|| config.no_previous_placeholder.clone(), title_of);
    let next = cursor
        .peek_next()
        .map_or_else(|| config.no_next_placeholder.clone(), title_of);

    vec![
        StatusField::new("Currently Playing", current),
        StatusField::new("Position", format!("{}/{}", cursor.position(), cursor.total())),
        StatusField::new("Previous", previous),
        StatusField::new("Next", next),
        StatusField::new("Volume", format!("{}/100", cursor.volume_percent())),
    ]
}

fn title_of(track: &Track) -> String {
    track.title().to_string()
}
