//! Plain-text listings shown in the status display

use crate::library::PlaylistSummary;
use crate::track::Track;

/// One line per playlist: `"1. name which has N tracks."`
pub fn format_playlist_listing(summaries: &[PlaylistSummary]) -> String {
    if summaries.is_empty() {
        return "No playlist found.".to_string();
    }

    summaries
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {} which has {} tracks.", i + 1, s.name, s.track_count))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per track: `"1. Title"`
pub fn format_track_listing(tracks: &[Track]) -> String {
    if tracks.is_empty() {
        return "No tracks found.".to_string();
    }

    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, t.title()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listings_use_placeholders() {
        assert_eq!(format_playlist_listing(&[]), "No playlist found.");
        assert_eq!(format_track_listing(&[]), "No tracks found.");
    }

    #[test]
    fn playlists_are_numbered_with_counts() {
        let summaries = vec![
            PlaylistSummary {
                name: "focus".into(),
                track_count: 1,
            },
            PlaylistSummary {
                name: "road_trip".into(),
                track_count: 12,
            },
        ];
        assert_eq!(
            format_playlist_listing(&summaries),
            "1. focus which has 1 tracks.\n2. road_trip which has 12 tracks."
        );
    }

    #[test]
    fn tracks_are_numbered_by_position_not_file_index() {
        let tracks = vec![
            Track::from_path("/m/p/4.Later_One.mp3"),
            Track::from_path("/m/p/9.Last_One.mp3"),
        ];
        assert_eq!(format_track_listing(&tracks), "1. Later One\n2. Last One");
    }
}
