//! Ordered track list with a position pointer
//!
//! The cursor is pure data: it never talks to the engine. Navigation at the
//! list bounds is a no-op returning `None`.

use crate::shuffle::{shuffle_tracks, shuffle_tracks_with};
use encore_library::Track;
use rand::Rng;

/// Track list, position, volume and UI expansion flag of one session
#[derive(Debug, Clone)]
pub struct TrackCursor {
    tracks: Vec<Track>,

    /// Index into `tracks`; always 0 when the list is empty
    idx: usize,

    /// Output volume (0.0-1.0)
    volume: f32,

    /// Whether the secondary control row is shown
    expanded: bool,
}

impl TrackCursor {
    /// Create a cursor positioned at the first track
    pub fn new(tracks: Vec<Track>, volume: f32) -> Self {
        let mut cursor = Self {
            tracks,
            idx: 0,
            volume: 0.0,
            expanded: false,
        };
        cursor.set_volume(volume);
        cursor
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.idx)
    }

    /// Move forward one track
    ///
    /// Returns the new current track, or `None` (without moving) at the end.
    pub fn advance(&mut self) -> Option<&Track> {
        if self.at_last() {
            return None;
        }
        self.idx += 1;
        self.tracks.get(self.idx)
    }

    /// Move back one track
    ///
    /// Returns the new current track, or `None` (without moving) at the start.
    pub fn retreat(&mut self) -> Option<&Track> {
        if self.at_first() {
            return None;
        }
        self.idx -= 1;
        self.tracks.get(self.idx)
    }

    pub fn at_first(&self) -> bool {
        self.idx == 0
    }

    pub fn at_last(&self) -> bool {
        self.idx + 1 >= self.tracks.len()
    }

    /// Track after the current one, if any
    pub fn peek_next(&self) -> Option<&Track> {
        self.tracks.get(self.idx + 1)
    }

    /// Track before the current one, if any
    pub fn peek_previous(&self) -> Option<&Track> {
        self.idx.checked_sub(1).and_then(|i| self.tracks.get(i))
    }

    /// 1-based position of the current track (0 for an empty list)
    pub fn position(&self) -> usize {
        if self.tracks.is_empty() {
            0
        } else {
            self.idx + 1
        }
    }

    /// Zero-based index of the current track
    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn total(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Randomly permute the whole list and rewind to the first track
    pub fn shuffle(&mut self) {
        shuffle_tracks(&mut self.tracks);
        self.idx = 0;
    }

    /// Like [`shuffle`](Self::shuffle), with a caller-supplied RNG
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        shuffle_tracks_with(&mut self.tracks, rng);
        self.idx = 0;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the volume, clamped into 0.0-1.0
    ///
    /// The stored value is rounded to hundredths so repeated steps land
    /// exactly on the bounds. NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let clamped = volume.clamp(0.0, 1.0);
        self.volume = (clamped * 100.0).round() / 100.0;
    }

    /// Volume as a whole percentage (0-100)
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0).round() as u8
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }
}
