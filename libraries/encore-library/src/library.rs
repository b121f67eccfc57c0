//! Playlist directories on local disk
//!
//! Every playlist is a directory under the music root whose audio files are
//! named `<index>.<title_with_delimiters>.<ext>`. The index only drives ordering.

use crate::error::{LibraryError, Result};
use crate::track::Track;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Library settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Root directory holding one subdirectory per playlist
    pub music_dir: PathBuf,

    /// File extensions treated as audio (case-insensitive, without dot)
    pub extensions: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::from("musics"),
            extensions: vec!["mp3".to_string()],
        }
    }
}

/// Name and size of one playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub name: String,
    pub track_count: usize,
}

/// Read-only view over the playlists stored under the music directory
#[derive(Debug, Clone)]
pub struct PlaylistLibrary {
    root: PathBuf,
    extensions: Vec<String>,
}

impl PlaylistLibrary {
    /// Create a library view from settings
    pub fn new(config: LibraryConfig) -> Self {
        let extensions = config
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Self {
            root: config.music_dir,
            extensions,
        }
    }

    /// Root music directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of all playlists, sorted
    ///
    /// A missing music directory simply means there are no playlists yet.
    pub fn playlist_names(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            debug!(root = %self.root.display(), "Music directory does not exist");
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Check whether a playlist directory exists
    pub fn exists(&self, name: &str) -> bool {
        self.playlist_dir(name).is_ok_and(|dir| dir.is_dir())
    }

    /// Ordered tracks of a playlist
    ///
    /// Files carrying an index prefix come first in index order; any others
    /// follow, sorted by file name.
    pub fn tracks(&self, name: &str) -> Result<Vec<Track>> {
        let dir = self.playlist_dir(name)?;
        if !dir.is_dir() {
            return Err(LibraryError::NotFound(name.to_string()));
        }

        let mut entries: Vec<(Track, String)> = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_audio_file(path) {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            entries.push((Track::from_path(path), file_name));
        }

        entries.sort_by(|(a, a_name), (b, b_name)| {
            let a_key = (a.index().is_none(), a.index());
            let b_key = (b.index().is_none(), b.index());
            a_key.cmp(&b_key).then_with(|| a_name.cmp(b_name))
        });

        debug!(playlist = name, tracks = entries.len(), "Loaded playlist");
        Ok(entries.into_iter().map(|(track, _)| track).collect())
    }

    /// Every playlist with its track count
    pub fn summaries(&self) -> Result<Vec<PlaylistSummary>> {
        let mut summaries = Vec::new();
        for name in self.playlist_names()? {
            let track_count = match self.tracks(&name) {
                Ok(tracks) => tracks.len(),
                Err(e) => {
                    warn!(playlist = %name, "Failed to count tracks: {}", e);
                    0
                }
            };
            summaries.push(PlaylistSummary { name, track_count });
        }
        Ok(summaries)
    }

    /// Resolve a playlist name to its directory, rejecting names that are not
    /// a single plain path component
    fn playlist_dir(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => {
                Ok(self.root.join(name))
            }
            _ => Err(LibraryError::InvalidName(name.to_string())),
        }
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library(root: &Path) -> PlaylistLibrary {
        PlaylistLibrary::new(LibraryConfig {
            music_dir: root.to_path_buf(),
            ..LibraryConfig::default()
        })
    }

    #[test]
    fn extensions_are_normalized() {
        let lib = PlaylistLibrary::new(LibraryConfig {
            music_dir: PathBuf::from("/tmp"),
            extensions: vec![".MP3".into(), " flac ".into(), String::new()],
        });
        assert!(lib.is_audio_file(Path::new("/tmp/1.a.mp3")));
        assert!(lib.is_audio_file(Path::new("/tmp/1.a.FLAC")));
        assert!(!lib.is_audio_file(Path::new("/tmp/1.a.txt")));
        assert!(!lib.is_audio_file(Path::new("/tmp/noext")));
    }

    #[test]
    fn rejects_names_escaping_the_root() {
        let lib = library(Path::new("/tmp/music"));
        assert!(matches!(
            lib.playlist_dir(".."),
            Err(LibraryError::InvalidName(_))
        ));
        assert!(matches!(
            lib.playlist_dir("a/b"),
            Err(LibraryError::InvalidName(_))
        ));
        assert!(matches!(
            lib.playlist_dir(""),
            Err(LibraryError::InvalidName(_))
        ));
        assert!(matches!(
            lib.playlist_dir("/etc"),
            Err(LibraryError::InvalidName(_))
        ));
        assert_eq!(
            lib.playlist_dir("road_trip").unwrap(),
            PathBuf::from("/tmp/music/road_trip")
        );
    }

    #[test]
    fn missing_root_has_no_playlists() {
        let lib = library(Path::new("/definitely/not/here"));
        assert!(lib.playlist_names().unwrap().is_empty());
        assert!(!lib.exists("anything"));
    }
}
