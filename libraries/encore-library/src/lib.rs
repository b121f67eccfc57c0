//! Encore - Local Playlist Library
//!
//! Resolves playlists stored on disk into ordered tracks.
//!
//! This crate provides:
//! - `Track`: a playable file plus its display title
//! - Title derivation from stored file names (`<index>.<title_with_delimiters>.<ext>`)
//! - `PlaylistLibrary`: listing, lookup and ordered loading of playlist directories
//! - Plain-text listings for playlists and their tracks
//!
//! # Layout
//!
//! ```text
//! <music_dir>/
//!   road_trip/
//!     1.Highway_Song.mp3
//!     2.Night_Drive.mp3
//!   focus/
//!     1.Deep_Work.mp3
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use encore_library::{PlaylistLibrary, LibraryConfig};
//!
//! let library = PlaylistLibrary::new(LibraryConfig::default());
//! for summary in library.summaries()? {
//!     println!("{} ({} tracks)", summary.name, summary.track_count);
//! }
//!
//! let tracks = library.tracks("road_trip")?;
//! assert!(tracks.iter().all(|t| !t.title().is_empty()));
//! # Ok::<(), encore_library::LibraryError>(())
//! ```

mod error;
mod format;
mod library;
mod track;

pub use error::{LibraryError, Result};
pub use format::{format_playlist_listing, format_track_listing};
pub use library::{LibraryConfig, PlaylistLibrary, PlaylistSummary};
pub use track::{title_from_file_name, Track, TITLE_DELIMITER};
