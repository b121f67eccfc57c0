//! Track type and title derivation from stored file names

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Character used in stored file names in place of whitespace
pub const TITLE_DELIMITER: char = '_';

/// Title used when a file name yields nothing displayable
const UNKNOWN_TITLE: &str = "Unknown title";

/// One playable audio file
///
/// Immutable once created. The title is derived from the file name and the
/// on-disk index is kept only for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    path: PathBuf,
    title: String,
    index: Option<u32>,
}

impl Track {
    /// Create a track with an explicit title
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            index: None,
        }
    }

    /// Create a track from a stored file, deriving title and index from its name
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let (index, title) = split_file_name(file_name);

        Self {
            path,
            title,
            index,
        }
    }

    /// File path handed to the playback engine
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// 1-based on-disk ordinal, if the file name carries one
    pub fn index(&self) -> Option<u32> {
        self.index
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Derive the display title from a stored file name
///
/// `"3.Night_Drive.mp3"` becomes `"Night Drive"`. Names without an index
/// prefix keep their whole stem.
pub fn title_from_file_name(file_name: &str) -> String {
    split_file_name(file_name).1
}

fn split_file_name(file_name: &str) -> (Option<u32>, String) {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => file_name,
    };

    let (index, raw_title) = match stem.split_once('.') {
        Some((prefix, rest)) => match prefix.parse::<u32>() {
            Ok(index) => (Some(index), rest),
            Err(_) => (None, stem),
        },
        None => (None, stem),
    };

    let title = raw_title
        .split(TITLE_DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        (index, UNKNOWN_TITLE.to_string())
    } else {
        (index, title)
    }
}
