//! Song catalog: the live set of declared songs and the scratch blacklist.
//!
//! Songs are kept in declaration order and looked up case-insensitively,
//! first match wins. Scratching removes a song and records its lowercase name
//! forever: later searches for that name fail even if the name is declared
//! again.

pub mod organize;

pub use organize::{camelot_order, SortKey};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Key used for songs declared without one.
pub const UNKNOWN_KEY: &str = "Unknown";

/// A declared song.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub name: String,
    pub artist: String,
    pub genre: String,
    /// File named in the declaration.
    pub file: PathBuf,
    /// File used for analysis. Starts as `file`, replaced by AddAudio.
    pub audio_file: PathBuf,
    /// Detected once at declaration.
    pub bpm: f64,
    /// Camelot key, or [`UNKNOWN_KEY`].
    pub key: String,
}

impl Song {
    pub fn new(
        name: impl Into<String>,
        artist: impl Into<String>,
        genre: impl Into<String>,
        file: impl Into<PathBuf>,
        bpm: f64,
    ) -> Self {
        let file = file.into();
        Self {
            name: name.into(),
            artist: artist.into(),
            genre: genre.into(),
            audio_file: file.clone(),
            file,
            bpm,
            key: UNKNOWN_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
    Found(&'a Song),
    NotFound,
    /// The name was scratched earlier in the run.
    Scratched,
}

/// Declared songs plus the names that can no longer be found.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: Vec<Song>,
    scratched: HashSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a song. Names need not be unique.
    pub fn declare(&mut self, song: Song) {
        self.songs.push(song);
    }

    /// First song with this name, ignoring case and scratch state.
    pub fn get(&self, name: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.matches(name))
    }

    /// Look a song up for display. Scratched names always fail, even when a
    /// song of that name is present again.
    pub fn search(&self, name: &str) -> SearchOutcome<'_> {
        if self.is_scratched(name) {
            return SearchOutcome::Scratched;
        }
        match self.get(name) {
            Some(song) => SearchOutcome::Found(song),
            None => SearchOutcome::NotFound,
        }
    }

    /// Remove the first song with this name and blacklist the name.
    ///
    /// Returns the removed song, or `None` (blacklist unchanged) on a miss.
    pub fn scratch(&mut self, name: &str) -> Option<Song> {
        let idx = self.songs.iter().position(|s| s.matches(name))?;
        let song = self.songs.remove(idx);
        self.scratched.insert(song.name.to_lowercase());
        Some(song)
    }

    /// Replace the audio file of the first song with this name.
    ///
    /// BPM is not re-detected. Returns the updated song on success.
    pub fn set_audio_file(&mut self, name: &str, path: &Path) -> Option<&Song> {
        let song = self.songs.iter_mut().find(|s| s.matches(name))?;
        song.audio_file = path.to_path_buf();
        Some(song)
    }

    /// Whether this name was ever scratched, ignoring case.
    pub fn is_scratched(&self, name: &str) -> bool {
        self.scratched.contains(&name.to_lowercase())
    }

    /// Songs in catalog order.
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Number of live songs.
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}
