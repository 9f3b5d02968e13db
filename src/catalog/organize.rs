//! Sorted views of the catalog.

use std::str::FromStr;

use crate::engine::value::format_float;
use crate::engine::EngineError;

use super::Song;

/// Attribute a listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Ascending tempo.
    Bpm,
    /// Descending, case-insensitive.
    SongName,
    /// Descending, case-insensitive.
    Artist,
    /// Ascending Camelot wheel position, unparseable keys last.
    Key,
}

impl FromStr for SortKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bpm" => Ok(SortKey::Bpm),
            "song name" => Ok(SortKey::SongName),
            "artist" => Ok(SortKey::Artist),
            "key" => Ok(SortKey::Key),
            other => Err(EngineError::InvalidIdentifier(other.to_string())),
        }
    }
}

impl SortKey {
    /// Sort a copy of `songs`. The sort is stable.
    pub fn sort<'a>(self, songs: impl IntoIterator<Item = &'a Song>) -> Vec<&'a Song> {
        let mut sorted: Vec<&Song> = songs.into_iter().collect();
        match self {
            SortKey::Bpm => sorted.sort_by(|a, b| a.bpm.total_cmp(&b.bpm)),
            SortKey::SongName => {
                sorted.sort_by_cached_key(|s| std::cmp::Reverse(s.name.to_lowercase()))
            }
            SortKey::Artist => {
                sorted.sort_by_cached_key(|s| std::cmp::Reverse(s.artist.to_lowercase()))
            }
            SortKey::Key => {
                sorted.sort_by(|a, b| camelot_order(&a.key).total_cmp(&camelot_order(&b.key)))
            }
        }
        sorted
    }

    /// One listing line for a song.
    pub fn describe(self, song: &Song) -> String {
        match self {
            SortKey::SongName | SortKey::Artist => format!("{} by {}", song.name, song.artist),
            SortKey::Bpm => format!("{} (BPM: {})", song.name, format_float(song.bpm)),
            SortKey::Key => format!("{} (Key: {})", song.name, song.key),
        }
    }
}

/// Position of a Camelot key on the wheel.
///
/// `nA` maps to `n`, `nB` to `n + 12`. Anything else is `+inf` so that it
/// sorts after every valid key.
pub fn camelot_order(key: &str) -> f64 {
    let key = key.trim();
    let Some(letter) = key.chars().last() else {
        return f64::INFINITY;
    };
    let number = &key[..key.len() - letter.len_utf8()];
    let offset = match letter {
        'A' | 'a' => 0.0,
        'B' | 'b' => 12.0,
        _ => return f64::INFINITY,
    };
    match number.parse::<u32>() {
        Ok(n) => n as f64 + offset,
        Err(_) => f64::INFINITY,
    }
}
