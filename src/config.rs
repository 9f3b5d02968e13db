//! Engine configuration: loads optional ~/.djset/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Segment length in bars when neither the command nor the config gives one.
pub const DEFAULT_BARS: u32 = 8;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Tuning for the audio analysis engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Segment length in bars when an Analyze command gives none.
    pub default_bars: u32,
    /// Upper bound on the number of segments scored per file.
    pub max_segments: usize,
    /// BPM reported when detection fails.
    pub fallback_bpm: f64,
    /// Length of the mix-out window, in beats.
    pub mix_out_beats: u32,
    /// Seconds of audio read for BPM detection.
    pub max_duration_secs: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_bars: DEFAULT_BARS,
            max_segments: 50,
            fallback_bpm: 120.0,
            mix_out_beats: 32,
            max_duration_secs: 30.0,
        }
    }
}

/// Default config location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".djset").join("config.yaml"))
}

impl EngineConfig {
    /// Load from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the default location, falling back to defaults when the
    /// home directory cannot be determined.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}
