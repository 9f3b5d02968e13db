//! Audio analysis gateway: BPM detection and mix-point suggestion.
//!
//! The engine talks to an [`AudioAnalyzer`] only through [`analyze_mix`] and
//! [`AudioAnalyzer::detect_bpm`]. Calls are synchronous and uncached.

pub mod onset;
pub mod waveform;
pub mod wav_engine;

pub use waveform::Waveform;
pub use wav_engine::WavAnalyzer;

use std::path::Path;

use thiserror::Error;

/// Lowest BPM accepted for mix analysis.
pub const MIN_BPM: f64 = 40.0;

/// Soft failures of an analysis request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid BPM {0} (must be at least 40)")]
    InvalidBpm(f64),

    #[error("audio file is too short to create even a single segment")]
    TooShort,

    #[error("cannot decode audio: {0}")]
    Decode(#[from] hound::Error),

    #[error("audio file contains no samples")]
    Empty,

    #[error("no tempo found")]
    NoTempo,
}

/// Suggested blend window for a track.
#[derive(Debug, Clone, PartialEq)]
pub struct MixPoints {
    /// Zero-based index of the chosen segment.
    pub segment_index: usize,
    /// `M:SS.SS`
    pub mix_in_time: String,
    /// `M:SS.SS`
    pub mix_out_time: String,
}

/// An audio analysis engine.
pub trait AudioAnalyzer {
    /// Estimate the tempo of a file. Implementations fall back to a fixed
    /// value rather than failing.
    fn detect_bpm(&self, path: &Path) -> f64;

    /// Score segments of `bars` beats at `bpm` and pick the best blend window.
    fn find_mix_points(&self, path: &Path, bpm: f64, bars: u32)
        -> Result<MixPoints, AnalysisError>;

    /// Whether a declared song's audio is present.
    fn audio_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// BPM used for a request: the given one, or a detected one.
pub fn resolve_bpm(analyzer: &dyn AudioAnalyzer, path: &Path, bpm: Option<f64>) -> f64 {
    match bpm {
        Some(bpm) => bpm,
        None => analyzer.detect_bpm(path),
    }
}

/// Outcome of a successful analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct MixReport {
    /// BPM the segments were cut at.
    pub bpm: f64,
    pub points: MixPoints,
}

/// Find mix points for `path`, detecting the BPM when none is given.
///
/// Fails with [`AnalysisError::InvalidBpm`] before the segment analysis runs
/// when the resolved BPM is below [`MIN_BPM`].
pub fn analyze_mix(
    analyzer: &dyn AudioAnalyzer,
    path: &Path,
    bpm: Option<f64>,
    bars: u32,
) -> Result<MixReport, AnalysisError> {
    let bpm = resolve_bpm(analyzer, path, bpm);
    if bpm.is_nan() || bpm < MIN_BPM {
        return Err(AnalysisError::InvalidBpm(bpm));
    }
    let points = analyzer.find_mix_points(path, bpm, bars)?;
    Ok(MixReport { bpm, points })
}

/// Format seconds as `M:SS.SS`.
pub fn format_time(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor();
    let rest = seconds - minutes * 60.0;
    format!("{}:{:05.2}", minutes as u64, rest)
}
