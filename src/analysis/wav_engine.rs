//! WAV analysis engine: onset-based tempo estimation and segment scoring.
//!
//! Tempo is the strongest periodicity of the onset envelope within the
//! 70–180 BPM band. Mix points come from cutting the track into equal
//! segments of `bars` beats and picking the one whose onsets repeat most
//! strongly at the beat period while staying quiet overall.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::AnalysisConfig;

use super::onset::{self, HOP};
use super::{format_time, AnalysisError, AudioAnalyzer, MixPoints, Waveform};

const MIN_DETECT_BPM: f64 = 70.0;
const MAX_DETECT_BPM: f64 = 180.0;

/// Beat-period multiples averaged into the repetitiveness score.
const REPEAT_PERIODS: usize = 4;

/// Analyzer over PCM WAV files.
#[derive(Debug, Clone, Default)]
pub struct WavAnalyzer {
    config: AnalysisConfig,
}

impl WavAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Tempo estimate without the fallback.
    pub fn estimate_bpm(&self, path: &Path) -> Result<f64, AnalysisError> {
        let mut wave = Waveform::open(path)?;
        wave.truncate_secs(self.config.max_duration_secs);
        estimate_bpm(&wave).ok_or(AnalysisError::NoTempo)
    }

    /// Score every segment of `wave` and pick the best one.
    pub fn mix_points_for(
        &self,
        wave: &Waveform,
        bpm: f64,
        bars: u32,
    ) -> Result<MixPoints, AnalysisError> {
        let sample_rate = wave.sample_rate() as f64;
        let samples_per_beat = (60.0 / bpm * sample_rate) as usize;
        let samples_per_segment = samples_per_beat * bars.max(1) as usize;
        if samples_per_segment == 0 {
            return Err(AnalysisError::TooShort);
        }

        let count = (wave.len() / samples_per_segment).min(self.config.max_segments);
        if count == 0 {
            return Err(AnalysisError::TooShort);
        }

        let beat_frames = samples_per_beat as f64 / HOP as f64;
        let scores: Vec<f32> = wave
            .samples()
            .chunks_exact(samples_per_segment)
            .take(count)
            .map(|segment| score_segment(segment, beat_frames))
            .collect();
        debug!(?scores, "segment scores");

        // All segments silent: fall back to the first one.
        let best = onset::argmax_in(&scores, 0, scores.len()).unwrap_or(0);

        let segment_secs = samples_per_segment as f64 / sample_rate;
        let mix_in = best as f64 * segment_secs;
        let mix_out = mix_in + self.config.mix_out_beats as f64 * 60.0 / bpm;

        Ok(MixPoints {
            segment_index: best,
            mix_in_time: format_time(mix_in),
            mix_out_time: format_time(mix_out),
        })
    }
}

impl AudioAnalyzer for WavAnalyzer {
    fn detect_bpm(&self, path: &Path) -> f64 {
        match self.estimate_bpm(path) {
            Ok(bpm) => {
                debug!(path = %path.display(), bpm, "detected BPM");
                bpm
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    fallback = self.config.fallback_bpm,
                    "BPM detection failed, using fallback"
                );
                self.config.fallback_bpm
            }
        }
    }

    fn find_mix_points(
        &self,
        path: &Path,
        bpm: f64,
        bars: u32,
    ) -> Result<MixPoints, AnalysisError> {
        let wave = Waveform::open(path)?;
        self.mix_points_for(&wave, bpm, bars)
    }
}

/// Strongest onset periodicity in the detection band, rounded to 0.1 BPM.
pub fn estimate_bpm(wave: &Waveform) -> Option<f64> {
    let frame_rate = wave.sample_rate() as f64 / HOP as f64;
    let envelope = onset::onset_envelope(&onset::frame_rms(wave.samples(), HOP));

    let lo = (60.0 * frame_rate / MAX_DETECT_BPM).ceil() as usize;
    let hi = (60.0 * frame_rate / MIN_DETECT_BPM).floor() as usize + 1;
    let ac = onset::autocorrelation(&envelope, hi);

    let lag = onset::argmax_in(&ac, lo.max(1), hi)?;
    if ac[lag] <= 0.0 {
        return None;
    }
    let bpm = 60.0 * frame_rate / lag as f64;
    Some((bpm * 10.0).round() / 10.0)
}

/// Blend suitability of one segment. Higher is better; silence is `-inf`.
fn score_segment(segment: &[f32], beat_frames: f64) -> f32 {
    let peak = segment.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak == 0.0 || !peak.is_finite() {
        return f32::NEG_INFINITY;
    }
    let normalized: Vec<f32> = segment.iter().map(|s| s / peak).collect();

    let rms = onset::frame_rms(&normalized, HOP);
    let envelope = onset::onset_envelope(&rms);
    let loudness = onset::mean(&rms);
    let beat_strength = onset::mean(&envelope);

    let centred: Vec<f32> = envelope.iter().map(|e| e - beat_strength).collect();
    let max_lag = (beat_frames * REPEAT_PERIODS as f64).round() as usize + 1;
    let ac = onset::autocorrelation(&centred, max_lag);

    let repetitiveness = match ac.first() {
        Some(&zero) if zero > 0.0 => {
            let lags: Vec<f32> = (1..=REPEAT_PERIODS)
                .map(|k| (beat_frames * k as f64).round() as usize)
                .filter(|&lag| lag > 0 && lag < ac.len())
                .map(|lag| ac[lag] / zero)
                .collect();
            onset::mean(&lags)
        }
        _ => 0.0,
    };

    repetitiveness * 0.5 + beat_strength * 0.5 - sustained_ratio(&rms, &envelope) * 0.3 - loudness * 0.2
}

/// Share of frame energy that is held rather than struck, in `[0, 1]`.
///
/// Tonal and vocal passages keep their energy between onsets and score near
/// 1; percussive material scores low.
fn sustained_ratio(rms: &[f32], envelope: &[f32]) -> f32 {
    let total: f32 = rms.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let struck: f32 = envelope.iter().sum();
    ((total - struck) / total).clamp(0.0, 1.0)
}
