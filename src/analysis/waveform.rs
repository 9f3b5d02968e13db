//! Waveform loading: WAV decoding and mono mixdown.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::AnalysisError;

/// A mono audio buffer at its source sample rate.
#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Create from raw mono f32 samples.
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Open a WAV file from disk.
    pub fn open(path: &Path) -> Result<Self, AnalysisError> {
        let file = File::open(path).map_err(hound::Error::IoError)?;
        Self::from_wav(BufReader::new(file))
    }

    /// Decode a WAV stream, mixing all channels down to mono.
    ///
    /// Integer formats of any bit depth up to 32 and 32-bit float are
    /// supported. Integer samples are scaled to `[-1.0, 1.0)`.
    pub fn from_wav<R: Read>(reader: R) -> Result<Self, AnalysisError> {
        let wav = hound::WavReader::new(reader)?;
        let spec = wav.spec();
        let channels = spec.channels.max(1) as usize;

        let raw: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max_val = (1u64 << (spec.bits_per_sample - 1)) as f32;
                wav.into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<Result<Vec<f32>, _>>()?
            }
            hound::SampleFormat::Float => {
                wav.into_samples::<f32>().collect::<Result<Vec<f32>, _>>()?
            }
        };

        if raw.is_empty() {
            return Err(AnalysisError::Empty);
        }

        let mono = if channels == 1 {
            raw
        } else {
            raw.chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };

        Ok(Self {
            samples: mono,
            sample_rate: spec.sample_rate,
        })
    }

    /// Keep at most the first `seconds` of audio.
    pub fn truncate_secs(&mut self, seconds: f64) {
        let max = (seconds.max(0.0) * self.sample_rate as f64) as usize;
        self.samples.truncate(max);
    }

    /// Mono samples in `[-1.0, 1.0]`.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
