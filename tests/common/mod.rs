//! WAV fixtures shared by the integration tests.

use std::path::{Path, PathBuf};

pub const SR: u32 = 22050;

/// Click track: a decaying 1 kHz burst on every beat.
pub fn click_track(bpm: f64, secs: f64) -> Vec<f32> {
    let total = (secs * SR as f64) as usize;
    let period = 60.0 / bpm * SR as f64;
    let click_len = 220usize;
    let mut out = vec![0.0f32; total];
    let mut beat = 0usize;
    loop {
        let start = (beat as f64 * period) as usize;
        if start >= total {
            break;
        }
        for i in 0..click_len.min(total - start) {
            let t = i as f32 / SR as f32;
            let decay = 1.0 - i as f32 / click_len as f32;
            out[start + i] = 0.9 * decay * (2.0 * std::f32::consts::PI * 1000.0 * t).sin();
        }
        beat += 1;
    }
    out
}

/// Write mono 16-bit PCM.
pub fn write_wav(dir: &Path, name: &str, samples: &[f32]) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SR,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for &s in samples {
        writer.write_sample((s * i16::MAX as f32) as i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}
