//! Onset envelope and autocorrelation helpers shared by BPM detection and
//! segment scoring.

/// Samples per analysis frame.
pub const HOP: usize = 256;

/// RMS of consecutive non-overlapping frames of `hop` samples. A trailing
/// partial frame is dropped.
pub fn frame_rms(samples: &[f32], hop: usize) -> Vec<f32> {
    samples
        .chunks_exact(hop)
        .map(|frame| (frame.iter().map(|s| s * s).sum::<f32>() / hop as f32).sqrt())
        .collect()
}

/// Half-wave rectified first difference of the frame energy.
///
/// The first frame has no predecessor and is measured against silence.
pub fn onset_envelope(rms: &[f32]) -> Vec<f32> {
    let mut prev = 0.0;
    rms.iter()
        .map(|&r| {
            let rise = (r - prev).max(0.0);
            prev = r;
            rise
        })
        .collect()
}

/// Raw autocorrelation `sum(x[n] * x[n + lag])` for lags `0..max_lag`.
pub fn autocorrelation(signal: &[f32], max_lag: usize) -> Vec<f32> {
    let max_lag = max_lag.min(signal.len());
    (0..max_lag)
        .map(|lag| {
            signal[..signal.len() - lag]
                .iter()
                .zip(&signal[lag..])
                .map(|(a, b)| a * b)
                .sum::<f32>()
        })
        .collect()
}

/// Index of the first maximum in `lo..hi`, ignoring non-finite values.
pub fn argmax_in(values: &[f32], lo: usize, hi: usize) -> Option<usize> {
    let hi = hi.min(values.len());
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate().take(hi).skip(lo) {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}
