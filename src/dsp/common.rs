/// Convert decibels to linear amplitude.
#[inline]
pub fn db_to_lin(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Replace NaN and infinities with silence.
#[inline]
pub fn sanitize(sample: f32) -> f32 {
    if sample.is_finite() { sample } else { 0.0 }
}

/// Pole of the DC blocker for a given sample rate: `1 - 20 / sample_rate`.
#[inline]
pub fn dc_coefficient(sample_rate: f32) -> f32 {
    (1.0 - 20.0 / sample_rate).clamp(0.0, 0.9999)
}

/// DC blocker using a first-order high-pass filter.
///
/// `y[n] = x[n] - x[n-1] + R * y[n-1]`
///
/// Reference: <https://ccrma.stanford.edu/~jos/fp/DC_Blocker.html>
#[derive(Clone, Debug)]
pub struct DcBlocker {
    x_prev: f32,
    y_prev: f32,
}

impl Default for DcBlocker {
    fn default() -> Self {
        Self::new()
    }
}

impl DcBlocker {
    pub const fn new() -> Self {
        Self {
            x_prev: 0.0,
            y_prev: 0.0,
        }
    }

    pub const fn reset(&mut self) {
        self.x_prev = 0.0;
        self.y_prev = 0.0;
    }

    #[inline]
    pub fn process(&mut self, input: f32, coeff: f32) -> f32 {
        let output = sanitize(coeff.mul_add(self.y_prev, input - self.x_prev));
        self.x_prev = input;
        self.y_prev = output;
        output
    }
}

/// Root-mean-square level of a block. Empty blocks read as silence.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Largest absolute sample value of a block.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unity_gain_at_zero_db() {
        assert_eq!(db_to_lin(0.0), 1.0);
        assert!((db_to_lin(-24.0) - 0.063_095_73).abs() < 1e-6);
        assert!((db_to_lin(12.0) - 3.981_071_7).abs() < 1e-5);
    }

    #[test]
    fn dc_blocker_rejects_constant_input() {
        let coeff = dc_coefficient(48_000.0);
        let mut dc = DcBlocker::new();

        let mut out = 0.0;
        for _ in 0..48_000 {
            out = dc.process(0.5, coeff);
        }
        assert!(out.abs() < 0.01, "DC not removed: {out}");

        // Let it settle further; the output keeps shrinking towards zero.
        let before = out.abs();
        for _ in 0..48_000 {
            out = dc.process(0.5, coeff);
        }
        assert!(out.abs() < before);
    }

    #[test]
    fn dc_blocker_passes_audio_band() {
        let coeff = dc_coefficient(48_000.0);
        let mut dc = DcBlocker::new();
        let mut acc = 0.0;
        for i in 0..4800 {
            let x = (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 48_000.0).sin();
            let y = dc.process(x, coeff);
            if i >= 2400 {
                acc += y.abs();
            }
        }
        // Mean |sin| is 2/pi.
        let avg = acc / 2400.0;
        assert!((avg - 0.6366).abs() < 0.02, "1 kHz attenuated: {avg}");
    }

    #[test]
    fn sanitize_replaces_non_finite() {
        assert_eq!(sanitize(f32::NAN), 0.0);
        assert_eq!(sanitize(f32::INFINITY), 0.0);
        assert_eq!(sanitize(-0.25), -0.25);
    }

    #[test]
    fn block_levels() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&[0.5, -0.5, 0.5, -0.5]) - 0.5).abs() < 1e-6);
        assert_eq!(peak(&[0.1, -0.7, 0.3]), 0.7);
    }
}
