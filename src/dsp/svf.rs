use std::f32::consts::{FRAC_1_SQRT_2, PI};

/// Response taken from the state-variable filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SvfType {
    Lowpass,
    Highpass,
}

/// Coefficients of a topology-preserving-transform state-variable filter.
///
/// Based on the trapezoidal-integrated SVF described by Andrew Simper:
/// <https://cytomic.com/files/dsp/SvfLinearTrapOptimised2.pdf>
#[derive(Copy, Clone, Debug)]
pub struct SvfCoeff {
    g: f32,
    r2: f32,
    h: f32,
}

impl SvfCoeff {
    /// Lowest accepted Q; below this the damping term explodes.
    pub const MIN_Q: f32 = 0.05;

    pub fn new(cutoff_hz: f32, q: f32, sample_rate: f32) -> Self {
        // Keep the prewarped frequency below Nyquist so tan() stays finite.
        let cutoff = cutoff_hz.clamp(1.0, (sample_rate * 0.49).max(1.0));
        let g = (PI * cutoff / sample_rate).tan();
        let r2 = 1.0 / q.max(Self::MIN_Q);
        let h = 1.0 / (1.0 + r2 * g + g * g);
        Self { g, r2, h }
    }

    pub fn butterworth(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self::new(cutoff_hz, FRAC_1_SQRT_2, sample_rate)
    }
}

/// Per-channel integrator state.
#[derive(Copy, Clone, Debug, Default)]
pub struct SvfState {
    s1: f32,
    s2: f32,
}

impl SvfState {
    pub const fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }

    #[inline]
    pub fn process(&mut self, input: f32, coeff: &SvfCoeff, filter_type: SvfType) -> f32 {
        let SvfCoeff { g, r2, h } = *coeff;

        let hp = (input - (r2 + g) * self.s1 - self.s2) * h;
        let v1 = g * hp;
        let bp = v1 + self.s1;
        self.s1 = bp + v1;
        let v2 = g * bp;
        let lp = v2 + self.s2;
        self.s2 = lp + v2;

        let output = match filter_type {
            SvfType::Lowpass => lp,
            SvfType::Highpass => hp,
        };

        if output.is_finite() {
            output
        } else {
            self.reset();
            0.0
        }
    }
}
