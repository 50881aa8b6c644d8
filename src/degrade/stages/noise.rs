use rand::Rng;

/// The noise stage switches on at a lower threshold than the other stages.
pub const NOISE_THRESHOLD: f32 = 0.001;
const NOISE_LEVEL: f32 = 0.05;
const PINK_POLE: f32 = 0.9;
const PINK_MAKEUP: f32 = 3.0;

/// Hiss generator for one channel.
///
/// Pink-leaning noise is approximated by a one-pole low-pass on white noise;
/// its state belongs to the channel so channels never share a filter.
#[derive(Clone, Debug, Default)]
pub struct Hiss {
    pink: f32,
}

impl Hiss {
    pub const fn reset(&mut self) {
        self.pink = 0.0;
    }

    /// Draw one noise sample coloured by the mode's `noise_color`.
    #[inline]
    pub fn next<R: Rng>(&mut self, noise_color: f32, rng: &mut R) -> f32 {
        let white: f32 = rng.random_range(-1.0..=1.0);
        if noise_color < 0.5 {
            self.pink = self.pink.mul_add(PINK_POLE, white * (1.0 - PINK_POLE));
            self.pink * PINK_MAKEUP
        } else {
            white
        }
    }

    #[inline]
    pub fn process<R: Rng>(&mut self, input: f32, amount: f32, noise_color: f32, rng: &mut R) -> f32 {
        if amount <= NOISE_THRESHOLD {
            return input;
        }
        self.next(noise_color, rng).mul_add(amount * NOISE_LEVEL, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn lag_one_correlation(samples: &[f32]) -> f32 {
        let num: f32 = samples.windows(2).map(|w| w[0] * w[1]).sum();
        let den: f32 = samples.iter().map(|s| s * s).sum();
        num / den
    }

    #[test]
    fn silent_below_threshold() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut hiss = Hiss::default();
        assert_eq!(hiss.process(0.25, 0.0005, 1.0, &mut rng), 0.25);
    }

    #[test]
    fn level_scales_with_amount() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut hiss = Hiss::default();
        for _ in 0..10_000 {
            let y = hiss.process(0.0, 1.0, 1.0, &mut rng);
            assert!(y.abs() <= NOISE_LEVEL);
        }
    }

    #[test]
    fn pink_is_correlated_and_white_is_not() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut hiss = Hiss::default();
        let pink: Vec<f32> = (0..20_000).map(|_| hiss.next(0.4, &mut rng)).collect();
        let white: Vec<f32> = (0..20_000).map(|_| hiss.next(0.8, &mut rng)).collect();

        assert!(lag_one_correlation(&pink) > 0.8);
        assert!(lag_one_correlation(&white).abs() < 0.05);
    }

    #[test]
    fn channels_keep_separate_state() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut left = Hiss::default();
        let right = Hiss::default();
        for _ in 0..100 {
            left.next(0.0, &mut rng);
        }
        assert_ne!(left.pink, 0.0);
        assert_eq!(right.pink, 0.0);
    }
}
