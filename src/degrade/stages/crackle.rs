use rand::Rng;

use super::ACTIVE_THRESHOLD;

const TRIGGER_SCALE: f32 = 0.002;
const MIN_POP: f32 = 0.3;
const POP_SPREAD: f32 = 0.7;
pub const DECAY: f32 = 0.85;

/// Vinyl crackle for one channel: randomly triggered pops with a fast
/// exponential decay.
#[derive(Clone, Debug, Default)]
pub struct Crackle {
    envelope: f32,
}

impl Crackle {
    pub const fn reset(&mut self) {
        self.envelope = 0.0;
    }

    /// Current signed envelope.
    pub const fn envelope(&self) -> f32 {
        self.envelope
    }

    /// Start a pop with a random magnitude in [0.3, 1.0] and random sign.
    pub fn trigger<R: Rng>(&mut self, rng: &mut R) {
        let magnitude = rng.random::<f32>().mul_add(POP_SPREAD, MIN_POP);
        self.envelope = if rng.random::<f32>() > 0.5 {
            magnitude
        } else {
            -magnitude
        };
    }

    /// Decay the envelope by one sample.
    #[inline]
    pub fn decay(&mut self) {
        self.envelope *= DECAY;
    }

    /// Add crackle to `input`. `amount` is the raw 0..100 control value; the
    /// age multiplier only raises the pop rate, not the level.
    ///
    /// Returns `None` when the stage is off, so the caller can tell an idle
    /// stage from a silent envelope.
    #[inline]
    pub fn process<R: Rng>(
        &mut self,
        input: f32,
        amount: f32,
        age_mult: f32,
        rng: &mut R,
    ) -> Option<f32> {
        if amount <= ACTIVE_THRESHOLD {
            return None;
        }

        if rng.random::<f32>() < amount * TRIGGER_SCALE * age_mult {
            self.trigger(rng);
        }
        self.decay();

        Some(self.envelope.mul_add(amount / 100.0, input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn envelope_decays_geometrically() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut crackle = Crackle::default();
        crackle.trigger(&mut rng);

        let start = crackle.envelope().abs();
        assert!((MIN_POP..=1.0).contains(&start));

        let mut prev = start;
        for _ in 0..200 {
            crackle.decay();
            let now = crackle.envelope().abs();
            assert!(now < prev || now == 0.0);
            if prev > 1e-30 {
                assert!((now - prev * DECAY).abs() <= prev * 1e-6);
            }
            prev = now;
        }
        assert!(prev < 1e-12);
    }

    #[test]
    fn off_below_threshold() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut crackle = Crackle::default();
        assert_eq!(crackle.process(0.3, 0.0, 1.0, &mut rng), None);
    }

    #[test]
    fn pops_appear_and_stay_bounded() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut crackle = Crackle::default();
        let mut popped = false;
        for _ in 0..10_000 {
            let y = crackle.process(0.0, 50.0, 1.0, &mut rng).unwrap();
            assert!(y.abs() <= 0.5);
            popped |= y != 0.0;
        }
        assert!(popped);
    }

    #[test]
    fn both_polarities_occur() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut crackle = Crackle::default();
        let (mut pos, mut neg) = (false, false);
        for _ in 0..100 {
            crackle.trigger(&mut rng);
            pos |= crackle.envelope() > 0.0;
            neg |= crackle.envelope() < 0.0;
        }
        assert!(pos && neg);
    }
}
