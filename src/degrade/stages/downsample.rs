use super::ACTIVE_THRESHOLD;

pub const MAX_HOLD_FACTOR: f32 = 64.0;

/// Sample-and-hold state for one channel.
#[derive(Clone, Debug, Default)]
pub struct SampleHold {
    held: f32,
    counter: f32,
}

/// Hold length in samples for a scaled amount, in [1, 64].
#[inline]
pub fn hold_factor(amount: f32) -> f32 {
    (1.0 + amount * (MAX_HOLD_FACTOR - 1.0)).clamp(1.0, MAX_HOLD_FACTOR)
}

impl SampleHold {
    pub const fn reset(&mut self) {
        self.held = 0.0;
        self.counter = 0.0;
    }

    /// Re-sample at `sample_rate / factor`. The counter keeps its fractional
    /// remainder so non-integer factors still average out to the right rate.
    #[inline]
    pub fn process(&mut self, input: f32, amount: f32) -> f32 {
        if amount <= ACTIVE_THRESHOLD {
            return input;
        }

        let factor = hold_factor(amount);
        self.counter += 1.0;
        if self.counter >= factor {
            self.held = input;
            self.counter -= factor;
        }
        self.held
    }
}
