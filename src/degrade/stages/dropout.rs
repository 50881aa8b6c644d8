use rand::Rng;

const TRIGGER_SCALE: f32 = 0.0001;
const MIN_LENGTH: f32 = 50.0;
const LENGTH_SPREAD: f32 = 500.0;
const FADE_OUT: f32 = 10.0;
const FADE_IN: f32 = 50.0;

/// Tape dropout state machine.
///
/// One instance is shared by every channel and stepped once per frame, so a
/// dropout gates the whole stereo image at the same instant.
#[derive(Clone, Debug)]
pub struct Dropout {
    active: bool,
    timer: f32,
    length: f32,
    envelope: f32,
}

impl Default for Dropout {
    fn default() -> Self {
        Self {
            active: false,
            timer: 0.0,
            length: 0.0,
            envelope: 1.0,
        }
    }
}

/// Gain of an episode of `length` frames, `timer` frames in.
#[inline]
pub fn envelope_at(timer: f32, length: f32) -> f32 {
    let env = if timer < FADE_OUT {
        1.0 - timer / FADE_OUT
    } else if timer > length - FADE_IN {
        (timer - (length - FADE_IN)) / FADE_IN
    } else {
        0.0
    };
    env.clamp(0.0, 1.0)
}

impl Dropout {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Step one frame and return the gain to apply.
    ///
    /// `amount` is the raw 0..100 control value. Callers skip this entirely
    /// when dropouts are off for the block.
    pub fn next_gain<R: Rng>(&mut self, amount: f32, age_mult: f32, rng: &mut R) -> f32 {
        if !self.active && rng.random::<f32>() < amount * TRIGGER_SCALE * age_mult {
            self.active = true;
            self.timer = 0.0;
            self.length = rng.random::<f32>().mul_add(LENGTH_SPREAD, MIN_LENGTH);
        }

        if self.active {
            self.timer += 1.0;
            if self.timer < self.length {
                self.envelope = envelope_at(self.timer, self.length);
            } else {
                self.active = false;
                self.envelope = 1.0;
            }
        }

        self.envelope
    }
}
