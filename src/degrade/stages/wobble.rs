use std::f32::consts::TAU;

use super::ACTIVE_THRESHOLD;

pub const DELAY_CAPACITY: usize = 4096;
/// Centre of the modulated read lag, in samples.
pub const BASE_DELAY: f32 = 512.0;

const WOW_HZ: f32 = 0.5;
const FLUTTER_HZ: f32 = 8.0;
const DRIFT_HZ: f32 = 0.05;

// Peak modulation depth per unit amount, in samples.
const WOW_DEPTH: f32 = 15.0;
const FLUTTER_DEPTH: f32 = 5.0;
const DRIFT_DEPTH: f32 = 3.0;

/// Fixed-capacity circular buffer holding the pre-modulation signal of one
/// channel, read back at a fractional lag with linear interpolation.
pub struct DelayLine {
    buffer: Box<[f32; DELAY_CAPACITY]>,
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayLine {
    pub fn new() -> Self {
        Self {
            buffer: Box::new([0.0; DELAY_CAPACITY]),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }

    #[inline]
    pub fn write(&mut self, index: usize, sample: f32) {
        self.buffer[index % DELAY_CAPACITY] = sample;
    }

    /// Read `lag` samples behind `index`, wrapping into the buffer.
    #[inline]
    pub fn read(&self, index: usize, lag: f32) -> f32 {
        let cap = DELAY_CAPACITY as f32;
        let read_pos = (index as f32 - lag).rem_euclid(cap);
        let base = read_pos.floor();
        let frac = read_pos - base;
        let read_idx = (base as usize) % DELAY_CAPACITY;
        let next_idx = (read_idx + 1) % DELAY_CAPACITY;

        (1.0 - frac).mul_add(self.buffer[read_idx], frac * self.buffer[next_idx])
    }
}

/// Per-second phase increments for the three oscillators.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PhaseIncrements {
    pub wow: f32,
    pub flutter: f32,
    pub drift: f32,
}

impl PhaseIncrements {
    /// Wow and flutter follow the mode's rate; drift does not.
    pub fn new(wobble_rate: f32, sample_rate: f32) -> Self {
        Self {
            wow: WOW_HZ * wobble_rate / sample_rate,
            flutter: FLUTTER_HZ * wobble_rate / sample_rate,
            drift: DRIFT_HZ / sample_rate,
        }
    }
}

/// Wow, flutter and drift phases in [0, 1), shared by both channels so the
/// stereo image wobbles coherently.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ModulationPhases {
    pub wow: f32,
    pub flutter: f32,
    pub drift: f32,
}

impl ModulationPhases {
    /// Phases as seen `frames` samples into the current block.
    #[inline]
    pub fn at(&self, inc: &PhaseIncrements, frames: usize) -> Self {
        let n = frames as f32;
        Self {
            wow: inc.wow.mul_add(n, self.wow).fract(),
            flutter: inc.flutter.mul_add(n, self.flutter).fract(),
            drift: inc.drift.mul_add(n, self.drift).fract(),
        }
    }

    pub fn advance(&mut self, inc: &PhaseIncrements, frames: usize) {
        *self = self.at(inc, frames);
    }

    /// Summed delay offset in samples for a scaled wobble amount.
    #[inline]
    pub fn offset(&self, amount: f32) -> f32 {
        let wow = (self.wow * TAU).sin() * WOW_DEPTH;
        let flutter = (self.flutter * TAU).sin() * FLUTTER_DEPTH;
        let drift = (self.drift * TAU).sin() * DRIFT_DEPTH;
        (wow + flutter + drift) * amount
    }
}

/// Write the dry sample and, when active, return the modulated read.
///
/// Returns the read lag alongside the sample; inactive stages report
/// [`BASE_DELAY`].
#[inline]
pub fn process(
    line: &mut DelayLine,
    write_index: usize,
    input: f32,
    amount: f32,
    offset: f32,
) -> (f32, f32) {
    line.write(write_index, input);

    if amount <= ACTIVE_THRESHOLD {
        return (input, BASE_DELAY);
    }

    let lag = BASE_DELAY + offset;
    (line.read(write_index, lag), lag)
}
