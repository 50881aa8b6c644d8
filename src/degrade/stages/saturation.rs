use super::ACTIVE_THRESHOLD;
use crate::degrade::mode::Mode;
use crate::dsp::sanitize;

const DRIVE_RANGE: f32 = 5.0;

/// Drive for a scaled amount. Always >= 1, so the makeup division is safe.
#[inline]
pub fn drive(amount: f32) -> f32 {
    1.0 + amount.max(0.0) * DRIVE_RANGE
}

/// Mode-specific transfer curve applied to an already driven sample.
#[inline]
pub fn shape(mode: Mode, driven: f32, amount: f32) -> f32 {
    match mode {
        Mode::Cassette => {
            // Tape: soft tanh plus a touch of even harmonics for warmth
            let shaped = (driven * 1.5).tanh();
            (0.1 * amount * shaped).mul_add(shaped.abs(), shaped)
        }
        Mode::Vinyl => {
            // Gentle compression
            driven / 0.5f32.mul_add(driven.abs(), 1.0)
        }
        Mode::Vhs => {
            // Asymmetric knee, harder on the negative side, then grit
            let mut x = driven;
            if x > 0.7 {
                x = (x - 0.7).mul_add(0.2, 0.7);
            }
            if x < -0.5 {
                x = (x + 0.5).mul_add(0.3, -0.5);
            }
            (x * 2.0).tanh()
        }
        Mode::Radio => {
            // Brick-wall limiting into a hot tanh
            (driven.clamp(-0.8, 0.8) * 2.5).tanh()
        }
    }
}

/// Mode-dependent saturation with makeup gain.
#[inline]
pub fn process(input: f32, amount: f32, mode: Mode) -> f32 {
    if amount <= ACTIVE_THRESHOLD {
        return input;
    }

    let drive = drive(amount);
    debug_assert!(drive >= 1.0);
    let shaped = shape(mode, input * drive, amount);
    sanitize(shaped / drive)
}
