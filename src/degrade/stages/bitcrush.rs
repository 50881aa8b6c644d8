use rand::Rng;

use super::ACTIVE_THRESHOLD;

pub const MAX_BITS: f32 = 24.0;
pub const MIN_BITS: f32 = 2.0;
/// Below this depth a little noise is mixed in to mask the stepping.
const DITHER_BELOW_BITS: f32 = 8.0;
const DITHER_PER_BIT: f32 = 0.002;

/// Bit depth for a scaled amount, floored at [`MIN_BITS`] so age-boosted
/// amounts above 1 can never produce a zero or negative depth.
#[inline]
pub fn bit_depth(amount: f32) -> f32 {
    (MAX_BITS - amount * (MAX_BITS - MIN_BITS)).clamp(MIN_BITS, MAX_BITS)
}

/// Round `input` onto a grid of `2^bits` steps per unit.
#[inline]
pub fn quantize(input: f32, bits: f32) -> f32 {
    let levels = bits.exp2();
    (input * levels).round() / levels
}

/// Bit-depth reduction. Memoryless apart from the dither draw.
#[inline]
pub fn process<R: Rng>(input: f32, amount: f32, rng: &mut R) -> f32 {
    if amount <= ACTIVE_THRESHOLD {
        return input;
    }

    let bits = bit_depth(amount);
    let crushed = quantize(input, bits);

    if bits < DITHER_BELOW_BITS {
        let dither: f32 = rng.random_range(-1.0..=1.0);
        crushed + dither * DITHER_PER_BIT * (DITHER_BELOW_BITS - bits)
    } else {
        crushed
    }
}
