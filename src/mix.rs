//! Dry/wet crossfade and output gain.

pub use crate::dsp::common::db_to_lin as output_gain;

use crate::dsp::common::sanitize;

/// Blend `dry` back into `wet` in place: `wet·m + dry·(1 − m)`, with one mix
/// value per frame. A non-finite dry sample counts as silence.
#[inline]
pub fn crossfade<I>(wet: &mut [f32], dry: &[f32], mix: I)
where
    I: IntoIterator<Item = f32>,
{
    for ((w, d), m) in wet.iter_mut().zip(dry).zip(mix) {
        *w = m.mul_add(*w, sanitize(*d) * (1.0 - m));
    }
}

#[inline]
pub fn apply_gain(data: &mut [f32], gain: f32) {
    if gain == 1.0 {
        return;
    }
    for sample in data.iter_mut() {
        *sample *= gain;
    }
}
