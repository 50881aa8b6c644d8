//! The per-sample degradation stages, in chain order.

pub mod bitcrush;
pub mod downsample;
pub mod wobble;
pub mod saturation;
pub mod dropout;
pub mod noise;
pub mod crackle;

/// Amounts at or below this leave a stage switched off.
pub const ACTIVE_THRESHOLD: f32 = 0.01;
