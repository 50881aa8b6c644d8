use crate::degrade::mode::{Mode, ModeProfile};
use crate::degrade::stages::ACTIVE_THRESHOLD;
use crate::dsp::smoother::{CUTOFF_RAMP_SECONDS, DEFAULT_RAMP_SECONDS, LinearSmoother};
use crate::params::ParamValues;

/// Control values fixed for a whole block.
#[derive(Copy, Clone, Debug)]
pub struct BlockControls {
    pub mode: Mode,
    pub profile: &'static ModeProfile,
    pub age_mult: f32,
    /// Raw crackle control, 0..100.
    pub crackle: f32,
    /// Raw dropout control, 0..100.
    pub dropout: f32,
}

impl BlockControls {
    pub fn from_values(values: &ParamValues) -> Self {
        Self {
            mode: values.mode,
            profile: values.mode.profile(),
            age_mult: values.age_multiplier(),
            crackle: values.crackle,
            dropout: values.dropout,
        }
    }

    pub fn dropout_enabled(&self) -> bool {
        self.mode.has_dropouts() && self.dropout > ACTIVE_THRESHOLD
    }
}

/// Control values for one frame, shared by every channel.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameControls {
    pub bitcrush: f32,
    pub downsample: f32,
    pub noise: f32,
    pub wobble: f32,
    pub saturation: f32,
    /// Dry/wet balance in [0, 1].
    pub mix: f32,
    /// Wobble delay offset in samples.
    pub modulation: f32,
    /// `None` when dropouts are off for the block.
    pub dropout_gain: Option<f32>,
}

/// Smoothers for every continuously varying control.
///
/// Amount smoothers are stepped once per frame, never once per channel, so
/// ramps take the same time for mono and stereo material.
#[derive(Clone, Debug)]
pub struct Smoothers {
    bitcrush: LinearSmoother,
    downsample: LinearSmoother,
    noise: LinearSmoother,
    wobble: LinearSmoother,
    saturation: LinearSmoother,
    mix: LinearSmoother,
    cutoff: LinearSmoother,
}

impl Smoothers {
    pub const fn new(values: &ParamValues) -> Self {
        Self {
            bitcrush: LinearSmoother::new(values.bitcrush),
            downsample: LinearSmoother::new(values.downsample),
            noise: LinearSmoother::new(values.noise),
            wobble: LinearSmoother::new(values.wobble),
            saturation: LinearSmoother::new(values.saturation),
            mix: LinearSmoother::new(values.mix),
            cutoff: LinearSmoother::new(values.filter_cutoff),
        }
    }

    /// Configure ramp lengths for a new sample rate and jump to `values`.
    pub fn reset(&mut self, sample_rate: f32, values: &ParamValues) {
        for smoother in [
            &mut self.bitcrush,
            &mut self.downsample,
            &mut self.noise,
            &mut self.wobble,
            &mut self.saturation,
            &mut self.mix,
        ] {
            smoother.reset(sample_rate, DEFAULT_RAMP_SECONDS);
        }
        self.cutoff.reset(sample_rate, CUTOFF_RAMP_SECONDS);

        self.bitcrush.set_current_and_target(values.bitcrush);
        self.downsample.set_current_and_target(values.downsample);
        self.noise.set_current_and_target(values.noise);
        self.wobble.set_current_and_target(values.wobble);
        self.saturation.set_current_and_target(values.saturation);
        self.mix.set_current_and_target(values.mix);
        self.cutoff.set_current_and_target(values.filter_cutoff);
    }

    pub fn set_targets(&mut self, values: &ParamValues) {
        self.bitcrush.set_target(values.bitcrush);
        self.downsample.set_target(values.downsample);
        self.noise.set_target(values.noise);
        self.wobble.set_target(values.wobble);
        self.saturation.set_target(values.saturation);
        self.mix.set_target(values.mix);
        self.cutoff.set_target(values.filter_cutoff);
    }

    /// Step the amount smoothers by one frame and scale them into stage
    /// amounts. Modulation and dropout are filled in by the chain.
    #[inline]
    pub fn next_frame(&mut self, block: &BlockControls) -> FrameControls {
        let age = block.age_mult;
        let profile = block.profile;

        FrameControls {
            bitcrush: self.bitcrush.next_value() / 100.0 * age,
            downsample: self.downsample.next_value() / 100.0 * age,
            noise: self.noise.next_value() / 100.0 * age * profile.hiss_amount,
            wobble: self.wobble.next_value() / 100.0 * profile.wobble_depth * age,
            saturation: self.saturation.next_value() / 100.0 * age,
            mix: (self.mix.next_value() / 100.0).clamp(0.0, 1.0),
            modulation: 0.0,
            dropout_gain: None,
        }
    }

    /// Advance the cutoff smoother over a whole block, returning 0..100.
    pub fn advance_cutoff(&mut self, frames: usize) -> f32 {
        self.cutoff.skip(frames)
    }
}
