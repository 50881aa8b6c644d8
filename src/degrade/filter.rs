use crate::degrade::chain::MAX_CHANNELS;
use crate::degrade::mode::ModeProfile;
use crate::degrade::stages::ACTIVE_THRESHOLD;
use crate::dsp::common::sanitize;
use crate::dsp::svf::{SvfCoeff, SvfState, SvfType};

const MIN_CUTOFF_HZ: f32 = 200.0;
/// The cutoff control sweeps two decades above [`MIN_CUTOFF_HZ`].
const CUTOFF_RANGE: f32 = 100.0;
const MIN_Q: f32 = 0.5;
const Q_RANGE: f32 = 9.5;
const DRIVE_RANGE: f32 = 10.0;

/// Low-pass cutoff for a normalised control, capped at the mode's ceiling.
pub fn cutoff_hz(cutoff_norm: f32, ceiling_hz: f32) -> f32 {
    (MIN_CUTOFF_HZ * CUTOFF_RANGE.powf(cutoff_norm)).min(ceiling_hz)
}

pub fn resonance_q(res_norm: f32) -> f32 {
    res_norm.mul_add(Q_RANGE, MIN_Q)
}

/// Soft clip ahead of the filters. `drive` is the normalised control.
#[inline]
pub fn pre_drive(input: f32, drive: f32) -> f32 {
    let d = drive.mul_add(DRIVE_RANGE, 1.0);
    (input * d).tanh() / d
}

/// Block-rate filter settings, already resolved to physical units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilterSettings {
    pub low_pass_hz: f32,
    pub q: f32,
    pub high_pass_hz: f32,
    /// Normalised drive, `None` when the drive is off.
    pub drive: Option<f32>,
}

impl FilterSettings {
    /// Resolve the 0..100 controls against the active mode.
    pub fn new(cutoff: f32, resonance: f32, drive: f32, profile: &ModeProfile) -> Self {
        let drive = drive / 100.0;
        Self {
            low_pass_hz: cutoff_hz(cutoff / 100.0, profile.low_pass_hz),
            q: resonance_q(resonance / 100.0),
            high_pass_hz: profile.high_pass_hz,
            drive: (drive > ACTIVE_THRESHOLD).then_some(drive),
        }
    }
}

/// Mode-shaped band limiting: optional drive, resonant low-pass, then a
/// Butterworth high-pass. Coefficients change once per block.
pub struct FilterStage {
    sample_rate: f32,
    lowpass: [SvfState; MAX_CHANNELS],
    highpass: [SvfState; MAX_CHANNELS],
    lowpass_coeff: SvfCoeff,
    highpass_coeff: SvfCoeff,
    drive: Option<f32>,
}

impl FilterStage {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            lowpass: [SvfState::default(); MAX_CHANNELS],
            highpass: [SvfState::default(); MAX_CHANNELS],
            lowpass_coeff: SvfCoeff::butterworth(sample_rate * 0.25, sample_rate),
            highpass_coeff: SvfCoeff::butterworth(MIN_CUTOFF_HZ * 0.1, sample_rate),
            drive: None,
        }
    }

    pub fn reset(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    /// Clear the integrators but keep the coefficients.
    pub fn clear(&mut self) {
        for state in self.lowpass.iter_mut().chain(self.highpass.iter_mut()) {
            state.reset();
        }
    }

    pub fn configure(&mut self, settings: &FilterSettings) {
        self.lowpass_coeff = SvfCoeff::new(settings.low_pass_hz, settings.q, self.sample_rate);
        self.highpass_coeff = SvfCoeff::butterworth(settings.high_pass_hz, self.sample_rate);
        self.drive = settings.drive;
    }

    pub fn process_channel(&mut self, channel: usize, data: &mut [f32]) {
        let lowpass = &mut self.lowpass[channel];
        let highpass = &mut self.highpass[channel];

        for sample in data.iter_mut() {
            let mut x = *sample;
            if let Some(drive) = self.drive {
                x = pre_drive(x, drive);
            }
            x = lowpass.process(x, &self.lowpass_coeff, SvfType::Lowpass);
            x = highpass.process(x, &self.highpass_coeff, SvfType::Highpass);
            *sample = sanitize(x);
        }
    }
}
