use rand::Rng;

use crate::degrade::controls::{BlockControls, FrameControls};
use crate::degrade::stages::crackle::Crackle;
use crate::degrade::stages::downsample::SampleHold;
use crate::degrade::stages::dropout::Dropout;
use crate::degrade::stages::noise::Hiss;
use crate::degrade::stages::wobble::{
    self, BASE_DELAY, DELAY_CAPACITY, DelayLine, ModulationPhases, PhaseIncrements,
};
use crate::degrade::stages::{ACTIVE_THRESHOLD, bitcrush, saturation};
use crate::dsp::common::{DcBlocker, dc_coefficient};

/// Number of channels the chain degrades. Further channels pass through.
pub const MAX_CHANNELS: usize = 2;

/// State owned by a single channel.
#[derive(Default)]
pub struct ChannelState {
    hold: SampleHold,
    delay: DelayLine,
    read_lag: f32,
    hiss: Hiss,
    crackle: Crackle,
    dc: DcBlocker,
}

impl ChannelState {
    fn reset(&mut self) {
        self.hold.reset();
        self.delay.clear();
        self.read_lag = BASE_DELAY;
        self.hiss.reset();
        self.crackle.reset();
        self.dc.reset();
    }

    /// Lag of the most recent wobble read, in samples.
    pub const fn read_lag(&self) -> f32 {
        self.read_lag
    }
}

/// The per-sample degradation chain.
///
/// Order: bitcrush, downsample, wobble, saturation, dropout, hiss, crackle,
/// DC blocker. Anything derived from a random draw or an oscillator that must
/// be heard identically on both channels (modulation, dropout gain) lives in
/// [`FrameControls`] and is computed once per frame by [`Self::fill_frame`].
pub struct DegradationChain {
    channels: [ChannelState; MAX_CHANNELS],
    phases: ModulationPhases,
    increments: PhaseIncrements,
    dropout: Dropout,
    write_pos: usize,
    sample_rate: f32,
    dc_coeff: f32,
    crackle_activity: f32,
}

impl DegradationChain {
    pub fn new(sample_rate: f32) -> Self {
        let mut chain = Self {
            channels: Default::default(),
            phases: ModulationPhases::default(),
            increments: PhaseIncrements::default(),
            dropout: Dropout::default(),
            write_pos: 0,
            sample_rate,
            dc_coeff: dc_coefficient(sample_rate),
            crackle_activity: 0.0,
        };
        chain.reset(sample_rate);
        chain
    }

    /// Clear every buffer and state variable for a new stream.
    pub fn reset(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.dc_coeff = dc_coefficient(sample_rate);
        for channel in &mut self.channels {
            channel.reset();
        }
        self.phases = ModulationPhases::default();
        self.increments = PhaseIncrements::default();
        self.dropout.reset();
        self.write_pos = 0;
        self.crackle_activity = 0.0;
    }

    /// Latch the per-block oscillator rates for the current mode.
    pub fn begin_block(&mut self, block: &BlockControls) {
        self.increments = PhaseIncrements::new(block.profile.wobble_rate, self.sample_rate);
    }

    /// Fill the shared modulation offset and dropout gain of frame `index`.
    #[inline]
    pub fn fill_frame<R: Rng>(
        &mut self,
        index: usize,
        frame: &mut FrameControls,
        block: &BlockControls,
        rng: &mut R,
    ) {
        frame.modulation = if frame.wobble > ACTIVE_THRESHOLD {
            self.phases.at(&self.increments, index).offset(frame.wobble)
        } else {
            0.0
        };

        frame.dropout_gain = block
            .dropout_enabled()
            .then(|| self.dropout.next_gain(block.dropout, block.age_mult, rng));
    }

    /// Run one sample of `channel` through the chain.
    #[inline]
    pub fn process_sample<R: Rng>(
        &mut self,
        channel: usize,
        index: usize,
        input: f32,
        frame: &FrameControls,
        block: &BlockControls,
        rng: &mut R,
    ) -> f32 {
        let state = &mut self.channels[channel];

        let mut sample = bitcrush::process(input, frame.bitcrush, rng);
        sample = state.hold.process(sample, frame.downsample);

        let (wobbled, lag) = wobble::process(
            &mut state.delay,
            self.write_pos + index,
            sample,
            frame.wobble,
            frame.modulation,
        );
        state.read_lag = lag;
        sample = saturation::process(wobbled, frame.saturation, block.mode);

        if let Some(gain) = frame.dropout_gain {
            sample *= gain;
        }

        sample = state
            .hiss
            .process(sample, frame.noise, block.profile.noise_color, rng);

        if let Some(crackled) = state.crackle.process(sample, block.crackle, block.age_mult, rng) {
            sample = crackled;
            self.crackle_activity = state.crackle.envelope().abs();
        }

        state.dc.process(sample, self.dc_coeff)
    }

    /// Degrade one channel's block in place.
    pub fn process_channel<R: Rng>(
        &mut self,
        channel: usize,
        data: &mut [f32],
        frames: &[FrameControls],
        block: &BlockControls,
        rng: &mut R,
    ) {
        debug_assert!(channel < MAX_CHANNELS, "channel {channel} is not degraded");
        debug_assert_eq!(data.len(), frames.len());

        for (index, (sample, frame)) in data.iter_mut().zip(frames).enumerate() {
            *sample = self.process_sample(channel, index, *sample, frame, block, rng);
        }
    }

    /// Move the write position and oscillator phases past a finished block.
    pub fn end_block(&mut self, frames: usize) {
        self.write_pos = (self.write_pos + frames) % DELAY_CAPACITY;
        self.phases.advance(&self.increments, frames);
    }

    /// Wow oscillator phase in [0, 1).
    pub const fn wow_phase(&self) -> f32 {
        self.phases.wow
    }

    pub const fn crackle_activity(&self) -> f32 {
        self.crackle_activity
    }

    pub const fn write_position(&self) -> usize {
        self.write_pos
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelState> {
        self.channels.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degrade::controls::Smoothers;
    use crate::degrade::mode::Mode;
    use crate::params::ParamValues;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SAMPLE_RATE: f32 = 48_000.0;
    const BLOCK: usize = 256;

    fn frames_for(
        chain: &mut DegradationChain,
        values: &ParamValues,
        rng: &mut StdRng,
    ) -> (Vec<FrameControls>, BlockControls) {
        let block = BlockControls::from_values(values);
        let mut smoothers = Smoothers::new(values);
        smoothers.reset(SAMPLE_RATE, values);
        chain.begin_block(&block);
        let frames = (0..BLOCK)
            .map(|i| {
                let mut frame = smoothers.next_frame(&block);
                chain.fill_frame(i, &mut frame, &block, rng);
                frame
            })
            .collect();
        (frames, block)
    }

    fn clean_values() -> ParamValues {
        ParamValues {
            bitcrush: 0.0,
            downsample: 0.0,
            noise: 0.0,
            wobble: 0.0,
            saturation: 0.0,
            dropout: 0.0,
            crackle: 0.0,
            age: 0.0,
            ..ParamValues::default()
        }
    }

    #[test]
    fn idle_chain_only_removes_dc() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut chain = DegradationChain::new(SAMPLE_RATE);
        let values = clean_values();
        let (frames, block) = frames_for(&mut chain, &values, &mut rng);

        let input: Vec<f32> = (0..BLOCK).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
        let mut data = input.clone();
        chain.process_channel(0, &mut data, &frames, &block, &mut rng);

        let mut dc = DcBlocker::new();
        let coeff = dc_coefficient(SAMPLE_RATE);
        for (x, y) in input.iter().zip(&data) {
            assert!((dc.process(*x, coeff) - y).abs() < 1e-6);
        }
    }

    #[test]
    fn end_block_wraps_write_position() {
        let mut chain = DegradationChain::new(SAMPLE_RATE);
        chain.begin_block(&BlockControls::from_values(&ParamValues::default()));
        for _ in 0..20 {
            chain.end_block(BLOCK);
            assert!(chain.write_position() < DELAY_CAPACITY);
        }
        assert_eq!(chain.write_position(), (20 * BLOCK) % DELAY_CAPACITY);
    }

    #[test]
    fn stereo_channels_share_modulation_and_dropouts() {
        let mut rng = StdRng::seed_from_u64(77);
        let mut chain = DegradationChain::new(SAMPLE_RATE);
        let values = ParamValues {
            wobble: 100.0,
            dropout: 100.0,
            age: 100.0,
            mode: Mode::Vhs,
            ..clean_values()
        };

        for _ in 0..50 {
            let (frames, block) = frames_for(&mut chain, &values, &mut rng);
            assert!(frames.iter().all(|f| f.dropout_gain.is_some()));

            let mut left = vec![0.25; BLOCK];
            let mut right = vec![0.25; BLOCK];
            chain.process_channel(0, &mut left, &frames, &block, &mut rng);
            chain.process_channel(1, &mut right, &frames, &block, &mut rng);
            assert_eq!(left, right);
            assert_eq!(
                chain.channel(0).map(ChannelState::read_lag),
                chain.channel(1).map(ChannelState::read_lag)
            );
            chain.end_block(BLOCK);
        }
    }

    #[test]
    fn vinyl_never_drops_out() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut chain = DegradationChain::new(SAMPLE_RATE);
        let values = ParamValues {
            dropout: 100.0,
            age: 100.0,
            mode: Mode::Vinyl,
            ..clean_values()
        };
        let (frames, _) = frames_for(&mut chain, &values, &mut rng);
        assert!(frames.iter().all(|f| f.dropout_gain.is_none()));
    }

    #[test]
    fn crackle_activity_tracks_envelope() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut chain = DegradationChain::new(SAMPLE_RATE);
        let values = ParamValues {
            crackle: 100.0,
            age: 100.0,
            ..clean_values()
        };
        let mut seen = false;
        for _ in 0..20 {
            let (frames, block) = frames_for(&mut chain, &values, &mut rng);
            let mut data = vec![0.0; BLOCK];
            chain.process_channel(0, &mut data, &frames, &block, &mut rng);
            chain.end_block(BLOCK);
            let activity = chain.crackle_activity();
            assert!((0.0..=1.0).contains(&activity));
            seen |= activity > 0.0;
        }
        assert!(seen);
    }

    #[test]
    fn wobble_lag_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut chain = DegradationChain::new(SAMPLE_RATE);
        let values = ParamValues {
            wobble: 100.0,
            age: 100.0,
            mode: Mode::Vhs,
            ..clean_values()
        };
        for _ in 0..100 {
            let (frames, block) = frames_for(&mut chain, &values, &mut rng);
            let mut data = vec![0.1; BLOCK];
            chain.process_channel(0, &mut data, &frames, &block, &mut rng);
            let lag = chain.channel(0).map_or(0.0, ChannelState::read_lag);
            assert!(lag > 0.0 && lag < DELAY_CAPACITY as f32, "lag {lag}");
            chain.end_block(BLOCK);
        }
    }
}
