use anyhow::{Result, bail};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

use crate::degrade::chain::{DegradationChain, MAX_CHANNELS};
use crate::degrade::controls::{BlockControls, FrameControls, Smoothers};
use crate::degrade::filter::{FilterSettings, FilterStage};
use crate::dsp::common::{peak, rms};
use crate::mix;
use crate::params::{ParamValues, Parameters};
use crate::telemetry::{TelemetryHandle, TelemetrySink, TelemetrySnapshot};

const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
const MIN_SAMPLE_RATE: f32 = 1_000.0;

/// The lo-fi processor: owns every piece of DSP state and implements the host
/// lifecycle.
pub struct Engine {
    params: Arc<Parameters>,
    telemetry: TelemetrySink,
    handle: EngineHandle,
    rng: StdRng,
    sample_rate: f32,
    max_block_size: usize,
    prepared: bool,
    smoothers: Smoothers,
    chain: DegradationChain,
    filter: FilterStage,
    /// Per-frame controls shared by every channel, sized in `prepare`.
    frames: Vec<FrameControls>,
    /// Copy of the unprocessed input for the dry/wet blend.
    dry: [Vec<f32>; MAX_CHANNELS],
}

/// Control-side access to a running engine.
#[derive(Clone)]
pub struct EngineHandle {
    params: Arc<Parameters>,
    telemetry: TelemetryHandle,
}

impl EngineHandle {
    pub fn parameters(&self) -> &Arc<Parameters> {
        &self.params
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }
}

impl Engine {
    /// Create an engine with default parameters. `seed` fixes the random
    /// stream for reproducible renders; `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> (Self, EngineHandle) {
        Self::with_parameters(Arc::new(Parameters::new()), seed)
    }

    pub fn with_parameters(params: Arc<Parameters>, seed: Option<u64>) -> (Self, EngineHandle) {
        let (telemetry, telemetry_handle) = TelemetrySink::new();
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let values = params.snapshot();
        let handle = EngineHandle {
            params: Arc::clone(&params),
            telemetry: telemetry_handle,
        };

        let engine = Self {
            params,
            telemetry,
            handle: handle.clone(),
            rng,
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_block_size: 0,
            prepared: false,
            smoothers: Smoothers::new(&values),
            chain: DegradationChain::new(DEFAULT_SAMPLE_RATE),
            filter: FilterStage::new(DEFAULT_SAMPLE_RATE),
            frames: Vec::new(),
            dry: Default::default(),
        };

        (engine, handle)
    }

    /// Size scratch buffers and reset all state for a new stream. Everything
    /// that allocates happens here.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) -> Result<()> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            bail!("sample rate must be positive, got {sample_rate}");
        }
        if sample_rate < MIN_SAMPLE_RATE {
            bail!("sample rate {sample_rate} Hz is below the {MIN_SAMPLE_RATE} Hz minimum");
        }
        if max_block_size == 0 {
            bail!("maximum block size must be at least one frame");
        }

        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.frames = vec![FrameControls::default(); max_block_size];
        self.dry = std::array::from_fn(|_| vec![0.0; max_block_size]);

        self.chain.reset(sample_rate);
        self.filter.reset(sample_rate);
        self.smoothers.reset(sample_rate, &self.params.snapshot());
        self.telemetry.reset();
        self.prepared = true;

        debug!("Engine prepared: {sample_rate} Hz, up to {max_block_size} frames per block");
        Ok(())
    }

    /// Clear filter memory when the host stops streaming.
    pub fn release(&mut self) {
        self.filter.clear();
        debug!("Engine released");
    }

    pub const fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub const fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn parameters(&self) -> &Arc<Parameters> {
        &self.params
    }

    /// A new control-side handle to this engine.
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Process one block in place. Every slice is one channel; the first two
    /// are degraded and any further channels pass through untouched.
    pub fn process(&mut self, channels: &mut [&mut [f32]]) -> Result<()> {
        if !self.prepared {
            bail!("engine must be prepared before processing");
        }

        let Some(frames) = channels.first().map(|c| c.len()) else {
            return Ok(());
        };
        if channels.iter().any(|c| c.len() != frames) {
            bail!("channel buffers differ in length");
        }
        if frames > self.max_block_size {
            bail!(
                "block of {frames} frames exceeds the prepared maximum of {}",
                self.max_block_size
            );
        }
        if frames == 0 {
            return Ok(());
        }

        #[cfg(debug_assertions)]
        assert_no_alloc::assert_no_alloc(|| self.process_block(channels, frames));

        #[cfg(not(debug_assertions))]
        self.process_block(channels, frames);

        Ok(())
    }

    fn process_block(&mut self, channels: &mut [&mut [f32]], frames: usize) {
        let values = self.params.snapshot();
        self.smoothers.set_targets(&values);
        self.telemetry.publish_state(values.mode, values.bypass);
        self.publish_input_levels(channels);

        if values.bypass {
            return;
        }

        self.telemetry
            .publish_degradation(values.degradation_amount());

        let block = BlockControls::from_values(&values);

        for (dry, channel) in self.dry.iter_mut().zip(channels.iter()) {
            dry[..frames].copy_from_slice(channel);
        }

        self.chain.begin_block(&block);
        for (index, frame) in self.frames[..frames].iter_mut().enumerate() {
            *frame = self.smoothers.next_frame(&block);
            self.chain.fill_frame(index, frame, &block, &mut self.rng);
        }

        let frame_controls = &self.frames[..frames];
        for (index, channel) in channels.iter_mut().take(MAX_CHANNELS).enumerate() {
            self.chain
                .process_channel(index, channel, frame_controls, &block, &mut self.rng);
        }
        self.chain.end_block(frames);

        self.telemetry
            .publish_modulation(self.chain.wow_phase(), self.chain.crackle_activity());

        self.apply_filter_and_mix(channels, &values, &block, frames);
    }

    fn apply_filter_and_mix(
        &mut self,
        channels: &mut [&mut [f32]],
        values: &ParamValues,
        block: &BlockControls,
        frames: usize,
    ) {
        let cutoff = self.smoothers.advance_cutoff(frames);
        self.filter.configure(&FilterSettings::new(
            cutoff,
            values.filter_res,
            values.filter_drive,
            block.profile,
        ));

        let gain = mix::output_gain(values.output);
        let mix_values = &self.frames[..frames];

        for (index, channel) in channels.iter_mut().take(MAX_CHANNELS).enumerate() {
            self.filter.process_channel(index, channel);
            mix::crossfade(
                channel,
                &self.dry[index][..frames],
                mix_values.iter().map(|f| f.mix),
            );
            mix::apply_gain(channel, gain);
        }
    }

    fn publish_input_levels(&self, channels: &[&mut [f32]]) {
        let count = channels.len() as f32;
        let mean_rms = channels.iter().map(|c| rms(c)).sum::<f32>() / count;
        let max_peak = channels.iter().map(|c| peak(c)).fold(0.0f32, f32::max);
        self.telemetry.publish_input(mean_rms, max_peak);
    }
}
