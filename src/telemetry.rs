use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use crate::degrade::mode::Mode;

/// Scalars the engine publishes once per block. Each field is its own atomic;
/// readers may observe a mix of two consecutive blocks.
#[derive(Debug, Default)]
struct Telemetry {
    input_rms: AtomicU32,
    input_peak: AtomicU32,
    wobble_phase: AtomicU32,
    crackle_activity: AtomicU32,
    degradation: AtomicU32,
    mode: AtomicUsize,
    bypassed: AtomicBool,
}

fn store(slot: &AtomicU32, value: f32) {
    slot.store(value.to_bits(), Ordering::Relaxed);
}

fn load(slot: &AtomicU32) -> f32 {
    f32::from_bits(slot.load(Ordering::Relaxed))
}

/// Writer side, owned by the engine.
pub struct TelemetrySink {
    shared: Arc<Telemetry>,
}

/// Reader side, cheap to clone and safe to poll from any thread.
#[derive(Clone)]
pub struct TelemetryHandle {
    shared: Arc<Telemetry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    /// Mean of the per-channel input RMS.
    pub input_rms: f32,
    /// Largest absolute input sample.
    pub input_peak: f32,
    /// Wow oscillator phase in [0, 1).
    pub wobble_phase: f32,
    /// Magnitude of the most recent crackle envelope.
    pub crackle_activity: f32,
    pub degradation: f32,
    pub mode: Mode,
    pub bypassed: bool,
}

impl TelemetrySink {
    pub fn new() -> (Self, TelemetryHandle) {
        let shared = Arc::new(Telemetry::default());

        (
            Self {
                shared: Arc::clone(&shared),
            },
            TelemetryHandle { shared },
        )
    }

    pub fn publish_input(&self, rms: f32, peak: f32) {
        store(&self.shared.input_rms, rms);
        store(&self.shared.input_peak, peak);
    }

    pub fn publish_state(&self, mode: Mode, bypassed: bool) {
        self.shared.mode.store(mode.index(), Ordering::Relaxed);
        self.shared.bypassed.store(bypassed, Ordering::Relaxed);
    }

    pub fn publish_degradation(&self, amount: f32) {
        store(&self.shared.degradation, amount);
    }

    pub fn publish_modulation(&self, wobble_phase: f32, crackle_activity: f32) {
        store(&self.shared.wobble_phase, wobble_phase);
        store(&self.shared.crackle_activity, crackle_activity);
    }

    pub fn reset(&self) {
        self.publish_input(0.0, 0.0);
        self.publish_degradation(0.0);
        self.publish_modulation(0.0, 0.0);
    }
}

impl TelemetryHandle {
    pub fn snapshot(&self) -> TelemetrySnapshot {
        let t = &self.shared;
        TelemetrySnapshot {
            input_rms: load(&t.input_rms),
            input_peak: load(&t.input_peak),
            wobble_phase: load(&t.wobble_phase),
            crackle_activity: load(&t.crackle_activity),
            degradation: load(&t.degradation),
            mode: Mode::from_index(t.mode.load(Ordering::Relaxed)),
            bypassed: t.bypassed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_sees_published_values() {
        let (sink, handle) = TelemetrySink::new();
        assert_eq!(handle.snapshot(), TelemetrySnapshot::default());

        sink.publish_input(0.25, 0.9);
        sink.publish_state(Mode::Radio, true);
        sink.publish_modulation(0.5, 0.3);
        sink.publish_degradation(1.2);

        let snap = handle.snapshot();
        assert_eq!(snap.input_rms, 0.25);
        assert_eq!(snap.input_peak, 0.9);
        assert_eq!(snap.mode, Mode::Radio);
        assert!(snap.bypassed);
        assert_eq!(snap.wobble_phase, 0.5);
        assert_eq!(snap.crackle_activity, 0.3);
        assert_eq!(snap.degradation, 1.2);
    }

    #[test]
    fn reset_clears_levels_but_keeps_state() {
        let (sink, handle) = TelemetrySink::new();
        sink.publish_input(0.5, 0.5);
        sink.publish_state(Mode::Vinyl, false);
        sink.reset();

        let snap = handle.snapshot();
        assert_eq!(snap.input_rms, 0.0);
        assert_eq!(snap.mode, Mode::Vinyl);
    }

    #[test]
    fn snapshot_serializes_mode_by_name() {
        let (sink, handle) = TelemetrySink::new();
        sink.publish_state(Mode::Vhs, false);
        let json = serde_json::to_string(&handle.snapshot()).unwrap();
        assert!(json.contains("\"mode\":\"vhs\""), "{json}");
        assert!(json.contains("\"inputRms\""));
    }
}
