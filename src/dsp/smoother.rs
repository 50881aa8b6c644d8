/// Default ramp time for amount parameters.
pub const DEFAULT_RAMP_SECONDS: f32 = 0.02;
/// Ramp time for the filter cutoff, slower so sweeps do not zipper.
pub const CUTOFF_RAMP_SECONDS: f32 = 0.05;

/// Linear parameter smoother.
///
/// Every call to [`LinearSmoother::set_target`] starts a fresh ramp from the
/// current value that reaches the target after exactly `ramp_samples` calls to
/// [`LinearSmoother::next_value`]. The last step lands on the target, so the
/// value never overshoots.
#[derive(Clone, Debug)]
pub struct LinearSmoother {
    current: f32,
    target: f32,
    step: f32,
    steps_remaining: u32,
    ramp_samples: u32,
}

impl LinearSmoother {
    pub const fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            step: 0.0,
            steps_remaining: 0,
            ramp_samples: 0,
        }
    }

    /// Reconfigure the ramp length and snap to the target.
    pub fn reset(&mut self, sample_rate: f32, ramp_seconds: f32) {
        self.ramp_samples = (sample_rate * ramp_seconds).floor().max(0.0) as u32;
        self.set_current_and_target(self.target);
    }

    pub const fn set_current_and_target(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.step = 0.0;
        self.steps_remaining = 0;
    }

    pub fn set_target(&mut self, value: f32) {
        if value == self.target {
            return;
        }

        if self.ramp_samples == 0 {
            self.set_current_and_target(value);
            return;
        }

        self.target = value;
        self.steps_remaining = self.ramp_samples;
        self.step = (self.target - self.current) / self.ramp_samples as f32;
    }

    #[inline]
    pub fn next_value(&mut self) -> f32 {
        if self.steps_remaining == 0 {
            return self.target;
        }

        self.steps_remaining -= 1;
        if self.steps_remaining == 0 {
            self.current = self.target;
        } else {
            self.current += self.step;
        }
        self.current
    }

    /// Advance `n` steps at once and return the resulting value.
    pub fn skip(&mut self, n: usize) -> f32 {
        if n == 0 {
            return self.current;
        }

        if n >= self.steps_remaining as usize {
            self.current = self.target;
            self.steps_remaining = 0;
        } else {
            self.current += self.step * n as f32;
            self.steps_remaining -= n as u32;
        }
        self.current
    }

    pub const fn current(&self) -> f32 {
        self.current
    }

    pub const fn is_smoothing(&self) -> bool {
        self.steps_remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn reaches_target_within_ramp() {
        let mut s = LinearSmoother::new(0.0);
        s.reset(SAMPLE_RATE, DEFAULT_RAMP_SECONDS);
        s.set_target(100.0);

        let ramp = (SAMPLE_RATE * DEFAULT_RAMP_SECONDS) as usize;
        let mut last = 0.0;
        for _ in 0..ramp {
            let v = s.next_value();
            assert!(v >= last, "ramp must be monotonic");
            assert!(v <= 100.0, "overshoot: {v}");
            last = v;
        }
        assert_eq!(last, 100.0);
        assert!(!s.is_smoothing());
        assert_eq!(s.next_value(), 100.0);
    }

    #[test]
    fn falling_ramp_never_undershoots() {
        let mut s = LinearSmoother::new(80.0);
        s.reset(SAMPLE_RATE, CUTOFF_RAMP_SECONDS);
        s.set_target(10.0);

        for _ in 0..10_000 {
            let v = s.next_value();
            assert!((10.0..=80.0).contains(&v));
        }
        assert_eq!(s.current(), 10.0);
    }

    #[test]
    fn retarget_mid_ramp_is_continuous() {
        let mut s = LinearSmoother::new(0.0);
        s.reset(SAMPLE_RATE, DEFAULT_RAMP_SECONDS);
        s.set_target(1.0);
        for _ in 0..100 {
            s.next_value();
        }
        let before = s.current();
        s.set_target(0.0);
        let after = s.next_value();
        assert!((after - before).abs() < 0.01, "jump from {before} to {after}");
    }

    #[test]
    fn skip_matches_repeated_next_value() {
        let mut a = LinearSmoother::new(0.0);
        let mut b = LinearSmoother::new(0.0);
        a.reset(SAMPLE_RATE, DEFAULT_RAMP_SECONDS);
        b.reset(SAMPLE_RATE, DEFAULT_RAMP_SECONDS);
        a.set_target(50.0);
        b.set_target(50.0);

        for _ in 0..256 {
            a.next_value();
        }
        let skipped = b.skip(256);
        assert!((a.current() - skipped).abs() < 1e-3);

        assert_eq!(b.skip(100_000), 50.0);
    }

    #[test]
    fn unconfigured_smoother_jumps() {
        let mut s = LinearSmoother::new(0.0);
        s.set_target(3.0);
        assert_eq!(s.next_value(), 3.0);
    }
}
