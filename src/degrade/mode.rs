use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Character mode selecting the saturation curve, noise colour, wobble
/// profile and filter corners.
#[derive(
    ValueEnum, Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Cassette,
    Vinyl,
    Vhs,
    Radio,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cassette => write!(f, "Cassette"),
            Self::Vinyl => write!(f, "Vinyl"),
            Self::Vhs => write!(f, "VHS"),
            Self::Radio => write!(f, "Radio"),
        }
    }
}

/// Static per-mode coefficients.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModeProfile {
    /// Below 0.5 the hiss is pink-leaning, otherwise white.
    pub noise_color: f32,
    pub wobble_depth: f32,
    pub wobble_rate: f32,
    pub saturation_curve: f32,
    pub high_pass_hz: f32,
    pub low_pass_hz: f32,
    pub hiss_amount: f32,
}

pub const MODE_COUNT: usize = 4;

pub const MODE_PROFILES: [ModeProfile; MODE_COUNT] = [
    // Cassette: warm, wobbly, hissy
    ModeProfile {
        noise_color: 0.6,
        wobble_depth: 1.0,
        wobble_rate: 1.0,
        saturation_curve: 0.6,
        high_pass_hz: 40.0,
        low_pass_hz: 14_000.0,
        hiss_amount: 1.0,
    },
    // Vinyl: crackly, warm, slight wobble
    ModeProfile {
        noise_color: 0.4,
        wobble_depth: 0.3,
        wobble_rate: 0.5,
        saturation_curve: 0.4,
        high_pass_hz: 30.0,
        low_pass_hz: 16_000.0,
        hiss_amount: 0.5,
    },
    // VHS: heavy wobble, muffled
    ModeProfile {
        noise_color: 0.8,
        wobble_depth: 2.0,
        wobble_rate: 0.7,
        saturation_curve: 0.7,
        high_pass_hz: 60.0,
        low_pass_hz: 10_000.0,
        hiss_amount: 1.5,
    },
    // Radio: band-limited, noisy, squashed
    ModeProfile {
        noise_color: 1.0,
        wobble_depth: 0.1,
        wobble_rate: 2.0,
        saturation_curve: 0.8,
        high_pass_hz: 300.0,
        low_pass_hz: 5_000.0,
        hiss_amount: 2.0,
    },
];

impl Mode {
    pub const ALL: [Self; MODE_COUNT] = [Self::Cassette, Self::Vinyl, Self::Vhs, Self::Radio];

    /// Look up a mode by its parameter index.
    ///
    /// The control layer only ever produces 0..=3. Anything else trips a debug
    /// assertion and is clamped to the nearest valid mode in release builds.
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < MODE_COUNT, "mode index {index} out of range");
        Self::ALL[index.min(MODE_COUNT - 1)]
    }

    /// Convert a raw control value (possibly fractional or negative) to a mode.
    pub fn from_value(value: f32) -> Self {
        let index = if value.is_finite() {
            value.round().clamp(0.0, (MODE_COUNT - 1) as f32) as usize
        } else {
            0
        };
        Self::from_index(index)
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn profile(self) -> &'static ModeProfile {
        &MODE_PROFILES[self as usize]
    }

    /// Only tape formats suffer dropouts.
    pub const fn has_dropouts(self) -> bool {
        matches!(self, Self::Cassette | Self::Vhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for (i, mode) in Mode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
            assert_eq!(Mode::from_index(i), *mode);
        }
    }

    #[test]
    fn raw_values_are_clamped() {
        assert_eq!(Mode::from_value(-3.0), Mode::Cassette);
        assert_eq!(Mode::from_value(2.4), Mode::Vhs);
        assert_eq!(Mode::from_value(17.0), Mode::Radio);
        assert_eq!(Mode::from_value(f32::NAN), Mode::Cassette);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn invalid_index_asserts_in_debug() {
        let _ = Mode::from_index(4);
    }

    #[test]
    fn radio_is_band_limited() {
        let radio = Mode::Radio.profile();
        assert!(radio.high_pass_hz > 200.0);
        assert!(radio.low_pass_hz < 6_000.0);
        for mode in Mode::ALL {
            let p = mode.profile();
            assert!(p.high_pass_hz < p.low_pass_hz);
        }
    }

    #[test]
    fn dropouts_only_on_tape() {
        assert!(Mode::Cassette.has_dropouts());
        assert!(Mode::Vhs.has_dropouts());
        assert!(!Mode::Vinyl.has_dropouts());
        assert!(!Mode::Radio.has_dropouts());
    }
}
