//! Control parameters shared between the control thread and the audio thread.
//!
//! Each parameter is stored as the bit pattern of an `f32` inside its own
//! `AtomicU32`, so a reader never sees a torn value. There is no cross-field
//! consistency; the smoothers on the audio side absorb partial updates.

use crate::degrade::mode::Mode;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamId {
    Bitcrush,
    Downsample,
    Noise,
    Crackle,
    Wobble,
    Dropout,
    Saturation,
    Age,
    FilterCutoff,
    FilterRes,
    FilterDrive,
    Mode,
    Mix,
    Output,
    Bypass,
}

pub const PARAM_COUNT: usize = 15;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub unit: &'static str,
}

impl ParamRange {
    const fn percent(default: f32) -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            default,
            unit: "%",
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

impl ParamId {
    pub const ALL: [Self; PARAM_COUNT] = [
        Self::Bitcrush,
        Self::Downsample,
        Self::Noise,
        Self::Crackle,
        Self::Wobble,
        Self::Dropout,
        Self::Saturation,
        Self::Age,
        Self::FilterCutoff,
        Self::FilterRes,
        Self::FilterDrive,
        Self::Mode,
        Self::Mix,
        Self::Output,
        Self::Bypass,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bitcrush => "bitcrush",
            Self::Downsample => "downsample",
            Self::Noise => "noise",
            Self::Crackle => "crackle",
            Self::Wobble => "wobble",
            Self::Dropout => "dropout",
            Self::Saturation => "saturation",
            Self::Age => "age",
            Self::FilterCutoff => "filterCutoff",
            Self::FilterRes => "filterRes",
            Self::FilterDrive => "filterDrive",
            Self::Mode => "mode",
            Self::Mix => "mix",
            Self::Output => "output",
            Self::Bypass => "bypass",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    pub const fn range(self) -> ParamRange {
        match self {
            Self::Bitcrush
            | Self::Downsample
            | Self::Crackle
            | Self::Dropout
            | Self::FilterRes
            | Self::FilterDrive => ParamRange::percent(0.0),
            Self::Noise => ParamRange::percent(15.0),
            Self::Wobble => ParamRange::percent(20.0),
            Self::Saturation => ParamRange::percent(30.0),
            Self::Age => ParamRange::percent(25.0),
            Self::FilterCutoff => ParamRange::percent(80.0),
            Self::Mix => ParamRange::percent(100.0),
            Self::Mode => ParamRange {
                min: 0.0,
                max: 3.0,
                default: 0.0,
                unit: "",
            },
            Self::Output => ParamRange {
                min: -24.0,
                max: 12.0,
                default: 0.0,
                unit: "dB",
            },
            Self::Bypass => ParamRange {
                min: 0.0,
                max: 1.0,
                default: 0.0,
                unit: "",
            },
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ParamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A plain copy of every control value, read once per block.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamValues {
    pub bitcrush: f32,
    pub downsample: f32,
    pub noise: f32,
    pub crackle: f32,
    pub wobble: f32,
    pub dropout: f32,
    pub saturation: f32,
    pub age: f32,
    pub filter_cutoff: f32,
    pub filter_res: f32,
    pub filter_drive: f32,
    pub mode: Mode,
    pub mix: f32,
    pub output: f32,
    pub bypass: bool,
}

impl Default for ParamValues {
    fn default() -> Self {
        let d = |id: ParamId| id.range().default;
        Self {
            bitcrush: d(ParamId::Bitcrush),
            downsample: d(ParamId::Downsample),
            noise: d(ParamId::Noise),
            crackle: d(ParamId::Crackle),
            wobble: d(ParamId::Wobble),
            dropout: d(ParamId::Dropout),
            saturation: d(ParamId::Saturation),
            age: d(ParamId::Age),
            filter_cutoff: d(ParamId::FilterCutoff),
            filter_res: d(ParamId::FilterRes),
            filter_drive: d(ParamId::FilterDrive),
            mode: Mode::default(),
            mix: d(ParamId::Mix),
            output: d(ParamId::Output),
            bypass: false,
        }
    }
}

impl ParamValues {
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::Bitcrush => self.bitcrush,
            ParamId::Downsample => self.downsample,
            ParamId::Noise => self.noise,
            ParamId::Crackle => self.crackle,
            ParamId::Wobble => self.wobble,
            ParamId::Dropout => self.dropout,
            ParamId::Saturation => self.saturation,
            ParamId::Age => self.age,
            ParamId::FilterCutoff => self.filter_cutoff,
            ParamId::FilterRes => self.filter_res,
            ParamId::FilterDrive => self.filter_drive,
            ParamId::Mode => self.mode.index() as f32,
            ParamId::Mix => self.mix,
            ParamId::Output => self.output,
            ParamId::Bypass => {
                if self.bypass {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Store a value, clamped into the parameter's range.
    pub fn set(&mut self, id: ParamId, value: f32) {
        let value = id.range().clamp(value);
        match id {
            ParamId::Bitcrush => self.bitcrush = value,
            ParamId::Downsample => self.downsample = value,
            ParamId::Noise => self.noise = value,
            ParamId::Crackle => self.crackle = value,
            ParamId::Wobble => self.wobble = value,
            ParamId::Dropout => self.dropout = value,
            ParamId::Saturation => self.saturation = value,
            ParamId::Age => self.age = value,
            ParamId::FilterCutoff => self.filter_cutoff = value,
            ParamId::FilterRes => self.filter_res = value,
            ParamId::FilterDrive => self.filter_drive = value,
            ParamId::Mode => self.mode = Mode::from_value(value),
            ParamId::Mix => self.mix = value,
            ParamId::Output => self.output = value,
            ParamId::Bypass => self.bypass = value > 0.5,
        }
    }

    /// `1 + age/100 * 2`, in [1, 3].
    pub fn age_multiplier(&self) -> f32 {
        1.0 + (self.age / 100.0) * 2.0
    }

    /// Aggregate degradation published to the visualiser.
    pub fn degradation_amount(&self) -> f32 {
        (self.bitcrush + self.downsample + self.noise + self.wobble + self.saturation) / 500.0
            * self.age_multiplier()
    }
}

/// Lock-free parameter store written by the control thread.
pub struct Parameters {
    values: [AtomicU32; PARAM_COUNT],
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new()
    }
}

impl Parameters {
    pub fn new() -> Self {
        let values = ParamId::ALL.map(|id| AtomicU32::new(id.range().default.to_bits()));
        Self { values }
    }

    pub fn from_values(values: &ParamValues) -> Self {
        let params = Self::new();
        params.apply(values);
        params
    }

    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Relaxed))
    }

    /// Store a value, clamped into the parameter's range.
    pub fn set(&self, id: ParamId, value: f32) {
        let value = id.range().clamp(value);
        self.values[id.index()].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Set a parameter value by name, rejecting unknown names and
    /// out-of-range values.
    pub fn set_by_name(&self, name: &str, value: f32) -> Result<(), &'static str> {
        let id = ParamId::from_name(name).ok_or("Unknown parameter name")?;
        if !id.range().contains(value) {
            return Err("Value outside the parameter's range");
        }
        self.set(id, value);
        Ok(())
    }

    pub fn get_by_name(&self, name: &str) -> Result<f32, &'static str> {
        ParamId::from_name(name)
            .map(|id| self.get(id))
            .ok_or("Unknown parameter name")
    }

    pub fn set_mode(&self, mode: Mode) {
        self.set(ParamId::Mode, mode.index() as f32);
    }

    pub fn set_bypass(&self, bypass: bool) {
        self.set(ParamId::Bypass, if bypass { 1.0 } else { 0.0 });
    }

    pub fn apply(&self, values: &ParamValues) {
        for id in ParamId::ALL {
            self.set(id, values.get(id));
        }
    }

    /// One relaxed load per parameter.
    pub fn snapshot(&self) -> ParamValues {
        let mut values = ParamValues::default();
        for id in ParamId::ALL {
            values.set(id, self.get(id));
        }
        values
    }
}
