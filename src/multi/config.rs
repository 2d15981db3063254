//! Multi-signal configuration model.
//!
//! A [`Config`] publishes one `Float64MultiArray` topic whose elements are
//! driven by independent signal descriptors, one per entry of `paths`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::SettingsError;
use crate::types::{stored_publish_rate, stored_total_time, TimeBound};

/// Schema of the topics this variant can publish to
pub const TOPIC_SCHEMA: &str = "std_msgs/msg/Float64MultiArray";

/// Publish rate used when the host state does not carry one (Hz)
pub const DEFAULT_PUBLISH_RATE: f64 = 1.0;

/// Waveform selected for one signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    #[default]
    Step,
    Ramp,
    Spline,
    Sine,
    Square,
    Triangle,
    Sawtooth,
    Chirp,
}

impl SignalType {
    /// All types, in select-option order
    pub const ALL: [SignalType; 8] = [
        SignalType::Step,
        SignalType::Ramp,
        SignalType::Spline,
        SignalType::Sine,
        SignalType::Square,
        SignalType::Triangle,
        SignalType::Sawtooth,
        SignalType::Chirp,
    ];

    /// Wire/config name
    pub fn as_str(self) -> &'static str {
        match self {
            SignalType::Step => "step",
            SignalType::Ramp => "ramp",
            SignalType::Spline => "spline",
            SignalType::Sine => "sine",
            SignalType::Square => "square",
            SignalType::Triangle => "triangle",
            SignalType::Sawtooth => "sawtooth",
            SignalType::Chirp => "chirp",
        }
    }

    /// Human readable name for the select
    pub fn label(self) -> &'static str {
        match self {
            SignalType::Step => "Step",
            SignalType::Ramp => "Ramp",
            SignalType::Spline => "Spline",
            SignalType::Sine => "Sine",
            SignalType::Square => "Square",
            SignalType::Triangle => "Triangle",
            SignalType::Sawtooth => "Sawtooth",
            SignalType::Chirp => "Chirp",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SignalType {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownSignalType(s.to_string()))
    }
}

/// Parameters of one reference signal
///
/// Every field is always stored, whatever the signal type. Fields that do not
/// apply to the current type are hidden from the settings tree but keep their
/// value, so switching type and back loses nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignalParameters {
    pub signal_type: SignalType,
    /// Value before `start_time` (step, ramp, spline)
    pub initial_value: f64,
    /// Value after `start_time` (step, spline)
    pub final_value: f64,
    /// Time at which the signal starts changing (s)
    pub start_time: f64,
    /// Time at which the signal stops (s)
    pub end_time: TimeBound,
    /// Ramp rate
    pub slope: f64,
    /// DC offset of periodic waveforms
    pub offset: f64,
    pub amplitude: f64,
    /// Frequency of periodic waveforms (Hz)
    pub frequency: f64,
    /// Phase shift (deg)
    pub phase: f64,
    /// Chirp frequency at `start_time` (Hz)
    pub initial_frequency: f64,
    /// Chirp frequency at `target_time` (Hz)
    pub target_frequency: f64,
    /// Time at which the chirp reaches `target_frequency` (s)
    pub target_time: TimeBound,
}

/// The default signal: a unit step at t = 0 that never ends
pub fn default_signal() -> SignalParameters {
    SignalParameters {
        signal_type: SignalType::Step,
        initial_value: 0.0,
        final_value: 1.0,
        start_time: 0.0,
        end_time: TimeBound::Unbounded,
        slope: 1.0,
        offset: 0.0,
        amplitude: 1.0,
        frequency: 1.0,
        phase: 0.0,
        initial_frequency: 0.0,
        target_frequency: 1.0,
        target_time: TimeBound::Finite(1.0),
    }
}

impl Default for SignalParameters {
    fn default() -> Self {
        default_signal()
    }
}

/// Ordered, shared list of signals
///
/// The list and each entry are reference counted so successive config
/// versions share untouched entries.
pub type SignalList = Arc<[Arc<SignalParameters>]>;

/// Complete multi-signal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Topic the generator publishes on; services live under it
    pub topic_name: String,
    /// Publish rate (Hz)
    pub publish_rate: f64,
    /// How long to publish before stopping
    pub total_time: TimeBound,
    /// One entry per published element. May be empty; the settings tree then
    /// shows a single implicit default signal.
    pub paths: SignalList,
}

impl Config {
    /// Signal at `index`, if stored
    pub fn signal(&self, index: usize) -> Option<&SignalParameters> {
        self.paths.get(index).map(|p| p.as_ref())
    }

    pub fn signal_count(&self) -> usize {
        self.paths.len()
    }
}

impl Default for Config {
    fn default() -> Self {
        hydrate(PartialConfig::default())
    }
}

/// Host-provided state, any top-level field of which may be missing
///
/// Missing keys inside a `paths` entry are filled from [`default_signal`]
/// during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<TimeBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<SignalParameters>>,
}

impl From<Config> for PartialConfig {
    fn from(config: Config) -> Self {
        Self {
            topic_name: Some(config.topic_name),
            publish_rate: Some(config.publish_rate),
            total_time: Some(config.total_time),
            paths: Some(config.paths.iter().map(|p| (**p).clone()).collect()),
        }
    }
}

/// Fill in every missing top-level field with its default
///
/// Supplied fields are kept as-is, including an explicitly empty `paths`. A
/// publish rate that is not above zero or a negative total time counts as
/// missing.
pub fn hydrate(partial: PartialConfig) -> Config {
    let paths: SignalList = match partial.paths {
        Some(paths) => paths.into_iter().map(Arc::new).collect(),
        None => Arc::from(vec![Arc::new(default_signal())]),
    };

    Config {
        topic_name: partial.topic_name.unwrap_or_default(),
        publish_rate: stored_publish_rate(partial.publish_rate, DEFAULT_PUBLISH_RATE),
        total_time: stored_total_time(partial.total_time),
        paths,
    }
}
