//! Single-signal configuration model.
//!
//! The config is one flat record: the publish parameters plus the fields of
//! the one signal published on a `Float64` topic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::SettingsError;
use crate::types::{stored_publish_rate, stored_total_time, TimeBound};

/// Schema of the topics this variant can publish to
pub const TOPIC_SCHEMA: &str = "std_msgs/msg/Float64";

pub const DEFAULT_PUBLISH_RATE: f64 = 1.0;

/// Waveform of the published signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    #[default]
    Step,
    Ramp,
    Sine,
    Square,
    Triangle,
    Sawtooth,
    Chirp,
}

impl SignalType {
    pub const ALL: [SignalType; 7] = [
        SignalType::Step,
        SignalType::Ramp,
        SignalType::Sine,
        SignalType::Square,
        SignalType::Triangle,
        SignalType::Sawtooth,
        SignalType::Chirp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SignalType::Step => "step",
            SignalType::Ramp => "ramp",
            SignalType::Sine => "sine",
            SignalType::Square => "square",
            SignalType::Triangle => "triangle",
            SignalType::Sawtooth => "sawtooth",
            SignalType::Chirp => "chirp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SignalType::Step => "Step",
            SignalType::Ramp => "Ramp",
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

/// Parameters of the published signal
///
/// As with the multi-signal entries, hidden fields keep their values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignalParameters {
    pub signal_type: SignalType,
    pub initial_value: f64,
    pub final_value: f64,
    /// Time of the step (s)
    pub step_time: f64,
    /// Time at which a non-step signal starts (s)
    pub start_time: f64,
    pub slope: f64,
    pub offset: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub initial_frequency: f64,
    pub target_frequency: f64,
    pub target_time: TimeBound,
}

/// Unit step at t = 0
pub fn default_signal() -> SignalParameters {
    SignalParameters {
        signal_type: SignalType::Step,
        initial_value: 0.0,
        final_value: 1.0,
        step_time: 0.0,
        start_time: 0.0,
        slope: 1.0,
        offset: 0.0,
        amplitude: 1.0,
        frequency: 1.0,
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

/// Complete single-signal configuration
///
/// Serialized flat: the signal fields sit next to the publish parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub topic_name: String,
    pub publish_rate: f64,
    pub total_time: TimeBound,
    #[serde(flatten)]
    pub signal: Arc<SignalParameters>,
}

impl Default for Config {
    fn default() -> Self {
        hydrate(PartialConfig::default())
    }
}

/// Host-provided state; missing signal keys come from [`default_signal`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<TimeBound>,
    #[serde(flatten)]
    pub signal: SignalParameters,
}

impl From<Config> for PartialConfig {
    fn from(config: Config) -> Self {
        Self {
            topic_name: Some(config.topic_name),
            publish_rate: Some(config.publish_rate),
            total_time: Some(config.total_time),
            signal: Arc::unwrap_or_clone(config.signal),
        }
    }
}

/// Fill in missing general fields; out-of-range rate or total time counts as missing
pub fn hydrate(partial: PartialConfig) -> Config {
    Config {
        topic_name: partial.topic_name.unwrap_or_default(),
        publish_rate: stored_publish_rate(partial.publish_rate, DEFAULT_PUBLISH_RATE),
        total_time: stored_total_time(partial.total_time),
        signal: Arc::new(partial.signal),
    }
}
