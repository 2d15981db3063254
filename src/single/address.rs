//! Typed addressing for single-signal settings.
//!
//! Same scheme as the multi-signal variant, with the signal fields grouped
//! under one `signal` node instead of an indexed list.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use super::config::{Config, SignalParameters, SignalType};
use crate::error::SettingsError;
use crate::types::{FieldValue, TimeBound};

pub const GENERAL_NODE: &str = "general";
pub const SIGNAL_NODE: &str = "signal";

/// A field of the signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalField {
    SignalType,
    InitialValue,
    FinalValue,
    StepTime,
    StartTime,
    Slope,
    Offset,
    Amplitude,
    Frequency,
    InitialFrequency,
    TargetFrequency,
    TargetTime,
}

impl SignalField {
    pub const ALL: [SignalField; 12] = [
        SignalField::SignalType,
        SignalField::InitialValue,
        SignalField::FinalValue,
        SignalField::StepTime,
        SignalField::StartTime,
        SignalField::Slope,
        SignalField::Offset,
        SignalField::Amplitude,
        SignalField::Frequency,
        SignalField::InitialFrequency,
        SignalField::TargetFrequency,
        SignalField::TargetTime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SignalField::SignalType => "signalType",
            SignalField::InitialValue => "initialValue",
            SignalField::FinalValue => "finalValue",
            SignalField::StepTime => "stepTime",
            SignalField::StartTime => "startTime",
            SignalField::Slope => "slope",
            SignalField::Offset => "offset",
            SignalField::Amplitude => "amplitude",
            SignalField::Frequency => "frequency",
            SignalField::InitialFrequency => "initialFrequency",
            SignalField::TargetFrequency => "targetFrequency",
            SignalField::TargetTime => "targetTime",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        SignalField::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Whether the field is shown for `signal_type`
    ///
    /// A step switches at `stepTime`; every other type starts at `startTime`.
    pub fn applies_to(self, signal_type: SignalType) -> bool {
        use SignalType::*;
        match self {
            SignalField::SignalType => true,
            SignalField::InitialValue => matches!(signal_type, Step | Ramp),
            SignalField::FinalValue | SignalField::StepTime => signal_type == Step,
            SignalField::StartTime => signal_type != Step,
            SignalField::Slope => signal_type == Ramp,
            SignalField::Offset | SignalField::Amplitude => {
                matches!(signal_type, Sine | Square | Triangle | Sawtooth | Chirp)
            }
            SignalField::Frequency => matches!(signal_type, Sine | Square | Triangle | Sawtooth),
            SignalField::InitialFrequency
            | SignalField::TargetFrequency
            | SignalField::TargetTime => signal_type == Chirp,
        }
    }

    pub fn read(self, signal: &SignalParameters) -> FieldValue {
        match self {
            SignalField::SignalType => FieldValue::Text(signal.signal_type.as_str().to_string()),
            SignalField::InitialValue => signal.initial_value.into(),
            SignalField::FinalValue => signal.final_value.into(),
            SignalField::StepTime => signal.step_time.into(),
            SignalField::StartTime => signal.start_time.into(),
            SignalField::Slope => signal.slope.into(),
            SignalField::Offset => signal.offset.into(),
            SignalField::Amplitude => signal.amplitude.into(),
            SignalField::Frequency => signal.frequency.into(),
            SignalField::InitialFrequency => signal.initial_frequency.into(),
            SignalField::TargetFrequency => signal.target_frequency.into(),
            SignalField::TargetTime => signal.target_time.into(),
        }
    }

    pub fn with_value(self, value: FieldValue) -> Result<SignalUpdate, SettingsError> {
        let name = self.name();
        Ok(match self {
            SignalField::SignalType => SignalUpdate::SignalType(value.into_text(name)?.parse()?),
            SignalField::InitialValue => SignalUpdate::InitialValue(value.into_number(name)?),
            SignalField::FinalValue => SignalUpdate::FinalValue(value.into_number(name)?),
            SignalField::StepTime => SignalUpdate::StepTime(value.into_non_negative(name)?),
            SignalField::StartTime => SignalUpdate::StartTime(value.into_non_negative(name)?),
            SignalField::Slope => SignalUpdate::Slope(value.into_number(name)?),
            SignalField::Offset => SignalUpdate::Offset(value.into_number(name)?),
            SignalField::Amplitude => SignalUpdate::Amplitude(value.into_number(name)?),
            SignalField::Frequency => SignalUpdate::Frequency(value.into_non_negative(name)?),
            SignalField::InitialFrequency => {
                SignalUpdate::InitialFrequency(value.into_non_negative(name)?)
            }
            SignalField::TargetFrequency => {
                SignalUpdate::TargetFrequency(value.into_non_negative(name)?)
            }
            SignalField::TargetTime => SignalUpdate::TargetTime(value.into_bound(name)?),
        })
    }
}

/// Address of one editable value in a single-signal config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    TopicName,
    PublishRate,
    TotalTime,
    Signal(SignalField),
}

impl FieldKey {
    /// Host path, e.g. `["signal", "stepTime"]`
    pub fn path(&self) -> Vec<String> {
        match self {
            FieldKey::TopicName => vec![GENERAL_NODE.into(), "topicName".into()],
            FieldKey::PublishRate => vec![GENERAL_NODE.into(), "publishRate".into()],
            FieldKey::TotalTime => vec![GENERAL_NODE.into(), "totalTime".into()],
            FieldKey::Signal(field) => vec![SIGNAL_NODE.into(), field.name().into()],
        }
    }

    pub fn from_path<S: AsRef<str>>(path: &[S]) -> Result<Self, SettingsError> {
        let segments: Vec<&str> = path.iter().map(|s| s.as_ref()).collect();
        let unknown = || SettingsError::UnknownPath(segments.join("."));

        match segments.as_slice() {
            [GENERAL_NODE, "topicName"] => Ok(FieldKey::TopicName),
            [GENERAL_NODE, "publishRate"] => Ok(FieldKey::PublishRate),
            [GENERAL_NODE, "totalTime"] => Ok(FieldKey::TotalTime),
            [SIGNAL_NODE, name] => SignalField::from_name(name)
                .map(FieldKey::Signal)
                .ok_or_else(unknown),
            _ => Err(unknown()),
        }
    }

    /// Topic and signal type take text; every other field takes a number
    pub fn takes_text(self) -> bool {
        matches!(
            self,
            FieldKey::TopicName | FieldKey::Signal(SignalField::SignalType)
        )
    }

    pub fn with_value(self, value: FieldValue) -> Result<FieldUpdate, SettingsError> {
        Ok(match self {
            FieldKey::TopicName => FieldUpdate::TopicName(value.into_text("topicName")?),
            FieldKey::PublishRate => FieldUpdate::PublishRate(value.into_positive("publishRate")?),
            FieldKey::TotalTime => FieldUpdate::TotalTime(value.into_bound("totalTime")?),
            FieldKey::Signal(field) => FieldUpdate::Signal(field.with_value(value)?),
        })
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let path = self.path();
        let mut seq = serializer.serialize_seq(Some(path.len()))?;
        for segment in &path {
            seq.serialize_element(segment)?;
        }
        seq.end()
    }
}

/// A new value for one signal field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalUpdate {
    SignalType(SignalType),
    InitialValue(f64),
    FinalValue(f64),
    StepTime(f64),
    StartTime(f64),
    Slope(f64),
    Offset(f64),
    Amplitude(f64),
    Frequency(f64),
    InitialFrequency(f64),
    TargetFrequency(f64),
    TargetTime(TimeBound),
}

impl SignalUpdate {
    pub fn field(&self) -> SignalField {
        match self {
            SignalUpdate::SignalType(_) => SignalField::SignalType,
            SignalUpdate::InitialValue(_) => SignalField::InitialValue,
            SignalUpdate::FinalValue(_) => SignalField::FinalValue,
            SignalUpdate::StepTime(_) => SignalField::StepTime,
            SignalUpdate::StartTime(_) => SignalField::StartTime,
            SignalUpdate::Slope(_) => SignalField::Slope,
            SignalUpdate::Offset(_) => SignalField::Offset,
            SignalUpdate::Amplitude(_) => SignalField::Amplitude,
            SignalUpdate::Frequency(_) => SignalField::Frequency,
            SignalUpdate::InitialFrequency(_) => SignalField::InitialFrequency,
            SignalUpdate::TargetFrequency(_) => SignalField::TargetFrequency,
            SignalUpdate::TargetTime(_) => SignalField::TargetTime,
        }
    }

    pub fn apply(self, signal: &mut SignalParameters) {
        match self {
            SignalUpdate::SignalType(v) => signal.signal_type = v,
            SignalUpdate::InitialValue(v) => signal.initial_value = v,
            SignalUpdate::FinalValue(v) => signal.final_value = v,
            SignalUpdate::StepTime(v) => signal.step_time = v,
            SignalUpdate::StartTime(v) => signal.start_time = v,
            SignalUpdate::Slope(v) => signal.slope = v,
            SignalUpdate::Offset(v) => signal.offset = v,
            SignalUpdate::Amplitude(v) => signal.amplitude = v,
            SignalUpdate::Frequency(v) => signal.frequency = v,
            SignalUpdate::InitialFrequency(v) => signal.initial_frequency = v,
            SignalUpdate::TargetFrequency(v) => signal.target_frequency = v,
            SignalUpdate::TargetTime(v) => signal.target_time = v,
        }
    }
}

/// A new value for one field of a single-signal config
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    TopicName(String),
    PublishRate(f64),
    TotalTime(TimeBound),
    Signal(SignalUpdate),
}

impl FieldUpdate {
    pub fn key(&self) -> FieldKey {
        match self {
            FieldUpdate::TopicName(_) => FieldKey::TopicName,
            FieldUpdate::PublishRate(_) => FieldKey::PublishRate,
            FieldUpdate::TotalTime(_) => FieldKey::TotalTime,
            FieldUpdate::Signal(update) => FieldKey::Signal(update.field()),
        }
    }
}

/// The single-signal tree offers no node actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NoNodeAction {}

/// Everything the single-signal reducer accepts
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Update(FieldUpdate),
}

impl From<FieldUpdate> for Action {
    fn from(update: FieldUpdate) -> Self {
        Action::Update(update)
    }
}

impl Config {
    /// Read the value at `key`
    pub fn value(&self, key: FieldKey) -> FieldValue {
        match key {
            FieldKey::TopicName => FieldValue::Text(self.topic_name.clone()),
            FieldKey::PublishRate => FieldValue::Number(self.publish_rate),
            FieldKey::TotalTime => self.total_time.into(),
            FieldKey::Signal(field) => field.read(&self.signal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_round_trip() {
        let keys = [FieldKey::TopicName, FieldKey::PublishRate, FieldKey::TotalTime]
            .into_iter()
            .chain(SignalField::ALL.into_iter().map(FieldKey::Signal));
        for key in keys {
            assert_eq!(FieldKey::from_path(key.path().as_slice()), Ok(key));
        }
    }

    #[test]
    fn test_from_path_rejects_multi_paths() {
        assert!(FieldKey::from_path(&["paths", "0", "slope"]).is_err());
        assert!(FieldKey::from_path(&["signal", "phase"]).is_err());
        assert!(FieldKey::from_path(&["signal", "endTime"]).is_err());
    }

    #[test]
    fn test_step_time_only_for_step() {
        assert!(SignalField::StepTime.applies_to(SignalType::Step));
        assert!(!SignalField::StartTime.applies_to(SignalType::Step));
        for t in SignalType::ALL.into_iter().filter(|t| *t != SignalType::Step) {
            assert!(!SignalField::StepTime.applies_to(t));
            assert!(SignalField::StartTime.applies_to(t));
        }
    }

    #[test]
    fn test_target_time_accepts_unset() {
        let key = FieldKey::Signal(SignalField::TargetTime);
        assert_eq!(
            key.with_value(FieldValue::Unset),
            Ok(FieldUpdate::Signal(SignalUpdate::TargetTime(TimeBound::Unbounded)))
        );
        assert_eq!(key.with_value(FieldValue::Unset).unwrap().key(), key);
    }

    #[test]
    fn test_negative_times_and_rates_rejected() {
        let rejects = |key: FieldKey, value: f64| {
            matches!(
                key.with_value(FieldValue::Number(value)),
                Err(SettingsError::OutOfRange { .. })
            )
        };

        assert!(rejects(FieldKey::PublishRate, 0.0));
        assert!(rejects(FieldKey::PublishRate, -5.0));
        assert!(rejects(FieldKey::TotalTime, -3.0));
        assert!(rejects(FieldKey::Signal(SignalField::StepTime), -0.1));
        assert!(rejects(FieldKey::Signal(SignalField::StartTime), -2.0));
        assert!(rejects(FieldKey::Signal(SignalField::TargetTime), -1.0));
        assert!(rejects(FieldKey::Signal(SignalField::Frequency), -1.0));

        assert!(FieldKey::Signal(SignalField::Offset)
            .with_value(FieldValue::Number(-4.0))
            .is_ok());
        assert!(FieldKey::PublishRate
            .with_value(FieldValue::Number(0.5))
            .is_ok());
    }

    #[test]
    fn test_value_reads_signal_fields() {
        let config = Config::default();
        assert_eq!(
            config.value(FieldKey::Signal(SignalField::FinalValue)),
            FieldValue::Number(1.0)
        );
        assert_eq!(config.value(FieldKey::TotalTime), FieldValue::Unset);
    }
}
