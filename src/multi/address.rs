//! Typed addressing for multi-signal settings.
//!
//! Every field the tree shows carries a [`FieldKey`]. The host pairs a key
//! with the raw editor value through [`FieldKey::with_value`], which yields a
//! [`FieldUpdate`]: a closed enumeration of every legal (field, value type)
//! pair. The reducer only ever sees `FieldUpdate`s, so a value of the wrong
//! shape is rejected when the update is built, never while applying it.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use super::config::{default_signal, Config, SignalParameters, SignalType};
use crate::error::SettingsError;
use crate::types::{FieldValue, TimeBound};

/// Path segment of the general settings node
pub const GENERAL_NODE: &str = "general";
/// Path segment of the signal list node
pub const PATHS_NODE: &str = "paths";

/// A field of one signal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalField {
    SignalType,
    InitialValue,
    FinalValue,
    StartTime,
    EndTime,
    Slope,
    Offset,
    Amplitude,
    Frequency,
    Phase,
    InitialFrequency,
    TargetFrequency,
    TargetTime,
}

impl SignalField {
    /// All fields, in the order they appear in a signal node
    pub const ALL: [SignalField; 13] = [
        SignalField::SignalType,
        SignalField::InitialValue,
        SignalField::FinalValue,
        SignalField::StartTime,
        SignalField::EndTime,
        SignalField::Slope,
        SignalField::Offset,
        SignalField::Amplitude,
        SignalField::Frequency,
        SignalField::Phase,
        SignalField::InitialFrequency,
        SignalField::TargetFrequency,
        SignalField::TargetTime,
    ];

    /// Key used in config JSON and settings paths
    pub fn name(self) -> &'static str {
        match self {
            SignalField::SignalType => "signalType",
            SignalField::InitialValue => "initialValue",
            SignalField::FinalValue => "finalValue",
            SignalField::StartTime => "startTime",
            SignalField::EndTime => "endTime",
            SignalField::Slope => "slope",
            SignalField::Offset => "offset",
            SignalField::Amplitude => "amplitude",
            SignalField::Frequency => "frequency",
            SignalField::Phase => "phase",
            SignalField::InitialFrequency => "initialFrequency",
            SignalField::TargetFrequency => "targetFrequency",
            SignalField::TargetTime => "targetTime",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        SignalField::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Whether the field is shown for a signal of type `signal_type`
    pub fn applies_to(self, signal_type: SignalType) -> bool {
        use SignalType::*;
        match self {
            SignalField::SignalType | SignalField::StartTime | SignalField::EndTime => true,
            SignalField::InitialValue => matches!(signal_type, Step | Ramp | Spline),
            SignalField::FinalValue => matches!(signal_type, Step | Spline),
            SignalField::Slope => signal_type == Ramp,
            SignalField::Offset | SignalField::Amplitude | SignalField::Phase => {
                matches!(signal_type, Sine | Square | Triangle | Sawtooth | Chirp)
            }
            SignalField::Frequency => matches!(signal_type, Sine | Square | Triangle | Sawtooth),
            SignalField::InitialFrequency
            | SignalField::TargetFrequency
            | SignalField::TargetTime => signal_type == Chirp,
        }
    }

    /// Current value of this field in `signal`
    pub fn read(self, signal: &SignalParameters) -> FieldValue {
        match self {
            SignalField::SignalType => FieldValue::Text(signal.signal_type.as_str().to_string()),
            SignalField::InitialValue => signal.initial_value.into(),
            SignalField::FinalValue => signal.final_value.into(),
            SignalField::StartTime => signal.start_time.into(),
            SignalField::EndTime => signal.end_time.into(),
            SignalField::Slope => signal.slope.into(),
            SignalField::Offset => signal.offset.into(),
            SignalField::Amplitude => signal.amplitude.into(),
            SignalField::Frequency => signal.frequency.into(),
            SignalField::Phase => signal.phase.into(),
            SignalField::InitialFrequency => signal.initial_frequency.into(),
            SignalField::TargetFrequency => signal.target_frequency.into(),
            SignalField::TargetTime => signal.target_time.into(),
        }
    }

    /// Pair the field with a raw editor value
    ///
    /// Times and frequencies must be at least zero.
    pub fn with_value(self, value: FieldValue) -> Result<SignalUpdate, SettingsError> {
        let name = self.name();
        Ok(match self {
            SignalField::SignalType => SignalUpdate::SignalType(value.into_text(name)?.parse()?),
            SignalField::InitialValue => SignalUpdate::InitialValue(value.into_number(name)?),
            SignalField::FinalValue => SignalUpdate::FinalValue(value.into_number(name)?),
            SignalField::StartTime => SignalUpdate::StartTime(value.into_non_negative(name)?),
            SignalField::EndTime => SignalUpdate::EndTime(value.into_bound(name)?),
            SignalField::Slope => SignalUpdate::Slope(value.into_number(name)?),
            SignalField::Offset => SignalUpdate::Offset(value.into_number(name)?),
            SignalField::Amplitude => SignalUpdate::Amplitude(value.into_number(name)?),
            SignalField::Frequency => SignalUpdate::Frequency(value.into_non_negative(name)?),
            SignalField::Phase => SignalUpdate::Phase(value.into_number(name)?),
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

/// Address of one editable value in a multi-signal config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    TopicName,
    PublishRate,
    TotalTime,
    Signal { index: usize, field: SignalField },
}

impl FieldKey {
    /// Host path of this field, e.g. `["paths", "2", "slope"]`
    pub fn path(&self) -> Vec<String> {
        match self {
            FieldKey::TopicName => vec![GENERAL_NODE.into(), "topicName".into()],
            FieldKey::PublishRate => vec![GENERAL_NODE.into(), "publishRate".into()],
            FieldKey::TotalTime => vec![GENERAL_NODE.into(), "totalTime".into()],
            FieldKey::Signal { index, field } => {
                vec![PATHS_NODE.into(), index.to_string(), field.name().into()]
            }
        }
    }

    /// Parse a host path; the `general` grouping maps to top-level fields
    pub fn from_path<S: AsRef<str>>(path: &[S]) -> Result<Self, SettingsError> {
        let segments: Vec<&str> = path.iter().map(|s| s.as_ref()).collect();
        let unknown = || SettingsError::UnknownPath(segments.join("."));

        match segments.as_slice() {
            [GENERAL_NODE, "topicName"] => Ok(FieldKey::TopicName),
            [GENERAL_NODE, "publishRate"] => Ok(FieldKey::PublishRate),
            [GENERAL_NODE, "totalTime"] => Ok(FieldKey::TotalTime),
            [PATHS_NODE, index, name] => {
                let index = index.parse().map_err(|_| unknown())?;
                let field = SignalField::from_name(name).ok_or_else(unknown)?;
                Ok(FieldKey::Signal { index, field })
            }
            _ => Err(unknown()),
        }
    }

    /// Topic and signal type take text; every other field takes a number
    pub fn takes_text(self) -> bool {
        matches!(
            self,
            FieldKey::TopicName | FieldKey::Signal {
                field: SignalField::SignalType,
                ..
            }
        )
    }

    /// Pair the address with a raw editor value
    pub fn with_value(self, value: FieldValue) -> Result<FieldUpdate, SettingsError> {
        Ok(match self {
            FieldKey::TopicName => FieldUpdate::TopicName(value.into_text("topicName")?),
            FieldKey::PublishRate => FieldUpdate::PublishRate(value.into_positive("publishRate")?),
            FieldKey::TotalTime => FieldUpdate::TotalTime(value.into_bound("totalTime")?),
            FieldKey::Signal { index, field } => FieldUpdate::Signal {
                index,
                update: field.with_value(value)?,
            },
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

/// A new value for one field of a signal entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalUpdate {
    SignalType(SignalType),
    InitialValue(f64),
    FinalValue(f64),
    StartTime(f64),
    EndTime(TimeBound),
    Slope(f64),
    Offset(f64),
    Amplitude(f64),
    Frequency(f64),
    Phase(f64),
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
            SignalUpdate::StartTime(_) => SignalField::StartTime,
            SignalUpdate::EndTime(_) => SignalField::EndTime,
            SignalUpdate::Slope(_) => SignalField::Slope,
            SignalUpdate::Offset(_) => SignalField::Offset,
            SignalUpdate::Amplitude(_) => SignalField::Amplitude,
            SignalUpdate::Frequency(_) => SignalField::Frequency,
            SignalUpdate::Phase(_) => SignalField::Phase,
            SignalUpdate::InitialFrequency(_) => SignalField::InitialFrequency,
            SignalUpdate::TargetFrequency(_) => SignalField::TargetFrequency,
            SignalUpdate::TargetTime(_) => SignalField::TargetTime,
        }
    }

    /// Write the value into `signal`, leaving every other field alone
    pub fn apply(self, signal: &mut SignalParameters) {
        match self {
            SignalUpdate::SignalType(v) => signal.signal_type = v,
            SignalUpdate::InitialValue(v) => signal.initial_value = v,
            SignalUpdate::FinalValue(v) => signal.final_value = v,
            SignalUpdate::StartTime(v) => signal.start_time = v,
            SignalUpdate::EndTime(v) => signal.end_time = v,
            SignalUpdate::Slope(v) => signal.slope = v,
            SignalUpdate::Offset(v) => signal.offset = v,
            SignalUpdate::Amplitude(v) => signal.amplitude = v,
            SignalUpdate::Frequency(v) => signal.frequency = v,
            SignalUpdate::Phase(v) => signal.phase = v,
            SignalUpdate::InitialFrequency(v) => signal.initial_frequency = v,
            SignalUpdate::TargetFrequency(v) => signal.target_frequency = v,
            SignalUpdate::TargetTime(v) => signal.target_time = v,
        }
    }
}

/// A new value for one field of a multi-signal config
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    TopicName(String),
    PublishRate(f64),
    TotalTime(TimeBound),
    Signal { index: usize, update: SignalUpdate },
}

impl FieldUpdate {
    /// Address this update writes to
    pub fn key(&self) -> FieldKey {
        match self {
            FieldUpdate::TopicName(_) => FieldKey::TopicName,
            FieldUpdate::PublishRate(_) => FieldKey::PublishRate,
            FieldUpdate::TotalTime(_) => FieldKey::TotalTime,
            FieldUpdate::Signal { index, update } => FieldKey::Signal {
                index: *index,
                field: update.field(),
            },
        }
    }
}

/// Node-level actions offered by the signal list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "id", rename_all = "kebab-case")]
pub enum NodeAction {
    /// Append a default signal
    AddSignal,
    /// Remove the signal at `index`
    DeleteSignal { index: usize },
}

impl NodeAction {
    /// Parse a host action id (`add-signal`, `delete-signal`)
    pub fn from_id(id: &str, index: Option<usize>) -> Result<Self, SettingsError> {
        match (id, index) {
            ("add-signal", _) => Ok(NodeAction::AddSignal),
            ("delete-signal", Some(index)) => Ok(NodeAction::DeleteSignal { index }),
            _ => Err(SettingsError::UnknownAction(id.to_string())),
        }
    }
}

/// Everything the multi-signal reducer accepts
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Update(FieldUpdate),
    Node(NodeAction),
}

impl From<FieldUpdate> for Action {
    fn from(update: FieldUpdate) -> Self {
        Action::Update(update)
    }
}

impl From<NodeAction> for Action {
    fn from(action: NodeAction) -> Self {
        Action::Node(action)
    }
}

impl Config {
    /// Read the value at `key`
    ///
    /// Index 0 of an empty signal list reads from the implicit default signal
    /// the settings tree shows in that case.
    pub fn value(&self, key: FieldKey) -> Option<FieldValue> {
        match key {
            FieldKey::TopicName => Some(FieldValue::Text(self.topic_name.clone())),
            FieldKey::PublishRate => Some(FieldValue::Number(self.publish_rate)),
            FieldKey::TotalTime => Some(self.total_time.into()),
            FieldKey::Signal { index, field } => match self.signal(index) {
                Some(signal) => Some(field.read(signal)),
                None if index == 0 && self.paths.is_empty() => Some(field.read(&default_signal())),
                None => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_round_trip() {
        for key in [
            FieldKey::TopicName,
            FieldKey::PublishRate,
            FieldKey::TotalTime,
            FieldKey::Signal {
                index: 3,
                field: SignalField::TargetFrequency,
            },
        ] {
            assert_eq!(FieldKey::from_path(key.path().as_slice()), Ok(key));
        }
    }

    #[test]
    fn test_from_path_rejects_unknown() {
        assert!(FieldKey::from_path(&["general", "slope"]).is_err());
        assert!(FieldKey::from_path(&["paths", "x", "slope"]).is_err());
        assert!(FieldKey::from_path(&["paths", "0", "stepTime"]).is_err());
        assert!(FieldKey::from_path(&["topicName"]).is_err());
    }

    #[test]
    fn test_with_value_type_checks() {
        let key = FieldKey::Signal {
            index: 0,
            field: SignalField::SignalType,
        };
        assert_eq!(
            key.with_value("ramp".into()),
            Ok(FieldUpdate::Signal {
                index: 0,
                update: SignalUpdate::SignalType(SignalType::Ramp)
            })
        );
        assert!(key.with_value(FieldValue::Number(1.0)).is_err());
        assert!(key.with_value("noise".into()).is_err());

        assert_eq!(
            FieldKey::TotalTime.with_value(FieldValue::Unset),
            Ok(FieldUpdate::TotalTime(TimeBound::Unbounded))
        );
        assert_eq!(
            FieldKey::PublishRate.with_value(FieldValue::Unset),
            Err(SettingsError::MissingValue("publishRate"))
        );
    }

    #[test]
    fn test_with_value_rejects_out_of_range() {
        let out_of_range = |key: FieldKey, value: f64| {
            matches!(
                key.with_value(FieldValue::Number(value)),
                Err(SettingsError::OutOfRange { .. })
            )
        };

        assert!(out_of_range(FieldKey::PublishRate, 0.0));
        assert!(out_of_range(FieldKey::PublishRate, -5.0));
        assert!(out_of_range(FieldKey::TotalTime, -3.0));
        for field in [
            SignalField::StartTime,
            SignalField::EndTime,
            SignalField::Frequency,
            SignalField::InitialFrequency,
            SignalField::TargetFrequency,
            SignalField::TargetTime,
        ] {
            assert!(out_of_range(FieldKey::Signal { index: 0, field }, -1.0), "{:?}", field);
        }

        // Levels and phase may go negative
        for field in [
            SignalField::InitialValue,
            SignalField::FinalValue,
            SignalField::Slope,
            SignalField::Offset,
            SignalField::Amplitude,
            SignalField::Phase,
        ] {
            assert!(FieldKey::Signal { index: 0, field }
                .with_value(FieldValue::Number(-1.0))
                .is_ok());
        }
        assert_eq!(
            FieldKey::TotalTime.with_value(FieldValue::Number(0.0)),
            Ok(FieldUpdate::TotalTime(TimeBound::Finite(0.0)))
        );
    }

    #[test]
    fn test_update_key_matches_address() {
        let key = FieldKey::Signal {
            index: 1,
            field: SignalField::EndTime,
        };
        let update = key.with_value(FieldValue::Number(5.0)).unwrap();
        assert_eq!(update.key(), key);
    }

    #[test]
    fn test_applicability_table() {
        assert!(SignalField::InitialValue.applies_to(SignalType::Spline));
        assert!(!SignalField::InitialValue.applies_to(SignalType::Sine));
        assert!(SignalField::Phase.applies_to(SignalType::Chirp));
        assert!(!SignalField::Frequency.applies_to(SignalType::Chirp));
        assert!(SignalField::EndTime.applies_to(SignalType::Sawtooth));
        assert!(!SignalField::Slope.applies_to(SignalType::Step));
    }

    #[test]
    fn test_key_serializes_as_path() {
        let key = FieldKey::Signal {
            index: 2,
            field: SignalField::Slope,
        };
        assert_eq!(
            serde_json::to_value(key).unwrap(),
            serde_json::json!(["paths", "2", "slope"])
        );
    }

    #[test]
    fn test_node_action_from_id() {
        assert_eq!(
            NodeAction::from_id("delete-signal", Some(2)),
            Ok(NodeAction::DeleteSignal { index: 2 })
        );
        assert!(NodeAction::from_id("delete-signal", None).is_err());
        assert!(NodeAction::from_id("rename", None).is_err());
    }

    #[test]
    fn test_value_reads_implicit_default() {
        let mut config = Config::default();
        config.paths = std::sync::Arc::from(Vec::new());
        let key = FieldKey::Signal {
            index: 0,
            field: SignalField::FinalValue,
        };
        assert_eq!(config.value(key), Some(FieldValue::Number(1.0)));
        assert_eq!(
            config.value(FieldKey::Signal {
                index: 1,
                field: SignalField::FinalValue
            }),
            None
        );
    }
}
