//! Core value types shared by both configuration variants
//!
//! # Main Types
//!
//! - [`TimeBound`] - A time value that may be unbounded ("no limit")
//! - [`Topic`] - A topic advertised by the host, used to populate the topic select
//! - [`FieldValue`] - A raw value coming out of an editor input
//!
//! # Unbounded times
//!
//! Open time limits (`totalTime`, per-signal `endTime` and `targetTime`) are
//! stored as [`TimeBound::Unbounded`], never as a floating-point infinity. In
//! serialized panel state the unbounded value is written as the string
//! `"inf"`. Conversion to `f64::INFINITY` only happens when a start request
//! is assembled.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::SettingsError;

/// Keyword used for an unbounded time in serialized state and editor placeholders
pub const UNBOUNDED_KEYWORD: &str = "inf";

/// A time limit that is either a finite number of seconds or unbounded
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TimeBound {
    /// A finite limit in seconds
    Finite(f64),
    /// No limit
    #[default]
    Unbounded,
}

impl TimeBound {
    /// Build a bound from a float, mapping positive infinity to [`TimeBound::Unbounded`]
    pub fn from_f64(value: f64) -> Result<Self, SettingsError> {
        if value.is_finite() {
            Ok(TimeBound::Finite(value))
        } else if value == f64::INFINITY {
            Ok(TimeBound::Unbounded)
        } else {
            Err(SettingsError::InvalidBound(value.to_string()))
        }
    }

    /// Float form used on the wire, with `f64::INFINITY` for unbounded
    pub fn to_f64(self) -> f64 {
        match self {
            TimeBound::Finite(v) => v,
            TimeBound::Unbounded => f64::INFINITY,
        }
    }

    /// Unbounded, or a finite limit of at least zero seconds
    pub fn is_non_negative(self) -> bool {
        match self {
            TimeBound::Finite(v) => v >= 0.0,
            TimeBound::Unbounded => true,
        }
    }
}

/// Publish rate from host state, or `default` when missing or not above zero
pub(crate) fn stored_publish_rate(rate: Option<f64>, default: f64) -> f64 {
    match rate {
        Some(rate) if rate > 0.0 => rate,
        Some(rate) => {
            tracing::warn!("Ignoring stored publish rate {}, using {}", rate, default);
            default
        }
        None => default,
    }
}

/// Total time from host state, unbounded when missing or negative
pub(crate) fn stored_total_time(total: Option<TimeBound>) -> TimeBound {
    match total {
        Some(total) if total.is_non_negative() => total,
        Some(total) => {
            tracing::warn!("Ignoring stored total time {}, using {}", total, UNBOUNDED_KEYWORD);
            TimeBound::Unbounded
        }
        None => TimeBound::Unbounded,
    }
}

impl fmt::Display for TimeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBound::Finite(v) => write!(f, "{}", v),
            TimeBound::Unbounded => write!(f, "{}", UNBOUNDED_KEYWORD),
        }
    }
}

impl FromStr for TimeBound {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(UNBOUNDED_KEYWORD)
            || trimmed.eq_ignore_ascii_case("infinity")
        {
            return Ok(TimeBound::Unbounded);
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| SettingsError::InvalidBound(s.to_string()))?;
        TimeBound::from_f64(value)
    }
}

impl From<f64> for TimeBound {
    /// Lossy conversion: anything that is not finite becomes unbounded
    fn from(value: f64) -> Self {
        TimeBound::from_f64(value).unwrap_or(TimeBound::Unbounded)
    }
}

impl Serialize for TimeBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimeBound::Finite(v) => serializer.serialize_f64(*v),
            TimeBound::Unbounded => serializer.serialize_str(UNBOUNDED_KEYWORD),
        }
    }
}

impl<'de> Deserialize<'de> for TimeBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(TimeBound::Unbounded),
            Some(Repr::Number(v)) => TimeBound::from_f64(v).map_err(D::Error::custom),
            Some(Repr::Text(text)) => text.parse().map_err(D::Error::custom),
        }
    }
}

/// A topic advertised by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Topic name, e.g. `/reference`
    pub name: String,
    /// Fully qualified message schema, e.g. `std_msgs/msg/Float64`
    pub schema_name: String,
}

impl Topic {
    pub fn new(name: impl Into<String>, schema_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: schema_name.into(),
        }
    }
}

/// A raw value produced by an editor input
///
/// Number inputs produce [`FieldValue::Number`], selects produce
/// [`FieldValue::Text`], and a cleared input produces [`FieldValue::Unset`]
/// (which time-bound fields read as "unbounded").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Unset,
}

impl FieldValue {
    pub(crate) fn into_number(self, field: &'static str) -> Result<f64, SettingsError> {
        match self {
            FieldValue::Number(v) if v.is_finite() => Ok(v),
            FieldValue::Number(v) => Err(SettingsError::TypeMismatch {
                field,
                expected: "a finite number",
                got: v.to_string(),
            }),
            FieldValue::Text(text) => Err(SettingsError::TypeMismatch {
                field,
                expected: "a number",
                got: format!("{:?}", text),
            }),
            FieldValue::Unset => Err(SettingsError::MissingValue(field)),
        }
    }

    /// A number of at least zero
    pub(crate) fn into_non_negative(self, field: &'static str) -> Result<f64, SettingsError> {
        match self.into_number(field)? {
            v if v >= 0.0 => Ok(v),
            v => Err(SettingsError::OutOfRange {
                field,
                expected: "at least 0",
                got: v,
            }),
        }
    }

    /// A number strictly above zero
    pub(crate) fn into_positive(self, field: &'static str) -> Result<f64, SettingsError> {
        match self.into_number(field)? {
            v if v > 0.0 => Ok(v),
            v => Err(SettingsError::OutOfRange {
                field,
                expected: "greater than 0",
                got: v,
            }),
        }
    }

    /// A non-negative time bound; cleared input means unbounded
    pub(crate) fn into_bound(self, field: &'static str) -> Result<TimeBound, SettingsError> {
        let bound = match self {
            FieldValue::Number(v) => TimeBound::from_f64(v)?,
            FieldValue::Text(text) => text.parse()?,
            FieldValue::Unset => TimeBound::Unbounded,
        };
        match bound {
            TimeBound::Finite(v) if v < 0.0 => Err(SettingsError::OutOfRange {
                field,
                expected: "at least 0",
                got: v,
            }),
            bound => Ok(bound),
        }
    }

    pub(crate) fn into_text(self, field: &'static str) -> Result<String, SettingsError> {
        match self {
            FieldValue::Text(text) => Ok(text),
            FieldValue::Number(v) => Err(SettingsError::TypeMismatch {
                field,
                expected: "text",
                got: v.to_string(),
            }),
            FieldValue::Unset => Err(SettingsError::MissingValue(field)),
        }
    }
}

impl From<TimeBound> for FieldValue {
    fn from(bound: TimeBound) -> Self {
        match bound {
            TimeBound::Finite(v) => FieldValue::Number(v),
            TimeBound::Unbounded => FieldValue::Unset,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}
