//! Typed scalar values.
//!
//! A [`Value`] is what flows in and out of the database layer: values given
//! by callers for inserts and updates, and values decoded from result rows.
//! [`Value::coerce`] turns a caller value into the representation of a
//! declared [`FieldType`] before it is quoted.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::field::FieldType;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// A scalar database value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// NULL value.
    Null,
    /// Integer value.
    Integer(i64),
    /// Float value.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// Text value.
    Text(String),
    /// Date value.
    Date(NaiveDate),
    /// Time-of-day value.
    Time(NaiveTime),
    /// Timestamp value.
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns whether this is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Short description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Null => String::from("null"),
            Self::Integer(n) => format!("integer {n}"),
            Self::Float(f) => format!("float {f}"),
            Self::Boolean(b) => format!("boolean {b}"),
            Self::Text(s) => format!("text '{s}'"),
            Self::Date(d) => format!("date {d}"),
            Self::Time(t) => format!("time {t}"),
            Self::Timestamp(ts) => format!("timestamp {ts}"),
        }
    }

    /// Renders the value as plain text, without SQL quoting.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Integer(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Text(s) => s.clone(),
            Self::Date(d) => d.format(DATE_FORMAT).to_string(),
            Self::Time(t) => t.format(TIME_FORMATS[0]).to_string(),
            Self::Timestamp(ts) => ts.format(TIMESTAMP_FORMATS[0]).to_string(),
        }
    }

    /// Parses caller-supplied text as the given field type.
    pub fn parse_as(text: &str, field_type: FieldType) -> Result<Self> {
        Self::Text(text.to_string()).coerce(field_type)
    }

    /// Converts the value to the representation of `field_type`.
    ///
    /// `Null` is valid for every type. Text is parsed, integers widen to
    /// floats, `0`/`1` map to booleans and timestamps narrow to dates or
    /// times. Anything else is a [`Error::TypeMismatch`].
    pub fn coerce(self, field_type: FieldType) -> Result<Self> {
        let mismatch = |value: &Self| Error::TypeMismatch {
            expected: field_type,
            found: value.describe(),
        };

        let coerced = match (field_type, self) {
            (_, Self::Null) => Self::Null,

            (FieldType::Integer, v @ Self::Integer(_)) => v,
            (FieldType::Integer, Self::Boolean(b)) => Self::Integer(i64::from(b)),
            (FieldType::Integer, Self::Float(f)) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Self::Integer(f as i64)
                } else {
                    return Err(mismatch(&Self::Float(f)));
                }
            }
            (FieldType::Integer, Self::Text(s)) => match s.trim().parse::<i64>() {
                Ok(n) => Self::Integer(n),
                Err(_) => return Err(mismatch(&Self::Text(s))),
            },

            (FieldType::Float, Self::Float(f)) if f.is_finite() => Self::Float(f),
            (FieldType::Float, Self::Integer(n)) => Self::Float(n as f64),
            (FieldType::Float, Self::Text(s)) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => Self::Float(f),
                _ => return Err(mismatch(&Self::Text(s))),
            },

            (FieldType::Boolean, v @ Self::Boolean(_)) => v,
            (FieldType::Boolean, Self::Integer(0)) => Self::Boolean(false),
            (FieldType::Boolean, Self::Integer(1)) => Self::Boolean(true),
            (FieldType::Boolean, Self::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "on" | "1" => Self::Boolean(true),
                "false" | "f" | "no" | "n" | "off" | "0" => Self::Boolean(false),
                _ => return Err(mismatch(&Self::Text(s))),
            },

            (FieldType::Text, v @ Self::Text(_)) => v,
            (FieldType::Text, Self::Float(f)) if !f.is_finite() => {
                return Err(mismatch(&Self::Float(f)));
            }
            (FieldType::Text, v) => Self::Text(v.to_text()),

            (FieldType::Date, v @ Self::Date(_)) => v,
            (FieldType::Date, Self::Timestamp(ts)) => Self::Date(ts.date()),
            (FieldType::Date, Self::Text(s)) => match parse_date(&s) {
                Some(d) => Self::Date(d),
                None => return Err(mismatch(&Self::Text(s))),
            },

            (FieldType::Time, v @ Self::Time(_)) => v,
            (FieldType::Time, Self::Timestamp(ts)) => Self::Time(ts.time()),
            (FieldType::Time, Self::Text(s)) => match parse_time(&s) {
                Some(t) => Self::Time(t),
                None => return Err(mismatch(&Self::Text(s))),
            },

            (FieldType::Timestamp, v @ Self::Timestamp(_)) => v,
            (FieldType::Timestamp, Self::Date(d)) => Self::Timestamp(d.and_time(NaiveTime::MIN)),
            (FieldType::Timestamp, Self::Text(s)) => match parse_timestamp(&s) {
                Some(ts) => Self::Timestamp(ts),
                None => return Err(mismatch(&Self::Text(s))),
            },

            (_, other) => return Err(mismatch(&other)),
        };

        Ok(coerced)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| parse_timestamp(s).map(|ts| ts.date()))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(String::from(s))
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Self::Timestamp(ts)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_coerces_to_every_type() {
        for ty in FieldType::ALL {
            assert_eq!(Value::Null.coerce(ty).unwrap(), Value::Null);
        }
    }

    #[test]
    fn test_text_to_integer() {
        assert_eq!(Value::from(" 42 ").coerce(FieldType::Integer).unwrap(), Value::Integer(42));
        let err = Value::from("4x").coerce(FieldType::Integer).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: FieldType::Integer,
                found: String::from("text '4x'"),
            }
        );
    }

    #[test]
    fn test_integer_to_boolean() {
        assert_eq!(Value::Integer(1).coerce(FieldType::Boolean).unwrap(), Value::Boolean(true));
        assert_eq!(Value::Integer(0).coerce(FieldType::Boolean).unwrap(), Value::Boolean(false));
        assert!(Value::Integer(2).coerce(FieldType::Boolean).is_err());
    }

    #[test]
    fn test_text_to_boolean() {
        assert_eq!(Value::from("on").coerce(FieldType::Boolean).unwrap(), Value::Boolean(true));
        assert_eq!(Value::from("FALSE").coerce(FieldType::Boolean).unwrap(), Value::Boolean(false));
        assert!(Value::from("maybe").coerce(FieldType::Boolean).is_err());
    }

    #[test]
    fn test_float_rules() {
        assert_eq!(Value::Integer(3).coerce(FieldType::Float).unwrap(), Value::Float(3.0));
        assert_eq!(Value::Float(3.0).coerce(FieldType::Integer).unwrap(), Value::Integer(3));
        assert!(Value::Float(3.5).coerce(FieldType::Integer).is_err());
        assert!(Value::Float(f64::NAN).coerce(FieldType::Float).is_err());
        assert!(Value::from("inf").coerce(FieldType::Float).is_err());
    }

    #[test]
    fn test_anything_to_text() {
        assert_eq!(Value::Integer(7).coerce(FieldType::Text).unwrap(), Value::from("7"));
        assert_eq!(Value::Boolean(true).coerce(FieldType::Text).unwrap(), Value::from("true"));
    }

    #[test]
    fn test_temporal_parsing() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Value::from("2024-02-29").coerce(FieldType::Date).unwrap(), Value::Date(date));
        assert_eq!(
            Value::from("2024-02-29 13:45:00").coerce(FieldType::Date).unwrap(),
            Value::Date(date)
        );

        let ts = date.and_hms_opt(13, 45, 0).unwrap();
        assert_eq!(
            Value::from("2024-02-29T13:45:00").coerce(FieldType::Timestamp).unwrap(),
            Value::Timestamp(ts)
        );
        assert_eq!(Value::Date(date).coerce(FieldType::Timestamp).unwrap(), Value::Timestamp(date.and_time(NaiveTime::MIN)));
        assert_eq!(
            Value::from("13:45").coerce(FieldType::Time).unwrap(),
            Value::Time(NaiveTime::from_hms_opt(13, 45, 0).unwrap())
        );
        assert!(Value::from("2024-02-30").coerce(FieldType::Date).is_err());
    }

    #[test]
    fn test_integer_not_a_date() {
        assert!(matches!(
            Value::Integer(20240101).coerce(FieldType::Date),
            Err(Error::TypeMismatch { expected: FieldType::Date, .. })
        ));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from("News").as_str(), Some("News"));
        assert_eq!(Value::Integer(1).as_str(), None);
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::from("true").as_bool(), None);
        assert_eq!(Value::Integer(9).as_i64(), Some(9));
    }

    #[test]
    fn test_parse_as() {
        assert_eq!(Value::parse_as("12", FieldType::Integer).unwrap(), Value::Integer(12));
        assert_eq!(Value::parse_as("12", FieldType::Text).unwrap(), Value::from("12"));
    }
}
