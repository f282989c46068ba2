//! `Value` — a MySQL JSON document node.
//!
//! Besides the plain JSON types, MySQL's binary JSON format carries DATE,
//! DATETIME, TIME, BLOB and BIT scalars. They are kept as distinct variants
//! so they survive a round trip through generated SQL.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::clock::Clock;
use crate::marshal::SqlEncoder;

/// A JSON value as MySQL models it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// Key/value pairs in insertion order. Keys are not checked for
    /// uniqueness.
    Object(Vec<(String, Value)>),
    Array(Vec<Value>),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// A time-of-day anchored on the day it was decoded. Its distance from
    /// the current day's midnight is the MySQL TIME value, which may be
    /// negative or exceed 24 hours.
    Time(NaiveDateTime),
    Blob(Vec<u8>),
    /// Big-endian bit string.
    Bit(Vec<u8>),
    /// Decimal text, stored and emitted verbatim.
    Number(String),
    Bool(bool),
    #[default]
    Null,
}

/// The type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Object,
    Array,
    String,
    Date,
    DateTime,
    Time,
    Blob,
    Bit,
    Number,
    Boolean,
    Null,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Object => "OBJECT",
            ValueType::Array => "ARRAY",
            ValueType::String => "STRING",
            ValueType::Date => "DATE",
            ValueType::DateTime => "DATETIME",
            ValueType::Time => "TIME",
            ValueType::Blob => "BLOB",
            ValueType::Bit => "BIT",
            ValueType::Number => "NUMBER",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Null => "NULL",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Wraps already-formatted decimal text. The text is emitted into SQL
    /// as-is, so it must come from a trusted source.
    pub fn number(text: impl Into<String>) -> Self {
        Value::Number(text.into())
    }

    pub fn blob(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Blob(bytes.into())
    }

    pub fn bit(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bit(bytes.into())
    }

    /// Builds a TIME value from a signed duration, anchoring it on the
    /// clock's current midnight.
    ///
    /// Returns `None` if the anchored instant falls outside the supported
    /// calendar range.
    pub fn time_from_duration<C: Clock + ?Sized>(delta: TimeDelta, clock: &C) -> Option<Self> {
        let midnight = clock.today().and_time(NaiveTime::MIN);
        midnight.checked_add_signed(delta).map(Value::Time)
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Object(_) => ValueType::Object,
            Value::Array(_) => ValueType::Array,
            Value::String(_) => ValueType::String,
            Value::Date(_) => ValueType::Date,
            Value::DateTime(_) => ValueType::DateTime,
            Value::Time(_) => ValueType::Time,
            Value::Blob(_) => ValueType::Blob,
            Value::Bit(_) => ValueType::Bit,
            Value::Number(_) => ValueType::Number,
            Value::Bool(_) => ValueType::Boolean,
            Value::Null => ValueType::Null,
        }
    }

    /// Appends this value, rendered as a top-level SQL expression, to `dst`.
    ///
    /// TIME values are measured against the system clock; use
    /// [`SqlEncoder::with_clock`] for reproducible output.
    pub fn marshal_sql_to(&self, dst: &mut Vec<u8>) {
        SqlEncoder::new().encode_to(self, dst);
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn value_type_names() {
        assert_eq!(Value::Null.value_type(), ValueType::Null);
        assert_eq!(Value::Bool(true).value_type().as_str(), "BOOLEAN");
        assert_eq!(Value::number("1.5").value_type().to_string(), "NUMBER");
        assert_eq!(Value::blob(vec![1]).value_type(), ValueType::Blob);
        assert_eq!(Value::bit(vec![1]).value_type(), ValueType::Bit);
        assert_eq!(Value::Object(vec![]).value_type().as_str(), "OBJECT");
        assert_eq!(Value::Array(vec![]).value_type().as_str(), "ARRAY");
    }

    #[test]
    fn time_from_duration_anchors_on_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let clock = FixedClock(today);
        let v = Value::time_from_duration(TimeDelta::hours(-2), &clock).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        assert_eq!(v, Value::Time(expected));
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::from(false), Value::Bool(false));
        assert_eq!(Value::from("x"), Value::string("x"));
        assert_eq!(
            Value::from(vec![Value::Null]),
            Value::Array(vec![Value::Null])
        );
        assert_eq!(Value::default(), Value::Null);
    }
}
