//! SQL marshaling of JSON values.
//!
//! Renders a [`Value`] as a SQL expression that MySQL evaluates back into
//! the same JSON value, keeping the extended scalar types intact: objects
//! and arrays become `JSON_OBJECT(...)` / `JSON_ARRAY(...)` calls, scalars
//! become typed literals. MySQL infers JSON for arguments nested inside those
//! calls, so only a top-level scalar needs an explicit `CAST(... as JSON)`.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use num_bigint::BigUint;

use crate::clock::{Clock, SystemClock};
use crate::decoder::Parser;
use crate::error::ParseError;
use crate::escape::write_string_sql;
use crate::sql_value::{SqlType, SqlValue, NULL_BYTES};
use crate::value::Value;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// MySQL wraps TIME hours past this value instead of rejecting them.
const TIME_HOUR_WRAP: i64 = 32;

/// Writes SQL expressions for [`Value`] trees.
#[derive(Debug, Clone, Default)]
pub struct SqlEncoder<C = SystemClock> {
    clock: C,
}

impl SqlEncoder<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> SqlEncoder<C> {
    /// Creates an encoder that measures TIME values against `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Renders `value` as a top-level SQL expression.
    pub fn encode(&self, value: &Value) -> Vec<u8> {
        let mut dst = Vec::new();
        self.write_any(value, true, &mut dst);
        dst
    }

    /// Appends the top-level SQL expression for `value` to `dst`.
    pub fn encode_to(&self, value: &Value, dst: &mut Vec<u8>) {
        self.write_any(value, true, dst);
    }

    /// Convenience: render to a `String`.
    pub fn encode_to_string(&self, value: &Value) -> String {
        String::from_utf8_lossy(&self.encode(value)).into_owned()
    }

    /// Appends the SQL rendering of `value` to `dst`.
    ///
    /// With `top` set, scalars are wrapped in `CAST(... as JSON)` (strings in
    /// `CAST(JSON_QUOTE(...) as JSON)`). Objects and arrays are never
    /// wrapped.
    pub fn write_any(&self, value: &Value, top: bool, dst: &mut Vec<u8>) {
        let (open, close) = match value {
            Value::Object(_) | Value::Array(_) => ("", ""),
            // A bare string cannot be cast to JSON; quote it first.
            Value::String(_) => ("CAST(JSON_QUOTE(", ") as JSON)"),
            _ => ("CAST(", " as JSON)"),
        };
        if top {
            dst.extend_from_slice(open.as_bytes());
        }
        match value {
            Value::Object(obj) => self.write_obj(obj, dst),
            Value::Array(arr) => self.write_arr(arr, dst),
            Value::String(s) => write_utf8_literal(dst, s),
            Value::Date(d) => {
                dst.extend_from_slice(b"date '");
                dst.extend_from_slice(d.format("%Y-%m-%d").to_string().as_bytes());
                dst.push(b'\'');
            }
            Value::DateTime(dt) => {
                let text = dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string();
                dst.extend_from_slice(b"timestamp '");
                dst.extend_from_slice(text.as_bytes());
                dst.push(b'\'');
            }
            Value::Time(t) => {
                dst.extend_from_slice(b"time '");
                write_time_of_day(dst, *t, &self.clock);
                dst.push(b'\'');
            }
            Value::Blob(bytes) => {
                dst.extend_from_slice(b"x'");
                write_hex(dst, bytes);
                dst.push(b'\'');
            }
            Value::Bit(bytes) => {
                let digits = BigUint::from_bytes_be(bytes).to_str_radix(2);
                dst.extend_from_slice(b"b'");
                dst.extend_from_slice(digits.as_bytes());
                dst.push(b'\'');
            }
            Value::Number(text) => dst.extend_from_slice(text.as_bytes()),
            Value::Bool(true) => dst.extend_from_slice(b"true"),
            Value::Bool(false) => dst.extend_from_slice(b"false"),
            Value::Null => dst.extend_from_slice(b"null"),
        }
        if top {
            dst.extend_from_slice(close.as_bytes());
        }
    }

    fn write_obj(&self, obj: &[(String, Value)], dst: &mut Vec<u8>) {
        dst.extend_from_slice(b"JSON_OBJECT(");
        for (i, (key, val)) in obj.iter().enumerate() {
            if i > 0 {
                dst.extend_from_slice(b", ");
            }
            write_utf8_literal(dst, key);
            dst.extend_from_slice(b", ");
            self.write_any(val, false, dst);
        }
        dst.push(b')');
    }

    fn write_arr(&self, arr: &[Value], dst: &mut Vec<u8>) {
        dst.extend_from_slice(b"JSON_ARRAY(");
        for (i, item) in arr.iter().enumerate() {
            if i > 0 {
                dst.extend_from_slice(b", ");
            }
            self.write_any(item, false, dst);
        }
        dst.push(b')');
    }

    /// Parses `buf` and renders it as a trusted JSON wire value.
    ///
    /// Empty input is treated as SQL NULL.
    pub fn marshal_sql_value(&self, buf: &[u8]) -> Result<SqlValue, ParseError> {
        let buf = if buf.is_empty() { NULL_BYTES } else { buf };
        let value = Parser::new().parse_bytes(buf).map_err(|err| {
            log::debug!("failed to parse JSON column value: {err}");
            err
        })?;
        let sql = self.encode(&value);
        log::trace!(
            "marshaled {} value into {} bytes of SQL",
            value.value_type(),
            sql.len()
        );
        Ok(SqlValue::make_trusted(SqlType::Json, sql))
    }
}

/// Parses the JSON bytes in `buf` and returns them as a SQL expression
/// tagged with the JSON wire type. Empty input is treated as SQL NULL.
///
/// # Examples
///
/// ```
/// use mysql_json::marshal_sql_value;
///
/// let v = marshal_sql_value(br#"{"k": [1, "a"]}"#).unwrap();
/// assert_eq!(v.raw(), b"JSON_OBJECT(_utf8mb4'k', JSON_ARRAY(1, _utf8mb4'a'))");
/// ```
pub fn marshal_sql_value(buf: &[u8]) -> Result<SqlValue, ParseError> {
    SqlEncoder::new().marshal_sql_value(buf)
}

fn write_utf8_literal(dst: &mut Vec<u8>, s: &str) {
    dst.extend_from_slice(b"_utf8mb4");
    write_string_sql(dst, s);
}

fn write_hex(dst: &mut Vec<u8>, bytes: &[u8]) {
    dst.reserve(bytes.len() * 2);
    for &b in bytes {
        dst.push(HEX[(b >> 4) as usize]);
        dst.push(HEX[(b & 0x0f) as usize]);
    }
}

/// Writes `[-]HH:MM:SS.ffffff`, the signed distance of `t` from midnight of
/// the clock's current date. Hours wrap at 32 the way MySQL does.
fn write_time_of_day<C: Clock + ?Sized>(dst: &mut Vec<u8>, t: NaiveDateTime, clock: &C) {
    let midnight = clock.today().and_time(NaiveTime::MIN);
    let mut diff = t.signed_duration_since(midnight);
    if diff < TimeDelta::zero() {
        diff = -diff;
        dst.push(b'-');
    }
    let secs = diff.num_seconds();
    let micros = diff.subsec_nanos() / 1_000;
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    let text = format!(
        "{:02}:{:02}:{:02}.{:06}",
        hours % TIME_HOUR_WRAP,
        minutes,
        seconds,
        micros
    );
    dst.extend_from_slice(text.as_bytes());
}
