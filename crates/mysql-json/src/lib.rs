//! Type-preserving SQL marshaling for MySQL JSON values.
//!
//! A JSON column value echoed back into a statement as a plain string
//! literal loses its JSON-ness, and MySQL's extended scalar types (DATE,
//! DATETIME, TIME, BLOB, BIT) degrade into strings. This crate renders a
//! [`Value`] tree as an expression built from `JSON_OBJECT`, `JSON_ARRAY`
//! and typed literals that MySQL evaluates back into the identical JSON
//! value.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use mysql_json::{FixedClock, SqlEncoder, Value};
//!
//! let encoder = SqlEncoder::with_clock(FixedClock(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
//! let value = Value::Object(vec![
//!     ("d".to_string(), Value::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())),
//!     ("s".to_string(), Value::string("2020-01-01")),
//! ]);
//! assert_eq!(
//!     encoder.encode_to_string(&value),
//!     "JSON_OBJECT(_utf8mb4'd', date '2020-01-01', _utf8mb4's', _utf8mb4'2020-01-01')"
//! );
//! ```

mod clock;
mod decoder;
mod error;
mod escape;
mod marshal;
mod sql_value;
mod value;

pub use clock::{Clock, FixedClock, SystemClock};
pub use decoder::{Parser, MAX_DEPTH};
pub use error::ParseError;
pub use escape::{encode_string_sql, write_string_sql};
pub use marshal::{marshal_sql_value, SqlEncoder};
pub use sql_value::{SqlType, SqlValue, NULL_BYTES};
pub use value::{Value, ValueType};
