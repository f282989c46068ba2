//! Wire-typed SQL values handed to the query-building layer.

use std::fmt;

/// Bytes of the SQL NULL literal, as accepted by the JSON parser.
pub const NULL_BYTES: &[u8] = b"null";

/// Wire type tag of a [`SqlValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Json,
}

impl SqlType {
    pub fn as_str(self) -> &'static str {
        match self {
            SqlType::Json => "JSON",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw bytes tagged with a wire type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlValue {
    typ: SqlType,
    val: Vec<u8>,
}

impl SqlValue {
    /// Tags `val` as already-valid content of type `typ`. No validation is
    /// performed; the caller vouches for the bytes.
    pub fn make_trusted(typ: SqlType, val: Vec<u8>) -> Self {
        Self { typ, val }
    }

    pub fn typ(&self) -> SqlType {
        self.typ
    }

    pub fn raw(&self) -> &[u8] {
        &self.val
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.val
    }

    pub fn len(&self) -> usize {
        self.val.len()
    }

    pub fn is_empty(&self) -> bool {
        self.val.is_empty()
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.val))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_json_keeps_bytes() {
        let v = SqlValue::make_trusted(SqlType::Json, b"JSON_ARRAY()".to_vec());
        assert_eq!(v.typ(), SqlType::Json);
        assert_eq!(v.raw(), b"JSON_ARRAY()");
        assert_eq!(v.len(), 12);
        assert_eq!(v.to_string(), "JSON_ARRAY()");
        assert_eq!(v.into_bytes(), b"JSON_ARRAY()".to_vec());
    }

    #[test]
    fn null_json_is_not_empty() {
        let v = SqlValue::make_trusted(SqlType::Json, b"CAST(null as JSON)".to_vec());
        assert!(!v.is_empty());
        assert_eq!(v.to_string(), "CAST(null as JSON)");
    }

    #[test]
    fn type_names() {
        assert_eq!(SqlType::Json.to_string(), "JSON");
        assert_eq!(SqlType::Json.as_str(), "JSON");
    }
}
