//! SQL string literal encoding.

/// Returns the escape letter for bytes that must be backslash-escaped
/// inside a single-quoted MySQL string literal.
#[inline]
fn sql_escape(b: u8) -> Option<u8> {
    match b {
        0x00 => Some(b'0'),
        b'\'' => Some(b'\''),
        b'"' => Some(b'"'),
        0x08 => Some(b'b'),
        b'\n' => Some(b'n'),
        b'\r' => Some(b'r'),
        b'\t' => Some(b't'),
        // ctl-Z
        0x1a => Some(b'Z'),
        b'\\' => Some(b'\\'),
        _ => None,
    }
}

/// Appends `s` to `dst` as a single-quoted, escaped SQL string literal.
///
/// Multi-byte UTF-8 sequences never contain any of the escaped ASCII bytes,
/// so the input can be scanned byte by byte.
pub fn write_string_sql(dst: &mut Vec<u8>, s: &str) {
    let bytes = s.as_bytes();
    dst.reserve(bytes.len() + 2);
    dst.push(b'\'');
    let mut last = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if let Some(esc) = sql_escape(b) {
            dst.extend_from_slice(&bytes[last..i]);
            dst.push(b'\\');
            dst.push(esc);
            last = i + 1;
        }
    }
    dst.extend_from_slice(&bytes[last..]);
    dst.push(b'\'');
}

/// Encodes `s` as a single-quoted, escaped SQL string literal.
///
/// # Examples
///
/// ```
/// use mysql_json::encode_string_sql;
///
/// assert_eq!(encode_string_sql("hello"), b"'hello'");
/// assert_eq!(encode_string_sql("a'b"), b"'a\\'b'");
/// ```
pub fn encode_string_sql(s: &str) -> Vec<u8> {
    let mut dst = Vec::with_capacity(s.len() + 2);
    write_string_sql(&mut dst, s);
    dst
}
