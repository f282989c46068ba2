//! `Parser` — JSON text to [`Value`].
//!
//! Accepts RFC 8259 JSON and produces only the plain JSON variants
//! (object, array, string, number, boolean, null). Numbers keep their
//! source text; it is checked against the JSON number grammar because it
//! is later emitted into SQL without quoting.
//!
//! String bodies may carry raw control bytes (0x00-0x1F); they are kept
//! as-is whether or not the string also contains escapes. A `\u` escape
//! naming a lone UTF-16 surrogate is rejected, since it has no `String`
//! representation.

use crate::error::{start_end_string, ParseError};
use crate::value::Value;

/// Default limit on array/object nesting.
pub const MAX_DEPTH: usize = 300;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// JSON text parser.
#[derive(Debug, Clone)]
pub struct Parser {
    max_depth: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Parses a complete JSON document. Surrounding whitespace is allowed;
    /// anything else after the value is an error.
    pub fn parse_bytes(&self, input: &[u8]) -> Result<Value, ParseError> {
        let mut reader = Reader {
            data: input,
            x: 0,
            depth: 0,
            max_depth: self.max_depth,
        };
        reader.skip_whitespace();
        if reader.x >= input.len() {
            return Err(ParseError::Empty);
        }
        let value = reader.read_any()?;
        reader.skip_whitespace();
        if reader.x < input.len() {
            return Err(ParseError::UnexpectedTail(start_end_string(
                &input[reader.x..],
            )));
        }
        Ok(value)
    }

    pub fn parse(&self, input: &str) -> Result<Value, ParseError> {
        self.parse_bytes(input.as_bytes())
    }
}

struct Reader<'a> {
    data: &'a [u8],
    x: usize,
    depth: usize,
    max_depth: usize,
}

impl Reader<'_> {
    fn error(&self, reason: impl Into<String>) -> ParseError {
        self.error_at(self.x, reason)
    }

    fn error_at(&self, offset: usize, reason: impl Into<String>) -> ParseError {
        let offset = offset.min(self.data.len());
        ParseError::Syntax {
            reason: reason.into(),
            offset,
            tail: start_end_string(&self.data[offset..]),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.x < self.data.len() {
            match self.data[self.x] {
                b' ' | b'\t' | b'\n' | b'\r' => self.x += 1,
                _ => break,
            }
        }
    }

    fn read_any(&mut self) -> Result<Value, ParseError> {
        let Some(&ch) = self.data.get(self.x) else {
            return Err(self.error("unexpected end of input"));
        };
        match ch {
            b'{' => self.read_obj(),
            b'[' => self.read_arr(),
            b'"' => Ok(Value::String(self.read_str()?)),
            b't' => self.read_literal(b"true", Value::Bool(true)),
            b'f' => self.read_literal(b"false", Value::Bool(false)),
            b'n' => self.read_literal(b"null", Value::Null),
            b'-' | b'0'..=b'9' => self.read_num(),
            _ => Err(self.error("unexpected value")),
        }
    }

    fn read_literal(&mut self, lit: &[u8], value: Value) -> Result<Value, ParseError> {
        if !self.data[self.x..].starts_with(lit) {
            return Err(self.error(format!(
                "unexpected value found; expected {}",
                String::from_utf8_lossy(lit)
            )));
        }
        self.x += lit.len();
        Ok(value)
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::TooDeep(self.max_depth));
        }
        Ok(())
    }

    fn read_num(&mut self) -> Result<Value, ParseError> {
        let data = self.data;
        let len = data.len();
        let start = self.x;
        let mut x = start;

        if data[x] == b'-' {
            x += 1;
        }
        match data.get(x) {
            Some(b'0') => x += 1,
            Some(b'1'..=b'9') => {
                while x < len && data[x].is_ascii_digit() {
                    x += 1;
                }
            }
            _ => return Err(self.error_at(x, "invalid number: missing integer digits")),
        }
        if x < len && data[x] == b'.' {
            x += 1;
            let frac = x;
            while x < len && data[x].is_ascii_digit() {
                x += 1;
            }
            if x == frac {
                return Err(self.error_at(x, "invalid number: missing fraction digits"));
            }
        }
        if x < len && (data[x] == b'e' || data[x] == b'E') {
            x += 1;
            if x < len && (data[x] == b'+' || data[x] == b'-') {
                x += 1;
            }
            let exp = x;
            while x < len && data[x].is_ascii_digit() {
                x += 1;
            }
            if x == exp {
                return Err(self.error_at(x, "invalid number: missing exponent digits"));
            }
        }
        self.x = x;
        // Only ASCII digits and sign/exponent bytes were consumed.
        let text = String::from_utf8_lossy(&data[start..x]).into_owned();
        Ok(Value::Number(text))
    }

    fn read_str(&mut self) -> Result<String, ParseError> {
        let x0 = self.x + 1;
        let x1 = self.find_ending_quote(x0)?;
        let s = decode_json_string(&self.data[x0..x1])
            .map_err(|reason| self.error_at(x0, reason))?;
        self.x = x1 + 1;
        Ok(s)
    }

    fn find_ending_quote(&self, start: usize) -> Result<usize, ParseError> {
        let data = self.data;
        let mut i = start;
        while i < data.len() {
            match data[i] {
                b'\\' => i += 2,
                b'"' => return Ok(i),
                _ => i += 1,
            }
        }
        Err(self.error_at(start, "missing closing '\"'"))
    }

    fn read_arr(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.x += 1;
        let mut arr = Vec::new();
        self.skip_whitespace();
        if self.data.get(self.x) == Some(&b']') {
            self.x += 1;
            self.depth -= 1;
            return Ok(Value::Array(arr));
        }
        loop {
            self.skip_whitespace();
            arr.push(self.read_any()?);
            self.skip_whitespace();
            match self.data.get(self.x) {
                Some(b',') => self.x += 1,
                Some(b']') => {
                    self.x += 1;
                    self.depth -= 1;
                    return Ok(Value::Array(arr));
                }
                Some(_) => return Err(self.error("missing ',' after array value")),
                None => return Err(self.error("unexpected end of array")),
            }
        }
    }

    fn read_obj(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.x += 1;
        let mut obj = Vec::new();
        self.skip_whitespace();
        if self.data.get(self.x) == Some(&b'}') {
            self.x += 1;
            self.depth -= 1;
            return Ok(Value::Object(obj));
        }
        loop {
            self.skip_whitespace();
            if self.data.get(self.x) != Some(&b'"') {
                return Err(self.error("cannot find opening '\"' for object key"));
            }
            let key = self.read_str()?;
            self.skip_whitespace();
            if self.data.get(self.x) != Some(&b':') {
                return Err(self.error("missing ':' after object key"));
            }
            self.x += 1;
            self.skip_whitespace();
            let val = self.read_any()?;
            obj.push((key, val));
            self.skip_whitespace();
            match self.data.get(self.x) {
                Some(b',') => self.x += 1,
                Some(b'}') => {
                    self.x += 1;
                    self.depth -= 1;
                    return Ok(Value::Object(obj));
                }
                Some(_) => return Err(self.error("missing ',' after object value")),
                None => return Err(self.error("unexpected end of object")),
            }
        }
    }
}

/// Decodes a JSON string body (between the quotes), resolving escapes.
fn decode_json_string(bytes: &[u8]) -> Result<String, String> {
    if !bytes.contains(&b'\\') {
        return std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| format!("invalid UTF-8 in string: {e}"));
    }
    let mut quoted = Vec::with_capacity(bytes.len() + 2);
    quoted.push(b'"');
    let mut escaped = false;
    for &b in bytes {
        // serde_json refuses raw control bytes; the fast path keeps them.
        if b < 0x20 && !escaped {
            quoted.extend_from_slice(b"\\u00");
            quoted.push(HEX[(b >> 4) as usize]);
            quoted.push(HEX[(b & 0x0f) as usize]);
        } else {
            quoted.push(b);
        }
        escaped = b == b'\\' && !escaped;
    }
    quoted.push(b'"');
    serde_json::from_slice::<String>(&quoted).map_err(|e| format!("invalid string: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Value, ParseError> {
        Parser::new().parse(s)
    }

    #[test]
    fn scalars() {
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse("true").unwrap(), Value::Bool(true));
        assert_eq!(parse(" false ").unwrap(), Value::Bool(false));
        assert_eq!(parse("\"hi\"").unwrap(), Value::string("hi"));
        assert_eq!(parse("0").unwrap(), Value::number("0"));
        assert_eq!(parse("-12.50e+3").unwrap(), Value::number("-12.50e+3"));
    }

    #[test]
    fn numbers_keep_source_text() {
        let big = "123456789012345678901234567890";
        assert_eq!(parse(big).unwrap(), Value::number(big));
        assert_eq!(parse("1.0").unwrap(), Value::number("1.0"));
        assert_eq!(parse("1E5").unwrap(), Value::number("1E5"));
    }

    #[test]
    fn invalid_numbers() {
        for input in ["-", "01", "1.", "1e", "1e+", ".5", "-a", "1.e3"] {
            assert!(parse(input).is_err(), "{input} should not parse");
        }
    }

    #[test]
    fn strings_are_unescaped() {
        assert_eq!(
            parse(r#""a\"b\\c\n\u00e9\ud83c\udf89""#).unwrap(),
            Value::string("a\"b\\c\né🎉")
        );
        assert_eq!(parse(r#""it's""#).unwrap(), Value::string("it's"));
    }

    #[test]
    fn raw_control_bytes_kept_with_or_without_escapes() {
        let parser = Parser::new();
        assert_eq!(
            parser.parse_bytes(b"\"a\tb\"").unwrap(),
            Value::string("a\tb")
        );
        assert_eq!(
            parser.parse_bytes(b"\"a\tb\\n\"").unwrap(),
            Value::string("a\tb\n")
        );
        assert_eq!(
            parser.parse_bytes(b"\"\x00\x1f\\\"\"").unwrap(),
            Value::string("\u{0}\u{1f}\"")
        );
        assert!(matches!(
            parser.parse_bytes(b"\"a\\\tb\""),
            Err(ParseError::Syntax { .. })
        ));
    }

    #[test]
    fn lone_surrogate_escape_is_rejected() {
        for input in [r#""\ud800""#, r#""x\udc00y""#] {
            assert!(
                matches!(parse(input), Err(ParseError::Syntax { offset: 1, .. })),
                "{input} should not parse"
            );
        }
    }

    #[test]
    fn containers_preserve_order() {
        let v = parse(r#"{"b": [1, "x", null], "a": {}, "b": true}"#).unwrap();
        assert_eq!(
            v,
            Value::Object(vec![
                (
                    "b".to_string(),
                    Value::Array(vec![Value::number("1"), Value::string("x"), Value::Null])
                ),
                ("a".to_string(), Value::Object(vec![])),
                ("b".to_string(), Value::Bool(true)),
            ])
        );
        assert_eq!(parse("[ ]").unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse(" \n\t"), Err(ParseError::Empty));
    }

    #[test]
    fn trailing_garbage() {
        assert_eq!(
            parse("[1] x"),
            Err(ParseError::UnexpectedTail("x".to_string()))
        );
        assert!(matches!(parse("nullx"), Err(ParseError::UnexpectedTail(_))));
    }

    #[test]
    fn syntax_errors_report_offset_and_tail() {
        let err = parse("[1, }").unwrap_err();
        assert_eq!(err.offset(), Some(4));
        assert!(err.to_string().contains("unparsed tail: \"}\""), "{err}");

        assert!(matches!(parse("[1 2]"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse("{\"a\" 1}"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse("{1: 2}"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse("[1,]"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse("\"abc"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse("tru"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse("[1"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse("\"\\x\""), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn depth_limit() {
        let parser = Parser::with_max_depth(3);
        assert!(parser.parse("[[[1]]]").is_ok());
        assert_eq!(parser.parse("[[[[1]]]]"), Err(ParseError::TooDeep(3)));
        assert_eq!(
            parser.parse(r#"{"a":{"b":{"c":{}}}}"#),
            Err(ParseError::TooDeep(3))
        );

        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert_eq!(parse(&deep), Err(ParseError::TooDeep(MAX_DEPTH)));
        let ok = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse(&ok).is_ok());
    }

    #[test]
    fn sibling_containers_do_not_accumulate_depth() {
        let parser = Parser::with_max_depth(2);
        assert!(parser.parse("[[1], [2], [3], {\"a\": []}]").is_ok());
    }
}
