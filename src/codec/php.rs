//! PHP array literals.
//!
//! [`encode`] renders a configuration value the way TYPO3's
//! `ArrayUtility::arrayExport` does: short array syntax, four space
//! indentation, one entry per line and a trailing comma after every entry.
//! Strings are always single-quoted, so no value can produce anything other
//! than literal data.
//!
//! [`parse_literal`] and [`parse_return_file`] read that format back, along
//! with the constructs a hand-edited `LocalConfiguration.php` typically
//! contains (`array(...)`, double-quoted strings, comments, integer keys).

use serde_json::{Number, Value};

use super::{ArrayBuilder, ArrayKey, CodecError, float_literal};

const INDENT: &str = "    ";

/// Encodes a value as a PHP literal expression.
///
/// Mapping keys are always quoted and sequences never carry keys, so the
/// output distinguishes the two shapes. Empty mappings and empty sequences
/// both render as `[]`.
#[must_use]
pub fn encode(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, 0, &mut out);
    out
}

fn write_value(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => out.push_str(&number_literal(number)),
        Value::String(text) => write_string(text, out),
        Value::Array(items) if !items.is_empty() => {
            out.push_str("[\n");
            for item in items {
                push_indent(depth + 1, out);
                write_value(item, depth + 1, out);
                out.push_str(",\n");
            }
            push_indent(depth, out);
            out.push(']');
        }
        Value::Object(map) if !map.is_empty() => {
            out.push_str("[\n");
            for (key, item) in map {
                push_indent(depth + 1, out);
                write_string(key, out);
                out.push_str(" => ");
                write_value(item, depth + 1, out);
                out.push_str(",\n");
            }
            push_indent(depth, out);
            out.push(']');
        }
        Value::Array(_) | Value::Object(_) => out.push_str("[]"),
    }
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_string(text: &str, out: &mut String) {
    out.push('\'');
    for ch in text.chars() {
        if ch == '\'' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
}

fn number_literal(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() => float_literal(float),
        _ => number.to_string(),
    }
}

/// Parses a single PHP literal expression.
///
/// # Errors
///
/// Returns [`CodecError::Literal`] if the input is not a supported literal or
/// has trailing content.
pub fn parse_literal(source: &str) -> Result<Value, CodecError> {
    let mut parser = Parser::new(source);
    let value = parser.value()?;
    parser.expect_end()?;
    Ok(value)
}

/// Parses a PHP file whose only job is to `return` a literal.
///
/// The opening tag, comments, and `declare`/`namespace`/`use` statements
/// before the `return` are skipped. Anything after the terminating semicolon
/// is ignored.
///
/// # Errors
///
/// Returns [`CodecError::Literal`] if no supported `return` statement is found
/// or the returned expression is not a supported literal.
pub fn parse_return_file(source: &str) -> Result<Value, CodecError> {
    let mut parser = Parser::new(source);
    parser.open_tag();

    loop {
        parser.skip_trivia()?;
        let statement_start = parser.pos;
        match parser.identifier().map(str::to_ascii_lowercase).as_deref() {
            Some("return") => {
                let value = parser.value()?;
                parser.skip_trivia()?;
                parser.expect(b';')?;
                return Ok(value);
            }
            Some("declare" | "namespace" | "use") => parser.skip_statement()?,
            Some(other) => {
                return Err(CodecError::literal(
                    statement_start,
                    format!("unsupported statement '{other}'"),
                ));
            }
            None => {
                return Err(CodecError::literal(
                    statement_start,
                    "expected a return statement",
                ));
            }
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    fn next_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, text: &str) -> bool {
        if self.rest().starts_with(text) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), CodecError> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(CodecError::literal(
                self.pos,
                format!("expected '{}'", char::from(byte)),
            ))
        }
    }

    fn expect_end(&mut self) -> Result<(), CodecError> {
        self.skip_trivia()?;
        if self.pos < self.source.len() {
            return Err(CodecError::literal(self.pos, "unexpected trailing input"));
        }
        Ok(())
    }

    fn open_tag(&mut self) {
        self.eat_str("\u{feff}");
        let trimmed = self.rest().trim_start();
        self.pos = self.source.len() - trimmed.len();
        if trimmed
            .get(..5)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("<?php"))
        {
            self.pos += 5;
        }
    }

    fn skip_trivia(&mut self) -> Result<(), CodecError> {
        loop {
            let rest = self.rest();
            if let Some(ch) = rest.chars().next().filter(|ch| ch.is_whitespace()) {
                self.pos += ch.len_utf8();
            } else if rest.starts_with("//") || rest.starts_with('#') {
                self.pos += rest.find('\n').map_or(rest.len(), |end| end + 1);
            } else if rest.starts_with("/*") {
                let end = rest[2..]
                    .find("*/")
                    .ok_or_else(|| CodecError::literal(self.pos, "unterminated comment"))?;
                self.pos += end + 4;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_statement(&mut self) -> Result<(), CodecError> {
        let end = self
            .rest()
            .find(';')
            .ok_or_else(|| CodecError::literal(self.pos, "expected ';'"))?;
        self.pos += end + 1;
        Ok(())
    }

    fn identifier(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let bytes = self.source.as_bytes();
        if !bytes.get(start).copied().is_some_and(is_identifier_start) {
            return None;
        }
        let mut end = start + 1;
        while bytes
            .get(end)
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
        {
            end += 1;
        }
        self.pos = end;
        Some(&self.source[start..end])
    }

    fn value(&mut self) -> Result<Value, CodecError> {
        self.skip_trivia()?;
        let start = self.pos;
        match self.peek() {
            Some(b'[') => {
                self.pos += 1;
                self.array(b']')
            }
            Some(b'\'') => self.single_quoted().map(Value::String),
            Some(b'"') => self.double_quoted().map(Value::String),
            Some(b'-' | b'+' | b'.' | b'0'..=b'9') => self.number(),
            Some(b) if is_identifier_start(b) => {
                let word = self.identifier().unwrap_or_default();
                match word.to_ascii_lowercase().as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    "array" => {
                        self.skip_trivia()?;
                        self.expect(b'(')?;
                        self.array(b')')
                    }
                    _ => Err(CodecError::literal(
                        start,
                        format!("unsupported expression '{word}'"),
                    )),
                }
            }
            Some(_) => Err(CodecError::literal(start, "unexpected character")),
            None => Err(CodecError::literal(start, "unexpected end of input")),
        }
    }

    fn array(&mut self, close: u8) -> Result<Value, CodecError> {
        let mut builder = ArrayBuilder::new();
        loop {
            self.skip_trivia()?;
            if self.eat(close) {
                return Ok(builder.finish());
            }

            let first_start = self.pos;
            let first = self.value()?;
            self.skip_trivia()?;
            if self.eat_str("=>") {
                let key = array_key(first, first_start)?;
                let value = self.value()?;
                builder.push(Some(key), value);
            } else {
                builder.push(None, first);
            }

            self.skip_trivia()?;
            if self.eat(b',') {
                continue;
            }
            if self.eat(close) {
                return Ok(builder.finish());
            }
            return Err(CodecError::literal(
                self.pos,
                format!("expected ',' or '{}'", char::from(close)),
            ));
        }
    }

    fn single_quoted(&mut self) -> Result<String, CodecError> {
        let start = self.pos;
        self.pos += 1;
        let mut text = String::new();
        loop {
            match self.next_char() {
                None => return Err(CodecError::literal(start, "unterminated string")),
                Some('\'') => {
                    self.pos += 1;
                    return Ok(text);
                }
                Some('\\') if matches!(self.peek_at(1), Some(b'\'' | b'\\')) => {
                    text.push(char::from(self.source.as_bytes()[self.pos + 1]));
                    self.pos += 2;
                }
                Some(ch) => {
                    text.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
    }

    fn double_quoted(&mut self) -> Result<String, CodecError> {
        let start = self.pos;
        self.pos += 1;
        let mut bytes = Vec::new();
        loop {
            match self.next_char() {
                None => return Err(CodecError::literal(start, "unterminated string")),
                Some('"') => {
                    self.pos += 1;
                    return String::from_utf8(bytes)
                        .map_err(|_| CodecError::literal(start, "string is not valid UTF-8"));
                }
                Some('$')
                    if self
                        .peek_at(1)
                        .is_some_and(|b| is_identifier_start(b) || b == b'{') =>
                {
                    return Err(CodecError::literal(
                        self.pos,
                        "variable interpolation is not supported",
                    ));
                }
                Some('{') if self.peek_at(1) == Some(b'$') => {
                    return Err(CodecError::literal(
                        self.pos,
                        "variable interpolation is not supported",
                    ));
                }
                Some('\\') => {
                    self.pos += 1;
                    self.escape_sequence(start, &mut bytes)?;
                }
                Some(ch) => {
                    let mut buffer = [0; 4];
                    bytes.extend_from_slice(ch.encode_utf8(&mut buffer).as_bytes());
                    self.pos += ch.len_utf8();
                }
            }
        }
    }

    /// Decodes one escape sequence; `self.pos` points just past the backslash.
    fn escape_sequence(&mut self, start: usize, bytes: &mut Vec<u8>) -> Result<(), CodecError> {
        let simple = match self.peek() {
            None => return Err(CodecError::literal(start, "unterminated string")),
            Some(b'n') => Some(b'\n'),
            Some(b't') => Some(b'\t'),
            Some(b'r') => Some(b'\r'),
            Some(b'v') => Some(0x0b),
            Some(b'e') => Some(0x1b),
            Some(b'f') => Some(0x0c),
            Some(b @ (b'\\' | b'$' | b'"')) => Some(b),
            _ => None,
        };
        if let Some(byte) = simple {
            bytes.push(byte);
            self.pos += 1;
            return Ok(());
        }

        match self.peek() {
            Some(b'0'..=b'7') => {
                let digits = self.take_digits(3, 8);
                let code = u32::from_str_radix(digits, 8).unwrap_or_default();
                bytes.push(code.to_le_bytes()[0]);
            }
            Some(b'x') if self.peek_at(1).is_some_and(|b| b.is_ascii_hexdigit()) => {
                self.pos += 1;
                let digits = self.take_digits(2, 16);
                bytes.push(u8::from_str_radix(digits, 16).unwrap_or_default());
            }
            Some(b'u') if self.peek_at(1) == Some(b'{') => {
                let escape_start = self.pos - 1;
                self.pos += 2;
                let end = self
                    .rest()
                    .find('}')
                    .ok_or_else(|| CodecError::literal(escape_start, "unterminated \\u{} escape"))?;
                let ch = u32::from_str_radix(&self.rest()[..end], 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| CodecError::literal(escape_start, "invalid \\u{} escape"))?;
                let mut buffer = [0; 4];
                bytes.extend_from_slice(ch.encode_utf8(&mut buffer).as_bytes());
                self.pos += end + 1;
            }
            _ => bytes.push(b'\\'),
        }
        Ok(())
    }

    fn take_digits(&mut self, max: usize, radix: u32) -> &'a str {
        let start = self.pos;
        let rest = self.source.as_bytes();
        while self.pos - start < max
            && rest
                .get(self.pos)
                .is_some_and(|b| char::from(*b).is_digit(radix))
        {
            self.pos += 1;
        }
        &self.source[start..self.pos]
    }

    fn number(&mut self) -> Result<Value, CodecError> {
        let start = self.pos;
        let negative = if self.eat(b'-') {
            true
        } else {
            self.eat(b'+');
            false
        };
        self.skip_trivia()?;

        let body_start = self.pos;
        let bytes = self.source.as_bytes();
        let is_hex = self
            .rest()
            .get(..2)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("0x"));
        while let Some(b) = self.peek() {
            let after_exponent = !is_hex
                && self.pos > body_start
                && matches!(bytes[self.pos - 1], b'e' | b'E');
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                self.pos += 1;
            } else if matches!(b, b'+' | b'-') && after_exponent {
                self.pos += 1;
            } else {
                break;
            }
        }

        let raw = self.source[body_start..self.pos].replace('_', "");
        number_value(&raw, negative)
            .ok_or_else(|| CodecError::literal(start, format!("invalid number '{raw}'")))
    }
}

const fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

#[allow(clippy::cast_possible_truncation)] // PHP truncates float keys
fn array_key(key: Value, offset: usize) -> Result<ArrayKey, CodecError> {
    match key {
        Value::String(text) => Ok(ArrayKey::Str(text)),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))
            .map(ArrayKey::Int)
            .ok_or_else(|| CodecError::literal(offset, "invalid array key")),
        Value::Bool(flag) => Ok(ArrayKey::Int(i64::from(flag))),
        Value::Null => Ok(ArrayKey::Str(String::new())),
        Value::Array(_) | Value::Object(_) => {
            Err(CodecError::literal(offset, "arrays cannot be used as keys"))
        }
    }
}

fn number_value(raw: &str, negative: bool) -> Option<Value> {
    let lower = raw.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(binary) = lower.strip_prefix("0b") {
        (binary, 2)
    } else if let Some(octal) = lower.strip_prefix("0o") {
        (octal, 8)
    } else if lower.len() > 1 && lower.starts_with('0') && lower.bytes().all(|b| b.is_ascii_digit()) {
        (&lower[1..], 8)
    } else if !lower.is_empty() && lower.bytes().all(|b| b.is_ascii_digit()) {
        (lower.as_str(), 10)
    } else {
        let float: f64 = lower.parse().ok()?;
        let float = if negative { -float } else { float };
        return Number::from_f64(float).map(Value::Number);
    };

    if digits.is_empty() {
        return None;
    }
    match u64::from_str_radix(digits, radix) {
        Ok(magnitude) if negative => 0_i64
            .checked_sub_unsigned(magnitude)
            .map(Value::from)
            .or_else(|| negative_float(digits, radix)),
        Ok(magnitude) => Some(Value::from(magnitude)),
        Err(_) => {
            if negative {
                negative_float(digits, radix)
            } else {
                overflow_float(digits, radix).and_then(Number::from_f64).map(Value::Number)
            }
        }
    }
}

/// Integers that do not fit into 64 bits become floats, as in PHP.
fn overflow_float(digits: &str, radix: u32) -> Option<f64> {
    if radix == 10 {
        return digits.parse().ok();
    }
    digits.chars().try_fold(0.0_f64, |acc, ch| {
        ch.to_digit(radix).map(|digit| acc.mul_add(f64::from(radix), f64::from(digit)))
    })
}

fn negative_float(digits: &str, radix: u32) -> Option<Value> {
    overflow_float(digits, radix)
        .and_then(|float| Number::from_f64(-float))
        .map(Value::Number)
}
