//! Decoder for PHP's `serialize()` format.
//!
//! Older TYPO3 versions stored each extension's settings as a serialized PHP
//! array (`a:1:{s:3:"foo";s:3:"bar";}`). Only data types are supported:
//! objects decode to mappings of their properties and references are
//! rejected.

use serde_json::{Number, Value};

use super::{ArrayBuilder, ArrayKey, CodecError};

/// Decodes a PHP serialized string into a configuration value.
///
/// String lengths in the input are byte lengths, as PHP writes them.
///
/// # Errors
///
/// Returns [`CodecError::Serialized`] if the input is malformed, uses an
/// unsupported type, or has trailing content.
pub fn unserialize(input: &str) -> Result<Value, CodecError> {
    let mut decoder = Decoder { input, pos: 0 };
    let value = decoder.value()?;
    if decoder.pos != input.len() {
        return Err(CodecError::serialized(decoder.pos, "unexpected trailing input"));
    }
    Ok(value)
}

struct Decoder<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn error(&self, reason: impl Into<String>) -> CodecError {
        CodecError::serialized(self.pos, reason)
    }

    fn expect(&mut self, byte: u8) -> Result<(), CodecError> {
        if self.input.as_bytes().get(self.pos) == Some(&byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", char::from(byte))))
        }
    }

    fn take_tag(&mut self) -> Result<u8, CodecError> {
        let tag = *self
            .input
            .as_bytes()
            .get(self.pos)
            .ok_or_else(|| self.error("unexpected end of input"))?;
        self.pos += 1;
        Ok(tag)
    }

    /// Reads up to (not including) `terminator` and consumes the terminator.
    fn take_until(&mut self, terminator: u8) -> Result<&'a str, CodecError> {
        let rest = &self.input.as_bytes()[self.pos..];
        let end = rest
            .iter()
            .position(|b| *b == terminator)
            .ok_or_else(|| self.error(format!("expected '{}'", char::from(terminator))))?;
        let start = self.pos;
        self.pos += end + 1;
        self.input
            .get(start..start + end)
            .ok_or_else(|| CodecError::serialized(start, "invalid UTF-8 boundary"))
    }

    fn take_length(&mut self, terminator: u8) -> Result<usize, CodecError> {
        let start = self.pos;
        self.take_until(terminator)?
            .parse()
            .map_err(|_| CodecError::serialized(start, "invalid length"))
    }

    fn value(&mut self) -> Result<Value, CodecError> {
        let start = self.pos;
        match self.take_tag()? {
            b'N' => {
                self.expect(b';')?;
                Ok(Value::Null)
            }
            b'b' => {
                self.expect(b':')?;
                match self.take_until(b';')? {
                    "0" => Ok(Value::Bool(false)),
                    "1" => Ok(Value::Bool(true)),
                    _ => Err(CodecError::serialized(start, "invalid boolean")),
                }
            }
            b'i' => {
                self.expect(b':')?;
                let raw = self.take_until(b';')?;
                raw.parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| CodecError::serialized(start, format!("invalid integer '{raw}'")))
            }
            b'd' => {
                self.expect(b':')?;
                let raw = self.take_until(b';')?;
                raw.parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| CodecError::serialized(start, format!("unsupported float '{raw}'")))
            }
            b's' => {
                self.expect(b':')?;
                let text = self.string()?;
                self.expect(b';')?;
                Ok(Value::String(text))
            }
            b'a' => {
                self.expect(b':')?;
                let count = self.take_length(b':')?;
                self.entries(count)
            }
            b'O' => {
                self.expect(b':')?;
                self.string()?;
                self.expect(b':')?;
                let count = self.take_length(b':')?;
                self.entries(count)
            }
            b'r' | b'R' => Err(CodecError::serialized(start, "references are not supported")),
            other => Err(CodecError::serialized(
                start,
                format!("unsupported type '{}'", char::from(other)),
            )),
        }
    }

    /// Reads `<len>:"<bytes>"`, leaving the terminator to the caller.
    fn string(&mut self) -> Result<String, CodecError> {
        let length = self.take_length(b':')?;
        self.expect(b'"')?;
        let start = self.pos;
        let text = start
            .checked_add(length)
            .and_then(|end| self.input.get(start..end))
            .ok_or_else(|| CodecError::serialized(start, "string length out of range"))?;
        self.pos += length;
        self.expect(b'"')?;
        Ok(text.to_string())
    }

    fn entries(&mut self, count: usize) -> Result<Value, CodecError> {
        self.expect(b'{')?;
        let mut builder = ArrayBuilder::new();
        for _ in 0..count {
            let key_start = self.pos;
            let key = match self.value()? {
                Value::String(text) => ArrayKey::Str(text),
                Value::Number(number) => number
                    .as_i64()
                    .map(ArrayKey::Int)
                    .ok_or_else(|| CodecError::serialized(key_start, "invalid array key"))?,
                _ => return Err(CodecError::serialized(key_start, "invalid array key")),
            };
            let value = self.value()?;
            builder.push(Some(key), value);
        }
        self.expect(b'}')?;
        Ok(builder.finish())
    }
}
