//! YAML parsing and dumping.
//!
//! Parsing goes through `serde_yaml`. Dumping follows Symfony's `Yaml::dump`
//! layout so files written here look like the ones the PHP side writes:
//! block style with four space indentation down to a configurable inline
//! level, flow style (`{ a: 1 }`, `[a, b]`) below it.

use serde_json::{Map, Number, Value};

use super::{CodecError, float_literal};

const INDENT: usize = 4;

/// Parses a YAML document into a configuration value.
///
/// An empty or comment-only document yields [`Value::Null`]. Tags are dropped, non-string
/// mapping keys are converted to their textual form, and non-finite floats
/// (`.inf`, `.nan`) become `null`.
///
/// # Errors
///
/// Returns [`CodecError::Yaml`] if the document is not valid YAML.
pub fn parse(content: &str) -> Result<Value, CodecError> {
    if is_blank_document(content) {
        return Ok(Value::Null);
    }
    let document: serde_yaml::Value = serde_yaml::from_str(content)?;
    Ok(yaml_to_json(document))
}

fn is_blank_document(content: &str) -> bool {
    content.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(flag) => Value::Bool(flag),
        serde_yaml::Value::Number(number) => number_to_json(&number),
        serde_yaml::Value::String(text) => Value::String(text),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let map: Map<String, Value> = mapping
                .into_iter()
                .map(|(key, value)| (key_to_string(key), yaml_to_json(value)))
                .collect();
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn number_to_json(number: &serde_yaml::Number) -> Value {
    if let Some(int) = number.as_i64() {
        Value::from(int)
    } else if let Some(uint) = number.as_u64() {
        Value::from(uint)
    } else {
        number
            .as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(text) => text,
        serde_yaml::Value::Number(number) => number.to_string(),
        serde_yaml::Value::Bool(flag) => flag.to_string(),
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value),
        other => flow(&yaml_to_json(other)),
    }
}

/// Dumps a value as a YAML document.
///
/// Collections nested `inline` levels deep or more are written in flow
/// style; `inline = 0` writes the whole document on one line. The output
/// always ends with a newline.
#[must_use]
pub fn dump(value: &Value, inline: usize) -> String {
    let mut out = String::new();
    write_block(value, inline, 0, &mut out);
    out
}

fn write_block(value: &Value, inline: usize, indent: usize, out: &mut String) {
    match value {
        Value::Object(map) if inline > 0 && !map.is_empty() => {
            for (key, child) in map {
                let lead = format!("{}:", scalar_string(key));
                write_entry(&lead, child, inline, indent, out);
            }
        }
        Value::Array(items) if inline > 0 && !items.is_empty() => {
            for child in items {
                write_entry("-", child, inline, indent, out);
            }
        }
        other => {
            push_indent(indent, out);
            out.push_str(&flow(other));
            out.push('\n');
        }
    }
}

fn write_entry(lead: &str, child: &Value, inline: usize, indent: usize, out: &mut String) {
    push_indent(indent, out);
    out.push_str(lead);
    if inline <= 1 || !is_nested_block(child) {
        out.push(' ');
        out.push_str(&flow(child));
        out.push('\n');
    } else {
        out.push('\n');
        write_block(child, inline - 1, indent + INDENT, out);
    }
}

fn is_nested_block(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn push_indent(indent: usize, out: &mut String) {
    out.extend(std::iter::repeat_n(' ', indent));
}

fn flow(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => float_literal(float),
            _ => number.to_string(),
        },
        Value::String(text) => scalar_string(text),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(flow).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(key, child)| format!("{}: {}", scalar_string(key), flow(child)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
    }
}

/// Writes a string scalar, plain when that reads back unchanged, quoted
/// otherwise.
///
/// Single quotes can only carry printable characters that are not line
/// breaks; anything else goes into a double-quoted scalar with escapes.
fn scalar_string(text: &str) -> String {
    if is_plain_safe(text) {
        text.to_string()
    } else if text.chars().all(is_single_quote_safe) {
        format!("'{}'", text.replace('\'', "''"))
    } else {
        double_quoted(text)
    }
}

/// Printable characters that read back verbatim inside single quotes.
///
/// Excludes tab and the line breaks (`\n`, `\r`, NEL, U+2028, U+2029), the
/// byte order mark, and everything outside YAML's printable set.
const fn is_single_quote_safe(ch: char) -> bool {
    matches!(
        ch,
        ' '..='~' | '\u{a0}'..='\u{2027}' | '\u{202a}'..='\u{d7ff}' | '\u{e000}'..='\u{fefe}'
            | '\u{ff00}'..='\u{fffd}' | '\u{10000}'..
    )
}

fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ch if is_single_quote_safe(ch) => out.push(ch),
            ch if u32::from(ch) <= 0xff => out.push_str(&format!("\\x{:02x}", u32::from(ch))),
            ch if u32::from(ch) <= 0xffff => out.push_str(&format!("\\u{:04x}", u32::from(ch))),
            ch => out.push_str(&format!("\\U{:08x}", u32::from(ch))),
        }
    }
    out.push('"');
    out
}

fn is_plain_safe(text: &str) -> bool {
    const RESERVED: &[&str] = &[
        "null", "true", "false", "yes", "no", "on", "off", "y", "n", "~",
    ];

    let Some(first) = text.chars().next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '/')
        && !text.ends_with(' ')
        && text
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '/' | ' '))
        && !RESERVED
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(text))
}
