//! Frontmatter decoding and encoding.
//!
//! The metadata block is split into top-level fields, each keeping the exact
//! source lines it was read from. Values are decoded through `serde_yaml` one
//! field at a time, so a single malformed field never hides the others.
//! Encoding writes untouched fields back byte for byte and renders only the
//! fields that were set through [`Frontmatter::set_field`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;
use std::fmt;

/// A top-level `key:` line. Group 1 is the key as written; groups 2 to 4
/// hold a double-quoted, single-quoted or plain key.
static FIELD_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^("((?:[^"\\]|\\.)*)"|'((?:[^']|'')*)'|([^\s#'"\-\[{][^:]*?))[ \t]*:(?:[ \t]|$)"#,
    )
    .unwrap_or_else(|e| panic!("invalid frontmatter key pattern: {e}"))
});

/// Keys that can be written without quotes.
static PLAIN_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[^\s#'"\-\[\]{}?:,&*!|>%@`](?:[^:#]*[^\s:#])?$"#)
        .unwrap_or_else(|e| panic!("invalid plain key pattern: {e}"))
});

/// The value of one frontmatter field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// `key: null`, `key: ~` or `key:` with nothing after it.
    Null,
    /// Any single value; numbers and booleans keep their textual form.
    Scalar(String),
    /// A bracketed (`[a, b]`) or block (`- a`) sequence.
    List(Vec<String>),
}

impl FieldValue {
    /// The scalar text, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The items, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Items of a list; a scalar counts as a one-item list, null as empty.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            FieldValue::Null => Vec::new(),
            FieldValue::Scalar(s) if s.is_empty() => Vec::new(),
            FieldValue::Scalar(s) => vec![s.clone()],
            FieldValue::List(items) => items.clone(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Scalar(s) => write!(f, "{}", s),
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Field(Field),
    /// Comments, blank lines and anything that is not a `key:` line.
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    key: String,
    /// The key as written in the source, quotes included.
    label: String,
    value: FieldValue,
    /// Source lines; `None` once the value was replaced.
    raw: Option<String>,
}

/// Ordered key/value view over a frontmatter block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frontmatter {
    items: Vec<Item>,
}

impl Frontmatter {
    /// Decodes the text between the `---` delimiters.
    ///
    /// # Examples
    ///
    /// ```
    /// use daylog::document::{FieldValue, Frontmatter};
    ///
    /// let fm = Frontmatter::decode("wake_time: \"07:15\"\nmorning:\n  - toast\nsleep_time:\n");
    /// assert_eq!(fm.get("wake_time"), Some(&FieldValue::Scalar("07:15".to_string())));
    /// assert_eq!(fm.get("morning").and_then(|v| v.as_list()).map(|l| l.len()), Some(1));
    /// assert_eq!(fm.get("sleep_time"), Some(&FieldValue::Null));
    /// ```
    pub fn decode(block: &str) -> Self {
        let mut items = Vec::new();
        let mut current: Option<(FieldKey, String)> = None;

        for line in block.split_inclusive('\n') {
            let bare = line.trim_end_matches(['\n', '\r']);

            if current.is_some() && is_continuation(bare) {
                if let Some((_, raw)) = current.as_mut() {
                    raw.push_str(line);
                }
                continue;
            }

            if let Some((key, raw)) = current.take() {
                items.push(Item::Field(finish_field(key, raw)));
            }

            match parse_key(bare) {
                Some(key) => current = Some((key, line.to_string())),
                None => items.push(Item::Verbatim(line.to_string())),
            }
        }

        if let Some((key, raw)) = current.take() {
            items.push(Item::Field(finish_field(key, raw)));
        }

        Frontmatter { items }
    }

    /// Re-serializes the block, keeping field order and untouched source lines.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            match item {
                Item::Verbatim(text) => out.push_str(text),
                Item::Field(Field {
                    raw: Some(raw), ..
                }) => out.push_str(raw),
                Item::Field(Field { label, value, .. }) => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str(&render_field(label, value));
                }
            }
        }
        out
    }

    /// Returns a copy with `key` set to `value`.
    ///
    /// An existing key keeps its position; a new key is appended at the end.
    pub fn set_field(&self, key: &str, value: FieldValue) -> Frontmatter {
        let mut updated = self.clone();
        let position = updated
            .items
            .iter()
            .position(|item| matches!(item, Item::Field(field) if field.key == key));

        match position {
            Some(index) => {
                if let Item::Field(field) = &mut updated.items[index] {
                    if field.value != value {
                        field.value = value;
                        field.raw = None;
                    }
                }
            }
            None => updated.items.push(Item::Field(Field {
                key: key.to_string(),
                label: render_key(key),
                value,
                raw: None,
            })),
        }
        updated
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Fields in document order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.items.iter().filter_map(|item| match item {
            Item::Field(field) => Some((field.key.as_str(), &field.value)),
            Item::Verbatim(_) => None,
        })
    }

    /// Field keys in document order.
    pub fn keys(&self) -> Vec<&str> {
        self.fields().map(|(k, _)| k).collect()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields().count()
    }

    /// True when the block holds no fields.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_continuation(bare: &str) -> bool {
    !bare.trim().is_empty()
        && (bare.starts_with(' ') || bare.starts_with('\t') || bare.starts_with('-'))
}

struct FieldKey {
    key: String,
    label: String,
}

/// Reads the key of a top-level `key:` line, unquoting quoted keys.
fn parse_key(line: &str) -> Option<FieldKey> {
    let captures = FIELD_KEY.captures(line)?;
    let label = captures.get(1)?.as_str();
    let key = if let Some(inner) = captures.get(2) {
        serde_yaml::from_str::<String>(label).unwrap_or_else(|_| inner.as_str().to_string())
    } else if let Some(inner) = captures.get(3) {
        inner.as_str().replace("''", "'")
    } else {
        captures.get(4)?.as_str().to_string()
    };
    Some(FieldKey {
        key,
        label: label.to_string(),
    })
}

fn render_key(key: &str) -> String {
    if PLAIN_KEY.is_match(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn finish_field(key: FieldKey, raw: String) -> Field {
    let value = decode_value(&key.key, &raw);
    Field {
        key: key.key,
        label: key.label,
        value,
        raw: Some(raw),
    }
}

fn decode_value(key: &str, raw: &str) -> FieldValue {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Mapping(mapping)) => mapping
            .into_iter()
            .next()
            .map(|(_, value)| from_yaml(&value))
            .unwrap_or(FieldValue::Null),
        Ok(_) | Err(_) => {
            tracing::debug!(key, "frontmatter field is not valid YAML, using raw text");
            decode_value_lenient(raw)
        }
    }
}

/// Fallback for fields YAML rejects (e.g. `note: a: b`).
fn decode_value_lenient(raw: &str) -> FieldValue {
    let mut lines = raw.lines();
    let inline = lines
        .next()
        .and_then(|first| first.split_once(':'))
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default();

    if !inline.is_empty() {
        return FieldValue::Scalar(unquote(inline).to_string());
    }

    let items: Vec<String> = lines
        .filter_map(|line| line.trim().strip_prefix('-'))
        .map(|item| unquote(item.trim()).to_string())
        .collect();
    if items.is_empty() {
        FieldValue::Null
    } else {
        FieldValue::List(items)
    }
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

fn from_yaml(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Sequence(items) => FieldValue::List(items.iter().filter_map(yaml_text).collect()),
        other => yaml_text(other)
            .map(FieldValue::Scalar)
            .unwrap_or(FieldValue::Null),
    }
}

fn yaml_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        other => serde_yaml::to_string(other)
            .ok()
            .map(|s| s.trim_end().to_string()),
    }
}

fn render_field(key: &str, value: &FieldValue) -> String {
    match value {
        FieldValue::Null => format!("{}: null\n", key),
        FieldValue::Scalar(s) => format!("{}: {}\n", key, quote(s)),
        FieldValue::List(items) if items.is_empty() => format!("{}: []\n", key),
        FieldValue::List(items) => {
            let mut out = format!("{}:\n", key);
            for item in items {
                out.push_str("  - ");
                out.push_str(&quote(item));
                out.push('\n');
            }
            out
        }
    }
}

/// Double-quoted scalar; JSON string syntax is valid YAML.
fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text.replace('"', "\\\"")))
}
