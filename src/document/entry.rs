//! Journal entry model and its markdown list-item encoding.
//!
//! An entry is one bullet in the Journal section:
//!
//! ```text
//! - 09:00 Woke up
//!     still sleepy
//! ```
//!
//! The first line carries a bullet (`-`, `*` or `+` on read, always `-` on
//! write), a `HH:MM` or `HH:MM:SS` time token and the first content line.
//! Every further content line sits on its own line behind a fixed
//! continuation indent.

use crate::constants::{
    ENTRY_BULLET, ENTRY_CONTINUATION_INDENT, TIME_FORMAT_MINUTES, TIME_FORMAT_SECONDS,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

static ITEM_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-*+][ \t]+(\d{2}:\d{2}(?::\d{2})?)[ \t]*(.*?)[ \t]*$")
        .unwrap_or_else(|e| panic!("invalid entry head pattern: {e}"))
});

static INLINE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)#([\p{L}\p{N}_/-]+)")
        .unwrap_or_else(|e| panic!("invalid inline tag pattern: {e}"))
});

/// Resolution of the time token written for new or re-rendered entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePrecision {
    /// `HH:MM`
    #[default]
    Minutes,
    /// `HH:MM:SS`
    Seconds,
}

impl TimePrecision {
    /// The `chrono` format string for this precision.
    pub fn format_str(self) -> &'static str {
        match self {
            TimePrecision::Minutes => TIME_FORMAT_MINUTES,
            TimePrecision::Seconds => TIME_FORMAT_SECONDS,
        }
    }

    /// Drops the components this precision does not render.
    ///
    /// ```
    /// use chrono::NaiveTime;
    /// use daylog::document::TimePrecision;
    ///
    /// let t = NaiveTime::from_hms_milli_opt(9, 5, 42, 120).unwrap();
    /// assert_eq!(TimePrecision::Minutes.truncate(t), NaiveTime::from_hms_opt(9, 5, 0).unwrap());
    /// assert_eq!(TimePrecision::Seconds.truncate(t), NaiveTime::from_hms_opt(9, 5, 42).unwrap());
    /// ```
    pub fn truncate(self, time: NaiveTime) -> NaiveTime {
        let seconds = match self {
            TimePrecision::Minutes => 0,
            TimePrecision::Seconds => time.second(),
        };
        NaiveTime::from_hms_opt(time.hour(), time.minute(), seconds).unwrap_or(time)
    }
}

impl FromStr for TimePrecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minutes" | "minute" | "hh:mm" => Ok(TimePrecision::Minutes),
            "seconds" | "second" | "hh:mm:ss" => Ok(TimePrecision::Seconds),
            other => Err(format!(
                "unknown time precision '{}', expected 'minutes' or 'seconds'",
                other
            )),
        }
    }
}

/// A single timestamped note from a day file.
///
/// Entries are plain values: every parse produces fresh copies, and nothing
/// ties an entry back to the document it came from except its `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    /// Calendar date, taken from the day file name.
    pub date: NaiveDate,
    /// Time of day from the bullet's time token.
    pub time: NaiveTime,
    /// Entry text; may span several lines.
    pub content: String,
    /// Inline `#tags` found in `content`.
    pub tags: Vec<String>,
}

impl JournalEntry {
    /// Creates an entry, deriving `tags` from the content.
    pub fn new(date: NaiveDate, time: NaiveTime, content: impl Into<String>) -> Self {
        let content = content.into();
        let tags = extract_tags(&content);
        JournalEntry {
            date,
            time,
            content,
            tags,
        }
    }

    /// Date and time combined; used only for ordering.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Copy of this entry with replaced content (tags re-derived).
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        JournalEntry::new(self.date, self.time, content)
    }
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.time.format(TIME_FORMAT_MINUTES),
            self.content
        )
    }
}

/// Sorts entries chronologically, keeping file order for equal timestamps.
pub fn sort_chronologically(entries: &mut [JournalEntry]) {
    entries.sort_by_key(JournalEntry::timestamp);
}

/// Decodes one markdown list item into an entry.
///
/// `text` is the item's source, starting at its bullet. Returns `None` when
/// the first line is not a timestamped bullet; such items are not entries.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use daylog::document::decode_list_item;
///
/// let date = NaiveDate::from_ymd_opt(2025, 12, 29).unwrap();
/// let entry = decode_list_item("* 09:00 Woke up\n    late again", date).unwrap();
/// assert_eq!(entry.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
/// assert_eq!(entry.content, "Woke up\nlate again");
///
/// assert!(decode_list_item("- buy milk", date).is_none());
/// ```
pub fn decode_list_item(text: &str, date: NaiveDate) -> Option<JournalEntry> {
    let mut lines = text.lines();
    let head = lines.next()?.trim();
    let captures = ITEM_HEAD.captures(head)?;

    let time = parse_time_token(captures.get(1)?.as_str())?;
    let mut content = captures
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    for line in lines {
        content.push('\n');
        content.push_str(strip_continuation_indent(line).trim_end());
    }

    // Loose lists carry the separating blank line inside the item.
    let content_len = content.trim_end().len();
    content.truncate(content_len);

    Some(JournalEntry::new(date, time, content))
}

/// Encodes an entry as a list item, without a trailing newline.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use daylog::document::{encode_entry, JournalEntry, TimePrecision};
///
/// let entry = JournalEntry::new(
///     NaiveDate::from_ymd_opt(2025, 12, 29).unwrap(),
///     NaiveTime::from_hms_opt(23, 10, 0).unwrap(),
///     "Went to bed\nfinally",
/// );
/// assert_eq!(
///     encode_entry(&entry, TimePrecision::Minutes),
///     "- 23:10 Went to bed\n    finally"
/// );
/// ```
pub fn encode_entry(entry: &JournalEntry, precision: TimePrecision) -> String {
    let mut out = format!(
        "{} {}",
        ENTRY_BULLET,
        entry.time.format(precision.format_str())
    );

    let mut lines = entry.content.split('\n');
    if let Some(first) = lines.next() {
        if !first.is_empty() {
            out.push(' ');
            out.push_str(first);
        }
    }
    for line in lines {
        out.push('\n');
        out.push_str(ENTRY_CONTINUATION_INDENT);
        out.push_str(line);
    }
    out
}

/// Brings free text into the shape [`decode_list_item`] reads back.
///
/// The first line loses surrounding whitespace, every line loses trailing
/// whitespace and trailing blank lines are dropped.
///
/// ```
/// use daylog::document::entry::normalize_content;
///
/// assert_eq!(normalize_content("  Woke up \r\n  late\n\n"), "Woke up\n  late");
/// ```
pub fn normalize_content(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for (i, line) in content.lines().enumerate() {
        if i == 0 {
            out.push_str(line.trim());
        } else {
            out.push('\n');
            out.push_str(line.trim_end());
        }
    }
    let len = out.trim_end().len();
    out.truncate(len);
    out
}

fn parse_time_token(token: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(token, TIME_FORMAT_SECONDS)
        .or_else(|_| NaiveTime::parse_from_str(token, TIME_FORMAT_MINUTES))
        .ok()
}

fn strip_continuation_indent(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix('\t') {
        return rest;
    }
    let spaces = line
        .bytes()
        .take(ENTRY_CONTINUATION_INDENT.len())
        .take_while(|b| *b == b' ')
        .count();
    &line[spaces..]
}

fn extract_tags(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for captures in INLINE_TAG.captures_iter(content) {
        if let Some(tag) = captures.get(1) {
            let tag = tag.as_str().to_string();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}
