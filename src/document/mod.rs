//! The daily-document engine.
//!
//! A [`DailyDocument`] is one parsed day file: its raw text, the located
//! section offsets, the decoded frontmatter and the journal entries. Every
//! mutation returns a new document built as
//!
//! ```text
//! text[..journal.start] + render(entries) + text[journal.end..]
//! ```
//!
//! so bytes outside the Journal section (unknown headers, unknown frontmatter
//! keys, sections after the journal) pass through unchanged. Frontmatter
//! updates likewise only replace the text between the `---` delimiters.

pub mod entry;
pub mod frontmatter;
pub mod scanner;

mod tests;

pub use entry::{
    decode_list_item, encode_entry, normalize_content, sort_chronologically, JournalEntry,
    TimePrecision,
};
pub use frontmatter::{FieldValue, Frontmatter};
pub use scanner::{scan, DocumentLayout, FrontmatterBlock, JournalSection, SectionHeader};

use crate::constants::{
    FRONTMATTER_DELIMITER, JOURNAL_HEADER, TEMPLATE_DATE_PLACEHOLDER, TEMPLATE_TIMESTAMP_FORMAT,
};
use crate::errors::DocumentError;
use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use std::ops::Range;
use tracing::debug;

/// One parsed day file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyDocument {
    date: NaiveDate,
    text: String,
    layout: DocumentLayout,
    frontmatter: Frontmatter,
    entries: Vec<JournalEntry>,
    /// Items of the entry list that are not timestamped bullets.
    opaque_items: Vec<Range<usize>>,
    precision: TimePrecision,
}

impl DailyDocument {
    /// Parses a day file's text.
    ///
    /// Parsing never fails: items that are not entries, missing sections and
    /// malformed frontmatter fields are all tolerated.
    pub fn parse(date: NaiveDate, text: impl Into<String>, precision: TimePrecision) -> Self {
        let text = text.into();
        let layout = scan(&text);

        let frontmatter = layout
            .frontmatter
            .as_ref()
            .map(|fm| Frontmatter::decode(&text[fm.inner.clone()]))
            .unwrap_or_default();

        let mut entries = Vec::new();
        let mut opaque_items = Vec::new();
        if let Some(journal) = &layout.journal {
            for item in &journal.items {
                match decode_list_item(&text[item.clone()], date) {
                    Some(entry) => entries.push(entry),
                    None => {
                        debug!(%date, offset = item.start, "keeping non-entry list item as-is");
                        opaque_items.push(item.clone());
                    }
                }
            }
        }

        DailyDocument {
            date,
            text,
            layout,
            frontmatter,
            entries,
            opaque_items,
            precision,
        }
    }

    /// Creates a new day file from a template.
    ///
    /// Every `{{date}}` in `template` is replaced with `created_at` in
    /// `YYYY-MM-DDTHH:MM:SS+HH:MM` form. A template without a Journal section
    /// gets an empty one appended.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Template` if the rendered template opens a
    /// frontmatter block that is never closed.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{FixedOffset, NaiveDate, TimeZone};
    /// use daylog::document::{DailyDocument, TimePrecision};
    ///
    /// let offset = FixedOffset::east_opt(9 * 3600).unwrap();
    /// let created_at = offset.with_ymd_and_hms(2025, 12, 29, 12, 39, 0).unwrap();
    /// let date = NaiveDate::from_ymd_opt(2025, 12, 29).unwrap();
    ///
    /// let doc = DailyDocument::create(
    ///     date,
    ///     "---\ndate: \"{{date}}\"\n---\n\n## Journal\n",
    ///     created_at,
    ///     TimePrecision::Minutes,
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     doc.get_field_value("date").and_then(|v| v.as_scalar()),
    ///     Some("2025-12-29T12:39:00+09:00")
    /// );
    /// assert!(doc.has_journal());
    /// assert!(doc.entries().is_empty());
    /// ```
    pub fn create(
        date: NaiveDate,
        template: &str,
        created_at: DateTime<FixedOffset>,
        precision: TimePrecision,
    ) -> Result<Self, DocumentError> {
        let stamp = created_at.format(TEMPLATE_TIMESTAMP_FORMAT).to_string();
        let mut text = template.replace(TEMPLATE_DATE_PLACEHOLDER, &stamp);

        let opens_frontmatter = text
            .trim_start_matches('\u{feff}')
            .lines()
            .next()
            .map(|line| line.trim_end() == FRONTMATTER_DELIMITER)
            .unwrap_or(false);
        if opens_frontmatter && scanner::locate_frontmatter(&text).is_none() {
            return Err(DocumentError::Template(
                "the frontmatter block opened on the first line is never closed".to_string(),
            ));
        }

        if scan(&text).journal.is_none() {
            text.push_str(section_separator(text.as_bytes()));
            text.push_str(JOURNAL_HEADER);
            text.push('\n');
        }

        Ok(DailyDocument::parse(date, text, precision))
    }

    /// The calendar date this document belongs to.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The full document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The full document as bytes, ready to be persisted.
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Located section offsets.
    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    /// Decoded frontmatter.
    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    /// Journal entries in file order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// True when a Journal section was found.
    pub fn has_journal(&self) -> bool {
        self.layout.journal.is_some()
    }

    /// Byte range owned by the Journal section.
    pub fn journal_range(&self) -> Option<Range<usize>> {
        self.layout.journal.as_ref().map(|j| j.range.clone())
    }

    /// Byte range between the frontmatter and the Journal section.
    pub fn preamble_range(&self) -> Range<usize> {
        self.layout.preamble_range(self.text.len())
    }

    /// Appends an entry after the last existing entry.
    ///
    /// The entry is re-dated to this document and its content normalized
    /// with [`normalize_content`]. Entries are never re-sorted; file order is
    /// the canonical order. When the document has no Journal section, a
    /// `## Journal` header followed by the entry is appended to the end of
    /// the file.
    pub fn add_entry(&self, entry: &JournalEntry) -> DailyDocument {
        let mut entries = self.entries.clone();
        entries.push(JournalEntry::new(
            self.date,
            entry.time,
            normalize_content(&entry.content),
        ));
        self.with_entries(&entries)
    }

    /// Replaces the content of the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::IndexOutOfRange` if `index` is not a position
    /// in the current parse.
    pub fn update_entry(
        &self,
        index: usize,
        content: impl Into<String>,
    ) -> Result<DailyDocument, DocumentError> {
        self.check_index(index)?;
        let mut entries = self.entries.clone();
        entries[index] = entries[index].with_content(normalize_content(&content.into()));
        Ok(self.with_entries(&entries))
    }

    /// Removes the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::IndexOutOfRange` if `index` is not a position
    /// in the current parse.
    pub fn delete_entry(&self, index: usize) -> Result<DailyDocument, DocumentError> {
        self.check_index(index)?;
        let mut entries = self.entries.clone();
        entries.remove(index);
        Ok(self.with_entries(&entries))
    }

    /// Reads a frontmatter field.
    pub fn get_field_value(&self, key: &str) -> Option<&FieldValue> {
        self.frontmatter.get(key)
    }

    /// Sets one frontmatter field, creating the block if the file has none.
    pub fn set_field_value(&self, key: &str, value: impl Into<FieldValue>) -> DailyDocument {
        self.set_field_values([(key.to_string(), value.into())])
    }

    /// Sets several frontmatter fields in one rewrite.
    pub fn set_field_values<I>(&self, updates: I) -> DailyDocument
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        let frontmatter = updates
            .into_iter()
            .fold(self.frontmatter.clone(), |fm, (key, value)| {
                fm.set_field(&key, value)
            });
        if frontmatter == self.frontmatter {
            return self.clone();
        }
        let block = frontmatter.encode();

        let text = match &self.layout.frontmatter {
            Some(fm) => format!(
                "{}{}{}",
                &self.text[..fm.inner.start],
                block,
                &self.text[fm.inner.end..]
            ),
            None => {
                let (bom, rest) = match self.text.strip_prefix('\u{feff}') {
                    Some(rest) => ("\u{feff}", rest),
                    None => ("", self.text.as_str()),
                };
                let gap = if rest.is_empty() || rest.starts_with('\n') {
                    ""
                } else {
                    "\n"
                };
                format!(
                    "{bom}{delim}\n{block}{delim}\n{gap}{rest}",
                    delim = FRONTMATTER_DELIMITER
                )
            }
        };

        DailyDocument::parse(self.date, text, self.precision)
    }

    fn check_index(&self, index: usize) -> Result<(), DocumentError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(DocumentError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    /// Rebuilds the document with `entries` as the journal's entry list.
    fn with_entries(&self, entries: &[JournalEntry]) -> DailyDocument {
        let text = match &self.layout.journal {
            Some(journal) => {
                let has_suffix = journal.range.end < self.text.len();
                format!(
                    "{}{}{}",
                    &self.text[..journal.range.start],
                    self.render_journal(journal, entries, has_suffix),
                    &self.text[journal.range.end..]
                )
            }
            None => {
                let mut text = self.text.clone();
                text.push_str(section_separator(self.text.as_bytes()));
                text.push_str(JOURNAL_HEADER);
                text.push('\n');
                for entry in entries {
                    text.push_str(&self.encode(entry));
                    text.push('\n');
                }
                text
            }
        };
        DailyDocument::parse(self.date, text, self.precision)
    }

    fn render_journal(
        &self,
        journal: &JournalSection,
        entries: &[JournalEntry],
        has_suffix: bool,
    ) -> String {
        let mut out = String::new();
        out.push_str(self.text[journal.header.clone()].trim_end());
        out.push('\n');

        for entry in entries {
            out.push_str(&self.encode(entry));
            out.push('\n');
        }
        for item in &self.opaque_items {
            out.push_str(self.text[item.clone()].trim_end());
            out.push('\n');
        }
        for filler in &journal.filler {
            out.push('\n');
            out.push_str(&self.text[filler.clone()]);
            out.push('\n');
        }

        if has_suffix {
            out.push('\n');
        }
        out
    }

    fn encode(&self, entry: &JournalEntry) -> String {
        encode_widened(entry, self.precision)
    }
}

/// Appends a new Journal section holding `entry` to bytes that could not be
/// decoded as text. The existing bytes are kept as they are.
pub fn append_journal_section(
    bytes: &[u8],
    entry: &JournalEntry,
    precision: TimePrecision,
) -> Vec<u8> {
    let entry = entry.with_content(normalize_content(&entry.content));
    let mut out = bytes.to_vec();
    out.extend_from_slice(section_separator(bytes).as_bytes());
    out.extend_from_slice(JOURNAL_HEADER.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(encode_widened(&entry, precision).as_bytes());
    out.push(b'\n');
    out
}

/// Encodes at `precision`, widening to seconds when the entry's time would
/// otherwise lose them.
fn encode_widened(entry: &JournalEntry, precision: TimePrecision) -> String {
    let precision = if entry.time.second() != 0 {
        TimePrecision::Seconds
    } else {
        precision
    };
    encode_entry(entry, precision)
}

/// Blank-line separator to put before a section appended to `text`.
fn section_separator(text: &[u8]) -> &'static str {
    if text.is_empty() || text.ends_with(b"\n\n") {
        ""
    } else if text.ends_with(b"\n") {
        "\n"
    } else {
        "\n\n"
    }
}
