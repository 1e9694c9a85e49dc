//! Structural scanning of a day file.
//!
//! [`scan`] reports byte offsets only; it never copies or rewrites text. The
//! rest of the engine works purely from the returned [`DocumentLayout`], so
//! the parsing technique stays private to this module.
//!
//! The frontmatter block is located line by line (it must open on the first
//! line). Everything after it is walked as a CommonMark event stream with
//! source offsets; only top-level blocks are considered, so headers or lists
//! nested inside list items never move a section boundary.

use crate::constants::{FRONTMATTER_DELIMITER, FRONTMATTER_END_ALT, JOURNAL_TITLE_SUFFIX};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::ops::Range;

/// Location of the `---` delimited metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterBlock {
    /// Whole block including both delimiter lines.
    pub range: Range<usize>,
    /// Text between the delimiter lines.
    pub inner: Range<usize>,
}

/// A top-level level-2 header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    /// Rendered title text, trimmed.
    pub title: String,
    /// Source of the header itself.
    pub range: Range<usize>,
}

/// The byte range owned by the Journal section and what lies inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalSection {
    /// From the Journal header to the next level-2 header or end of file.
    pub range: Range<usize>,
    /// Source of the Journal header.
    pub header: Range<usize>,
    /// Top-level items of the entry list, in file order.
    pub items: Vec<Range<usize>>,
    /// Other content of the section, blank lines trimmed, in file order.
    pub filler: Vec<Range<usize>>,
}

/// Section boundaries of one document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentLayout {
    /// Metadata block, if the document opens with one.
    pub frontmatter: Option<FrontmatterBlock>,
    /// Every top-level level-2 header.
    pub headers: Vec<SectionHeader>,
    /// The Journal section; `None` when no header title ends with "Journal".
    pub journal: Option<JournalSection>,
}

impl DocumentLayout {
    /// Offset where the markdown body starts.
    pub fn body_start(&self) -> usize {
        self.frontmatter.as_ref().map(|fm| fm.range.end).unwrap_or(0)
    }

    /// Range between the frontmatter and the Journal section (or end of text).
    pub fn preamble_range(&self, text_len: usize) -> Range<usize> {
        let end = self
            .journal
            .as_ref()
            .map(|j| j.range.start)
            .unwrap_or(text_len);
        self.body_start()..end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Level2Header,
    BulletList,
    Other,
}

#[derive(Debug)]
struct Block {
    kind: BlockKind,
    range: Range<usize>,
    title: String,
    items: Vec<Range<usize>>,
}

impl Block {
    fn new(kind: BlockKind, range: Range<usize>) -> Self {
        Block {
            kind,
            range,
            title: String::new(),
            items: Vec::new(),
        }
    }
}

/// Scans `text` and returns its section layout.
///
/// # Examples
///
/// ```
/// use daylog::document::scan;
///
/// let text = "---\ndate: x\n---\n\n## Memo\n\n## Journal\n- 09:00 Woke up\n";
/// let layout = scan(text);
/// assert_eq!(layout.headers.len(), 2);
/// let journal = layout.journal.unwrap();
/// assert_eq!(&text[journal.range.clone()], "## Journal\n- 09:00 Woke up\n");
/// assert_eq!(journal.items.len(), 1);
/// ```
pub fn scan(text: &str) -> DocumentLayout {
    let frontmatter = locate_frontmatter(text);
    let body_start = frontmatter.as_ref().map(|fm| fm.range.end).unwrap_or(0);
    let blocks = top_level_blocks(text, body_start);

    let headers: Vec<SectionHeader> = blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Level2Header)
        .map(|b| SectionHeader {
            title: b.title.clone(),
            range: b.range.clone(),
        })
        .collect();

    let journal = locate_journal(text, &blocks);

    DocumentLayout {
        frontmatter,
        headers,
        journal,
    }
}

/// Finds a frontmatter block opening on the first line.
///
/// An opening delimiter without a closing one is not a frontmatter block.
pub fn locate_frontmatter(text: &str) -> Option<FrontmatterBlock> {
    let start = if text.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };

    let mut lines = line_spans(text, start);
    let first = lines.next()?;
    if text[first.clone()].trim_end() != FRONTMATTER_DELIMITER {
        return None;
    }
    let inner_start = first.end;

    for line in lines {
        let bare = text[line.clone()].trim_end();
        if bare == FRONTMATTER_DELIMITER || bare == FRONTMATTER_END_ALT {
            return Some(FrontmatterBlock {
                range: start..line.end,
                inner: inner_start..line.start,
            });
        }
    }
    None
}

/// Line ranges from `from`, each including its `\n`.
fn line_spans(text: &str, from: usize) -> impl Iterator<Item = Range<usize>> + '_ {
    let mut offset = from;
    text[from..].split_inclusive('\n').map(move |line| {
        let range = offset..offset + line.len();
        offset = range.end;
        range
    })
}

fn top_level_blocks(text: &str, body_start: usize) -> Vec<Block> {
    let body = &text[body_start..];
    let shift = |r: Range<usize>| (r.start + body_start)..(r.end + body_start);

    let mut blocks: Vec<Block> = Vec::new();
    let mut depth = 0usize;
    let mut in_header = false;

    for (event, range) in Parser::new_ext(body, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    let kind = match tag {
                        Tag::Heading {
                            level: HeadingLevel::H2,
                            ..
                        } => BlockKind::Level2Header,
                        Tag::List(None) => BlockKind::BulletList,
                        _ => BlockKind::Other,
                    };
                    in_header = kind == BlockKind::Level2Header;
                    blocks.push(Block::new(kind, shift(range)));
                } else if depth == 1 && matches!(tag, Tag::Item) {
                    if let Some(block) = blocks.last_mut() {
                        if block.kind == BlockKind::BulletList {
                            block.items.push(shift(range));
                        }
                    }
                }
                depth += 1;
            }
            Event::End(tag_end) => {
                depth = depth.saturating_sub(1);
                if depth == 0 && matches!(tag_end, TagEnd::Heading(_)) && in_header {
                    in_header = false;
                    if let Some(block) = blocks.last_mut() {
                        block.title = block.title.trim().to_string();
                    }
                }
            }
            Event::Text(t) | Event::Code(t) if in_header => {
                if let Some(block) = blocks.last_mut() {
                    block.title.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak if in_header => {
                if let Some(block) = blocks.last_mut() {
                    block.title.push(' ');
                }
            }
            _ if depth == 0 => blocks.push(Block::new(BlockKind::Other, shift(range))),
            _ => {}
        }
    }
    blocks
}

fn locate_journal(text: &str, blocks: &[Block]) -> Option<JournalSection> {
    let header_index = blocks.iter().rposition(|b| {
        b.kind == BlockKind::Level2Header && b.title.trim_end().ends_with(JOURNAL_TITLE_SUFFIX)
    })?;
    let header = blocks[header_index].range.clone();

    let section_blocks: Vec<&Block> = blocks[header_index + 1..]
        .iter()
        .take_while(|b| b.kind != BlockKind::Level2Header)
        .collect();
    let end = blocks[header_index + 1..]
        .iter()
        .find(|b| b.kind == BlockKind::Level2Header)
        .map(|b| b.range.start)
        .unwrap_or(text.len());
    let range = header.start..end;

    let mut items = Vec::new();
    let mut filler = Vec::new();

    match section_blocks
        .iter()
        .position(|b| b.kind == BlockKind::BulletList)
    {
        Some(first) => {
            // Lists separated only by blank lines (e.g. a change of bullet
            // marker) form one entry list.
            let mut list_end = section_blocks[first].range.end;
            items.extend(section_blocks[first].items.iter().cloned());
            for block in &section_blocks[first + 1..] {
                let gap = &text[list_end.min(block.range.start)..block.range.start];
                if block.kind != BlockKind::BulletList || !gap.trim().is_empty() {
                    break;
                }
                items.extend(block.items.iter().cloned());
                list_end = block.range.end;
            }

            let list_start = section_blocks[first].range.start;
            filler.extend(trim_blank_lines(text, header.end..list_start));
            filler.extend(trim_blank_lines(text, list_end..end));
        }
        None => filler.extend(trim_blank_lines(text, header.end..end)),
    }

    Some(JournalSection {
        range,
        header,
        items,
        filler,
    })
}

/// Narrows `range` past leading whitespace-only lines and trailing whitespace.
fn trim_blank_lines(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    if range.start >= range.end {
        return None;
    }
    let mut start = range.start;
    for line in text[range.clone()].split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    let end = start + text[start..range.end].trim_end().len();
    if start >= end {
        None
    } else {
        Some(start..end)
    }
}
