//! Heading scanner
//!
//! Finds ATX heading lines (`#`, `##`, ...) in a markdown document with a
//! small line scanner rather than a full markdown grammar. Only lines that
//! start with a `#` run at column 0 count; `#` characters inside fenced code
//! blocks or in the middle of a line never match.

use serde::{Deserialize, Serialize};

/// A heading line found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingMatch {
    /// Number of `#` characters. Sections treat every level the same.
    pub level: usize,
    /// Heading text with the marker run and surrounding whitespace removed.
    pub title: String,
    /// Byte offset of the start of the heading line.
    pub start: usize,
    /// Byte offset of the end of the heading line, line terminator excluded.
    pub end: usize,
}

pub struct HeadingScanner;

impl HeadingScanner {
    /// Returns every heading in document order. Repeated titles are kept.
    pub fn scan(text: &str) -> Vec<HeadingMatch> {
        let mut headings = Vec::new();
        let mut open_fence: Option<Fence> = None;
        let mut offset = 0;

        for raw_line in text.split_inclusive('\n') {
            let start = offset;
            offset += raw_line.len();
            let line = raw_line.trim_end_matches(|c: char| c == '\n' || c == '\r');

            if let Some(fence) = &open_fence {
                if fence.is_closed_by(line) {
                    open_fence = None;
                }
                continue;
            }
            if let Some(fence) = Fence::open(line) {
                open_fence = Some(fence);
                continue;
            }

            if let Some((level, title)) = parse_heading_line(line) {
                headings.push(HeadingMatch {
                    level,
                    title: title.to_string(),
                    start,
                    end: start + line.len(),
                });
            }
        }

        headings
    }
}

fn parse_heading_line(line: &str) -> Option<(usize, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(|c: char| c == ' ' || c == '\t') {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        None
    } else {
        Some((level, title))
    }
}

/// An open fenced code block (```` ``` ```` or `~~~`).
#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: u8,
    len: usize,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let body = strip_fence_indent(line)?;
        let marker = *body.as_bytes().first()?;
        if marker != b'`' && marker != b'~' {
            return None;
        }
        let len = body.bytes().take_while(|&b| b == marker).count();
        if len < 3 {
            return None;
        }
        // A backtick fence's info string may not contain backticks.
        if marker == b'`' && body[len..].contains('`') {
            return None;
        }
        Some(Self { marker, len })
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let Some(body) = strip_fence_indent(line) else {
            return false;
        };
        let len = body.bytes().take_while(|&b| b == self.marker).count();
        len >= self.len && body[len..].trim().is_empty()
    }
}

/// Fences may be indented by up to three spaces.
fn strip_fence_indent(line: &str) -> Option<&str> {
    let indent = line.bytes().take_while(|&b| b == b' ').count();
    if indent > 3 { None } else { Some(&line[indent..]) }
}
