//! Sectionizer
//!
//! Partitions a model response into titled sections, one per heading, plus
//! an optional preamble. Each section's body is rendered to plain text.

use std::ops::Range;

use soilcast_core::{Section, ANALYSIS_RESULT_TITLE, OVERALL_ANALYSIS_TITLE};
use tracing::debug;

use crate::renderer::Renderer;
use crate::scanner::HeadingScanner;

/// Where a span came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Text before the first heading.
    Preamble,
    /// A heading line and everything up to the next heading.
    Heading,
    /// The whole document, when it has no headings at all.
    Whole,
}

/// Source-level view of one section, before plain-text conversion.
///
/// Byte ranges index into the document passed to [`split_spans`]. Taken in
/// order, `heading` followed by `body` for every span reproduces the document
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub kind: SpanKind,
    pub title: String,
    pub heading: Option<Range<usize>>,
    pub body: Range<usize>,
}

/// Splits a document into spans without converting anything.
///
/// A preamble span is returned whenever the first heading is not at offset 0,
/// even if it only holds whitespace. An empty document has no spans.
pub fn split_spans(markdown: &str) -> Vec<SectionSpan> {
    if markdown.is_empty() {
        return Vec::new();
    }

    let headings = HeadingScanner::scan(markdown);
    let Some(first) = headings.first() else {
        return vec![SectionSpan {
            kind: SpanKind::Whole,
            title: ANALYSIS_RESULT_TITLE.to_string(),
            heading: None,
            body: 0..markdown.len(),
        }];
    };

    let mut spans = Vec::with_capacity(headings.len() + 1);
    if first.start > 0 {
        spans.push(SectionSpan {
            kind: SpanKind::Preamble,
            title: OVERALL_ANALYSIS_TITLE.to_string(),
            heading: None,
            body: 0..first.start,
        });
    }

    for (i, heading) in headings.iter().enumerate() {
        let next_start = headings
            .get(i + 1)
            .map_or(markdown.len(), |next| next.start);
        spans.push(SectionSpan {
            kind: SpanKind::Heading,
            title: heading.title.clone(),
            heading: Some(heading.start..heading.end),
            body: heading.end..next_start,
        });
    }

    spans
}

/// Splits a model response into plain-text sections, in document order.
///
/// The heading line is cut out of its section by offset, so a body line that
/// happens to repeat the heading text is kept.
pub fn sectionize(markdown: &str) -> Vec<Section> {
    let sections: Vec<Section> = split_spans(markdown)
        .into_iter()
        .filter_map(|span| {
            let body = markdown[span.body].trim();
            if span.kind == SpanKind::Preamble && body.is_empty() {
                return None;
            }
            Some(Section::new(span.title, Renderer::to_plain_text(body)))
        })
        .collect();

    debug!(sections = sections.len(), bytes = markdown.len(), "Sectionized response");
    sections
}
