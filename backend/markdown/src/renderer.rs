//! Plain-text renderer
//!
//! Flattens a pulldown-cmark event stream into text suitable for speech
//! synthesis. Markup characters disappear; paragraph and list structure
//! survives as line breaks.

use pulldown_cmark::{Event, Options, Parser, Tag};

/// Appended when a paragraph, heading or code block closes.
const PARAGRAPH_BREAK: &str = "\n\n";

/// Separator used when re-joining the non-blank output lines.
const LINE_SEPARATOR: &str = "\n";

pub struct Renderer;

impl Renderer {
    /// Renders markdown to plain text, stripping all formatting. Ideal for TTS engines.
    ///
    /// Input may be a whole document or a slice of one. Malformed markdown is
    /// treated as literal text by the parser, so this never fails.
    pub fn to_plain_text(markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);

        let mut output = String::with_capacity(markdown.len());
        // Alt text lives inside image tags and is not spoken.
        let mut image_depth = 0usize;

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Text(text) | Event::Code(text) => {
                    if image_depth == 0 {
                        output.push_str(&text);
                    }
                }
                Event::SoftBreak => output.push(' '),
                Event::HardBreak => output.push('\n'),
                Event::Start(Tag::Item) => output.push('\n'),
                Event::Start(Tag::Image(..)) => image_depth += 1,
                Event::End(Tag::Image(..)) => image_depth = image_depth.saturating_sub(1),
                Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::CodeBlock(_)) => {
                    output.push_str(PARAGRAPH_BREAK);
                }
                Event::End(Tag::TableCell) => output.push(' '),
                Event::End(Tag::TableHead | Tag::TableRow) => output.push('\n'),
                _ => {}
            }
        }

        normalize_lines(&output)
    }
}

/// Drops blank lines, re-joins the rest and trims the result.
fn normalize_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_emphasis_and_keeps_list_items_on_their_own_lines() {
        let text = Renderer::to_plain_text("**bold** and _em_ text\n\n- item one\n- item two");
        assert_eq!(text, "bold and em text\nitem one\nitem two");
        assert!(!text.contains('*'));
        assert!(!text.contains('_'));
        assert!(!text.contains('-'));
    }

    #[test]
    fn code_block_content_is_verbatim() {
        let md = "Run this:\n\n```python\nprint(\"**not bold**\")  # keep\n    x = [a](b)\n```\n\nDone.";
        let text = Renderer::to_plain_text(md);
        assert_eq!(
            text,
            "Run this:\nprint(\"**not bold**\")  # keep\n    x = [a](b)\nDone."
        );
    }

    #[test]
    fn indented_code_block_is_kept() {
        let text = Renderer::to_plain_text("Example:\n\n    let x = *y;\n\nAfter");
        assert_eq!(text, "Example:\nlet x = *y;\nAfter");
    }

    #[test]
    fn soft_breaks_become_spaces_and_hard_breaks_newlines() {
        assert_eq!(Renderer::to_plain_text("one\ntwo"), "one two");
        assert_eq!(Renderer::to_plain_text("one  \ntwo"), "one\ntwo");
    }

    #[test]
    fn drops_link_blockquote_and_heading_syntax() {
        let md = "## Market prices\n\n> See [mandi rates](https://example.com) for `wheat`.";
        let text = Renderer::to_plain_text(md);
        assert_eq!(text, "Market prices\nSee mandi rates for wheat.");
        for marker in ['#', '>', '[', ']', '(', ')', '`'] {
            assert!(!text.contains(marker), "leaked {marker:?} in {text:?}");
        }
    }

    #[test]
    fn table_cells_are_spaced_and_rows_split() {
        let md = "| Crop | Yield |\n|------|-------|\n| Wheat | 45 q/ha |\n| Rice | 60 q/ha |";
        let text = Renderer::to_plain_text(md);
        assert!(!text.contains('|'));
        let lines: Vec<_> = text.lines().map(str::trim).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Crop") && lines[0].ends_with("Yield"));
        assert!(lines[1].starts_with("Wheat") && lines[1].ends_with("45 q/ha"));
        assert!(lines[2].starts_with("Rice") && lines[2].ends_with("60 q/ha"));
    }

    #[test]
    fn image_alt_text_and_html_are_dropped() {
        let text = Renderer::to_plain_text("Look ![a chart](c.png) here <b>now</b>");
        assert!(!text.contains("a chart"));
        assert!(!text.contains('<'));
        assert!(text.starts_with("Look"));
    }

    #[test]
    fn collapses_blank_lines_and_trims() {
        let text = Renderer::to_plain_text("\n\n# Title\n\n\n\nPara one.\n\n\n\nPara two.\n\n");
        assert_eq!(text, "Title\nPara one.\nPara two.");
    }

    #[test]
    fn every_output_line_is_a_fixed_point() {
        let md = "# Soil health\n\nThe **pH** is 7.2, which is _neutral_.\n\n1. Add urea\n2. Irrigate weekly";
        let once = Renderer::to_plain_text(md);
        assert_eq!(once.lines().next(), Some("Soil health"));
        for line in once.lines() {
            assert_eq!(Renderer::to_plain_text(line), line);
        }
    }

    #[test]
    fn single_paragraph_output_is_idempotent() {
        let once = Renderer::to_plain_text("Sow *wheat* in early **November**.");
        assert_eq!(Renderer::to_plain_text(&once), once);
    }

    #[test]
    fn malformed_markdown_does_not_panic() {
        let text = Renderer::to_plain_text("**unclosed [link( `tick ~~~\n|a|");
        assert!(!text.is_empty());
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(Renderer::to_plain_text(""), "");
        assert_eq!(Renderer::to_plain_text("   \n\n  "), "");
    }
}
