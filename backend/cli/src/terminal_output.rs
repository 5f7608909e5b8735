//! Terminal output: ANSI styling and human-readable section listings.

use soilcast_core::{NarratedSection, Section};

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

fn paint(text: &str, style: &str, color: bool) -> String {
    if color {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

// ---------------------------------------------------------------------------
// Formatted notes
// ---------------------------------------------------------------------------

pub fn note_warn(msg: &str) {
    if supports_color() {
        eprintln!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        eprintln!("WARN: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        println!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("OK: {msg}");
    }
}

// ---------------------------------------------------------------------------
// Section listings
// ---------------------------------------------------------------------------

/// Numbered titles followed by their indented text.
pub fn render_sections(sections: &[Section], color: bool) -> String {
    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        let title = format!("{}. {}", i + 1, section.title);
        out.push_str(&paint(&title, &format!("{BOLD}{CYAN}"), color));
        out.push('\n');
        push_indented(&mut out, &section.content);
        out.push('\n');
    }
    out
}

/// Like [`render_sections`], with each section's audio link or failure reason.
pub fn render_narrated(sections: &[NarratedSection], color: bool) -> String {
    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        let title = format!("{}. {}", i + 1, section.title);
        out.push_str(&paint(&title, &format!("{BOLD}{CYAN}"), color));
        out.push('\n');
        push_indented(&mut out, &section.text);

        let audio = match (&section.audio_url, &section.audio_error) {
            (Some(url), _) => paint(&format!("audio: {url}"), GREEN, color),
            (None, Some(reason)) => paint(&format!("audio failed: {reason}"), RED, color),
            (None, None) => paint("audio failed", RED, color),
        };
        out.push_str("   ");
        out.push_str(&audio);
        out.push_str("\n\n");
    }
    out
}

fn push_indented(out: &mut String, text: &str) {
    if text.is_empty() {
        out.push_str("   (empty)\n");
        return;
    }
    for line in text.lines() {
        out.push_str("   ");
        out.push_str(line);
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_only_styles_when_asked() {
        assert_eq!(paint("hello", GREEN, false), "hello");
        assert_eq!(paint("hello", GREEN, true), format!("{GREEN}hello{RESET}"));
    }

    #[test]
    fn sections_are_numbered_and_indented() {
        let sections = vec![
            Section::new("Overall Analysis", "Loamy soil."),
            Section::new("Crops", "Wheat\nMustard"),
        ];
        let out = render_sections(&sections, false);
        assert_eq!(
            out,
            "1. Overall Analysis\n   Loamy soil.\n\n2. Crops\n   Wheat\n   Mustard\n\n"
        );
    }

    #[test]
    fn narrated_output_shows_audio_outcome() {
        let sections = vec![
            NarratedSection::with_audio(Section::new("Soil", "pH 7"), "/get-audio/a_part_0.mp3".into()),
            NarratedSection::without_audio(Section::new("Crops", "Wheat"), "timed out"),
        ];
        let plain = render_narrated(&sections, false);
        assert!(plain.contains("audio: /get-audio/a_part_0.mp3"));
        assert!(plain.contains("audio failed: timed out"));

        let colored = render_narrated(&sections, true);
        assert!(colored.contains(&format!("{RED}audio failed: timed out{RESET}")));
        assert_ne!(colored, plain);
    }
}
