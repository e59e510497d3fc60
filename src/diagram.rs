//! Card diagram generation.
//!
//! Renders a sequence of title/content entries as a vertical card diagram in
//! SVG, used to visualize a post's section summaries. Exercised directly by
//! the `diagram` debug subcommand.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Diagram generation errors.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    #[error("no diagram entries to render")]
    Empty,

    #[error("failed to write diagram: {0}")]
    Io(#[from] std::io::Error),
}

/// One card in the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramEntry {
    pub title: String,
    pub content: String,
}

impl DiagramEntry {
    /// Create a new entry.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into() }
    }
}

/// Cards rendered per diagram.
const MAX_ENTRIES: usize = 5;

/// Card accent colors, cycled per entry.
const PALETTE: &[&str] = &["#555555", "#4CAF50", "#FFC107", "#FF9800", "#F44336"];

const WIDTH: u32 = 500;
const MARGIN: u32 = 20;
const HEADER_HEIGHT: u32 = 48;
const CARD_GAP: u32 = 14;
const CARD_PADDING: u32 = 14;
const TITLE_HEIGHT: u32 = 22;
const LINE_HEIGHT: u32 = 18;
const WRAP_COLUMNS: usize = 52;

/// Split paragraph-separated text into diagram entries.
///
/// The first line of each paragraph becomes the card title, the rest its
/// content. Capped at [`MAX_ENTRIES`] entries.
pub fn parse_text_to_entries(text: &str) -> Vec<DiagramEntry> {
    text.trim()
        .split("\n\n")
        .filter_map(|paragraph| {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                return None;
            }
            let mut lines = paragraph.lines();
            let title = lines.next()?.trim().to_string();
            let content = lines.collect::<Vec<_>>().join("\n").trim().to_string();
            Some(DiagramEntry { title, content })
        })
        .take(MAX_ENTRIES)
        .collect()
}

/// Render the entries as an SVG card diagram and write it to `output_file`.
///
/// Returns the written path. Fails on empty input or when the file cannot be
/// written; entries beyond [`MAX_ENTRIES`] are dropped.
pub fn generate_card_diagram(
    entries: &[DiagramEntry],
    output_file: &Path,
) -> Result<PathBuf, DiagramError> {
    if entries.is_empty() {
        return Err(DiagramError::Empty);
    }
    let entries = &entries[..entries.len().min(MAX_ENTRIES)];

    let cards: Vec<Card> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| Card {
            title: entry.title.clone(),
            lines: wrap_text(&entry.content, WRAP_COLUMNS),
            color: PALETTE[index % PALETTE.len()],
        })
        .collect();

    let total_height = MARGIN
        + HEADER_HEIGHT
        + cards.iter().map(|card| card.height() + CARD_GAP).sum::<u32>()
        + MARGIN;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{total_height}" viewBox="0 0 {WIDTH} {total_height}">"#
    );
    let _ =
        writeln!(svg, r##"<rect width="{WIDTH}" height="{total_height}" fill="#FFFFFF"/>"##);
    let _ = writeln!(
        svg,
        r##"<text x="{x}" y="{y}" font-family="sans-serif" font-size="20" font-weight="bold" text-anchor="middle" fill="#333333">Summary</text>"##,
        x = WIDTH / 2,
        y = MARGIN + 24,
    );

    let mut cursor = MARGIN + HEADER_HEIGHT;
    for card in &cards {
        render_card(&mut svg, card, cursor);
        cursor += card.height() + CARD_GAP;
    }
    svg.push_str("</svg>\n");

    if let Some(parent) = output_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output_file, svg)?;

    Ok(output_file.to_path_buf())
}

struct Card {
    title: String,
    lines: Vec<String>,
    color: &'static str,
}

impl Card {
    fn height(&self) -> u32 {
        CARD_PADDING * 2 + TITLE_HEIGHT + self.lines.len() as u32 * LINE_HEIGHT
    }
}

fn render_card(svg: &mut String, card: &Card, y: u32) {
    let card_width = WIDTH - MARGIN * 2;
    let _ = writeln!(
        svg,
        r##"<rect x="{MARGIN}" y="{y}" width="{card_width}" height="{height}" rx="8" fill="#FAFAFA" stroke="{color}" stroke-width="2"/>"##,
        height = card.height(),
        color = card.color,
    );
    let _ = writeln!(
        svg,
        r#"<text x="{x}" y="{title_y}" font-family="sans-serif" font-size="15" font-weight="bold" fill="{color}">{title}</text>"#,
        x = MARGIN + CARD_PADDING,
        title_y = y + CARD_PADDING + 15,
        color = card.color,
        title = escape_xml(&card.title),
    );

    for (index, line) in card.lines.iter().enumerate() {
        let _ = writeln!(
            svg,
            r##"<text x="{x}" y="{line_y}" font-family="sans-serif" font-size="12" fill="#333333">{line}</text>"##,
            x = MARGIN + CARD_PADDING,
            line_y = y + CARD_PADDING + TITLE_HEIGHT + (index as u32 + 1) * LINE_HEIGHT - 4,
            line = escape_xml(line),
        );
    }
}

/// Naive word wrap at a column budget.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.lines() {
        let mut current = String::new();
        for word in source_line.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= columns {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_to_entries() {
        let text = "First title\nbody line one\nbody line two\n\nSecond title\nmore body";
        let entries = parse_text_to_entries(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "First title");
        assert!(entries[0].content.contains("body line two"));
        assert_eq!(entries[1].title, "Second title");
    }

    #[test]
    fn test_parse_text_caps_entries() {
        let text = (1..=8).map(|i| format!("Title {i}\ncontent")).collect::<Vec<_>>().join("\n\n");
        assert_eq!(parse_text_to_entries(&text).len(), MAX_ENTRIES);
    }

    #[test]
    fn test_generate_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        assert!(matches!(generate_card_diagram(&[], &path), Err(DiagramError::Empty)));
    }

    #[test]
    fn test_generate_writes_one_card_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        let entries = vec![
            DiagramEntry::new("Test 1", "Test content 1"),
            DiagramEntry::new("Test 2", "Test content 2"),
        ];

        let written = generate_card_diagram(&entries, &path).unwrap();
        assert_eq!(written, path);

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Test 1"));
        assert!(svg.contains("Test 2"));
        assert_eq!(svg.matches("<rect").count(), 3); // background + two cards
    }

    #[test]
    fn test_generate_escapes_xml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        let entries = vec![DiagramEntry::new("A < B & C", "x > y")];

        generate_card_diagram(&entries, &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("A &lt; B &amp; C"));
        assert!(svg.contains("x &gt; y"));
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
    }
}
