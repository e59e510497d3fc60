//! Prompt-context formatting for search results and planned sections.

use std::collections::HashMap;
use std::fmt::Write as _;

use super::SearchResult;
use crate::workflow::state::BlogSection;

/// Rough token-to-character conversion used for source truncation.
const CHARS_PER_TOKEN: usize = 4;

/// Deduplicate search results by URL and render them as a source block.
///
/// Duplicate URLs keep their first position but take the content of the last
/// occurrence. Raw content is limited to roughly `max_tokens_per_source`
/// tokens per source.
pub fn dedupe_and_format_sources(
    results: &[SearchResult],
    max_tokens_per_source: usize,
    include_raw_content: bool,
) -> String {
    let mut order: Vec<&str> = Vec::new();
    let mut by_url: HashMap<&str, &SearchResult> = HashMap::new();
    for result in results {
        if !by_url.contains_key(result.url.as_str()) {
            order.push(result.url.as_str());
        }
        by_url.insert(result.url.as_str(), result);
    }

    let mut formatted = String::from("Content from sources:\n");
    for url in order {
        let source = by_url[url];
        let _ = writeln!(formatted, "{}", "=".repeat(80));
        let _ = writeln!(formatted, "Source: {}", source.title);
        let _ = writeln!(formatted, "{}", "-".repeat(80));
        let _ = writeln!(formatted, "URL: {}\n===", source.url);
        let _ = writeln!(formatted, "Most relevant content from source: {}\n===", source.content);
        if include_raw_content {
            let raw = source.raw_content.as_deref().unwrap_or_else(|| {
                tracing::warn!(url = %source.url, "No raw content found for source");
                ""
            });
            let _ = writeln!(
                formatted,
                "Full source content limited to {} tokens: {}\n",
                max_tokens_per_source,
                truncate_chars(raw, max_tokens_per_source * CHARS_PER_TOKEN)
            );
        }
        let _ = writeln!(formatted, "{}\n", "=".repeat(80));
    }

    formatted.trim_end().to_string()
}

/// Render planned sections for prompt context.
pub fn format_sections(sections: &[BlogSection]) -> String {
    let mut formatted = String::new();
    for (index, section) in sections.iter().enumerate() {
        let _ = write!(
            formatted,
            "\n{sep}\nSection {num}: {name}\n{sep}\nDescription:\n{description}\nRequires Research:\n{research}\n\nContent:\n{content}\n",
            sep = "=".repeat(60),
            num = index + 1,
            name = section.name,
            description = section.description,
            research = section.needs_research,
            content = if section.content.is_empty() { "[Not yet written]" } else { &section.content },
        );
    }
    formatted
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let truncated: String = text.chars().take(limit).collect();
        format!("{truncated}... [truncated]")
    } else {
        text.to_string()
    }
}
