//! Section planning node.
//!
//! Asks the planner model for a section outline and parses the numbered-list
//! response into [`BlogSection`] records.

use once_cell::sync::Lazy;
use regex::Regex;

use super::engine::WorkflowContext;
use super::state::{BlogSection, BlogState};
use crate::ai::{init_chat_model, ModelSettings};
use crate::prompts;

/// Section names written from the other sections instead of web research.
const NON_RESEARCH_KEYWORDS: &[&str] =
    &["introduction", "intro", "conclusion", "summary", "closing", "faq", "greeting"];

static SECTION_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\d+\.\s+").unwrap());

/// Plan the section outline for the blog topic.
///
/// Fills `state.sections` and `state.research_needed_sections`.
pub async fn plan_sections(ctx: &WorkflowContext, state: &mut BlogState) -> anyhow::Result<()> {
    let config = &ctx.config;

    let system = prompts::section_planner_instructions(&state.topic, config.number_of_blog_sections);
    let planner = init_chat_model(
        &config.planner_model,
        &config.planner_provider,
        ModelSettings::default().with_temperature(0.0),
    )?;

    let response = planner
        .invoke(&system, &format!("Plan sections for a blog post about '{}'.", state.topic))
        .await?;

    let sections = parse_section_plan(&response);
    anyhow::ensure!(!sections.is_empty(), "planner returned no usable sections");

    ctx.log(&format!("Planned {} sections for '{}'", sections.len(), state.topic));

    state.research_needed_sections =
        sections.iter().filter(|section| section.needs_research).cloned().collect();
    state.sections = sections;
    Ok(())
}

/// Parse a numbered-list section plan.
///
/// Each item's first line becomes the section name; the remaining lines
/// become its description.
pub fn parse_section_plan(text: &str) -> Vec<BlogSection> {
    // Ensure a leading separator so an immediate "1. ..." splits too
    let normalized = format!("\n{}", text.trim());

    SECTION_SPLIT
        .split(&normalized)
        // Everything before the first numbered item is preamble, not a section
        .skip(1)
        .filter_map(|chunk| {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                return None;
            }

            let mut lines = chunk.lines();
            let name = lines.next()?.trim().trim_matches(|c| c == '*' || c == '#' || c == '`').trim();
            if name.is_empty() {
                return None;
            }

            let description = lines.collect::<Vec<_>>().join("\n").trim().to_string();
            let mut section = BlogSection::new(name, description);
            section.needs_research = needs_research(name);
            Some(section)
        })
        .collect()
}

/// Whether a section of this name needs web research before writing.
fn needs_research(name: &str) -> bool {
    let lowered = name.to_lowercase();
    !NON_RESEARCH_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbered_plan() {
        let plan = "1. Introduction\nSets up the topic, no research needed.\n\
                    2. Memory Safety\nHow ownership prevents data races.\nCovers borrowing too.\n\
                    3. Conclusion\nWraps up the post.";

        let sections = parse_section_plan(plan);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].name, "Introduction");
        assert_eq!(sections[1].name, "Memory Safety");
        assert!(sections[1].description.contains("Covers borrowing too."));
        assert_eq!(sections[2].name, "Conclusion");
    }

    #[test]
    fn test_parse_plan_with_leading_text() {
        let plan = "Here is the plan:\n\n1. Setup\nInstalling the toolchain.\n2. Usage\nDay-to-day commands.";
        let sections = parse_section_plan(plan);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "Setup");
    }

    #[test]
    fn test_parse_plan_strips_markdown_decorations() {
        let sections = parse_section_plan("1. **Getting Started**\nFirst steps.");
        assert_eq!(sections[0].name, "Getting Started");
    }

    #[test]
    fn test_parse_empty_plan() {
        assert!(parse_section_plan("").is_empty());
        assert!(parse_section_plan("no numbered items here").is_empty());
    }

    #[test]
    fn test_research_flags() {
        let plan = "1. Introduction\nOpening.\n2. Benchmarks\nNumbers.\n3. FAQ\nQuestions.\n4. Summary\nRecap.";
        let sections = parse_section_plan(plan);
        assert!(!sections[0].needs_research);
        assert!(sections[1].needs_research);
        assert!(!sections[2].needs_research);
        assert!(!sections[3].needs_research);
    }
}
