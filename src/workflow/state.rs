//! Pipeline state types.
//!
//! Data carried through the blog generation workflow: planned sections,
//! grading feedback, and the blog- and section-level state records.

use serde::{Deserialize, Serialize};

use crate::search::SearchResult;

/// One planned blog section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogSection {
    /// Section name/title
    pub name: String,

    /// What the section should cover
    pub description: String,

    /// Whether the section needs web research before writing
    #[serde(default = "default_needs_research")]
    pub needs_research: bool,

    /// Written section content
    #[serde(default)]
    pub content: String,
}

fn default_needs_research() -> bool {
    true
}

impl BlogSection {
    /// Create an unwritten section.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            needs_research: true,
            content: String::new(),
        }
    }
}

/// Grade assigned to a drafted section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Pass,
    Fail,
}

/// Grading feedback for a drafted section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub grade: Grade,

    #[serde(default)]
    pub feedback: String,

    /// Queries to gather the missing information on a failing grade
    #[serde(default)]
    pub follow_up_queries: Vec<String>,
}

/// State of a full blog generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogState {
    /// Blog topic
    pub topic: String,

    /// All planned sections
    pub sections: Vec<BlogSection>,

    /// Sections still awaiting research
    pub research_needed_sections: Vec<BlogSection>,

    /// Finished sections
    pub completed_sections: Vec<BlogSection>,

    /// Final combined blog content
    pub blog_post: String,
}

impl BlogState {
    /// Create the initial state for a topic.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            sections: Vec::new(),
            research_needed_sections: Vec::new(),
            completed_sections: Vec::new(),
            blog_post: String::new(),
        }
    }
}

/// State of a single section's research/write loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionState {
    /// Blog topic
    pub topic: String,

    /// Section being written
    pub section: BlogSection,

    /// Generated search queries
    pub search_queries: Vec<String>,

    /// Accumulated search results
    pub search_results: Vec<SearchResult>,

    /// Combined source context for writing
    pub source_str: String,

    /// Search iterations performed so far
    pub search_iterations: u32,

    /// Sections completed by this loop
    pub completed_sections: Vec<BlogSection>,
}

impl SectionState {
    /// Create the initial loop state for a section.
    pub fn new(topic: impl Into<String>, section: BlogSection) -> Self {
        Self {
            topic: topic.into(),
            section,
            search_queries: Vec::new(),
            search_results: Vec::new(),
            source_str: String::new(),
            search_iterations: 0,
            completed_sections: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_section_needs_research() {
        let section = BlogSection::new("History", "Where it all began");
        assert!(section.needs_research);
        assert!(section.content.is_empty());
    }

    #[test]
    fn test_section_deserialize_defaults() {
        let section: BlogSection =
            serde_json::from_str(r#"{"name": "Intro", "description": "Opening"}"#).unwrap();
        assert!(section.needs_research);
        assert_eq!(section.content, "");
    }

    #[test]
    fn test_feedback_deserialize() {
        let feedback: Feedback = serde_json::from_str(
            r#"{"grade": "fail", "feedback": "thin", "follow_up_queries": ["more data"]}"#,
        )
        .unwrap();
        assert_eq!(feedback.grade, Grade::Fail);
        assert_eq!(feedback.follow_up_queries, vec!["more data"]);
    }

    #[test]
    fn test_feedback_defaults_follow_ups() {
        let feedback: Feedback = serde_json::from_str(r#"{"grade": "pass"}"#).unwrap();
        assert_eq!(feedback.grade, Grade::Pass);
        assert!(feedback.follow_up_queries.is_empty());
    }

    #[test]
    fn test_blog_state_new() {
        let state = BlogState::new("Rust web frameworks");
        assert_eq!(state.topic, "Rust web frameworks");
        assert!(state.sections.is_empty());
        assert!(state.blog_post.is_empty());
    }
}
