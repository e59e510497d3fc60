//! Sequential workflow engine.
//!
//! Drives the blog pipeline: plan the outline, research and write each
//! section (iterating on failed grades up to the search-depth budget), write
//! the non-research sections, and combine the result.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::planner::plan_sections;
use super::searcher::{combine_search_results, generate_queries, search_web};
use super::state::{BlogState, SectionState};
use super::status::{NodeStatus, END};
use super::writer::{combine_blog_sections, write_final_section, write_section};
use crate::core::logger::LogCallback;
use crate::core::{logger, Configuration};
use crate::prompts;

/// Context owned by a single generation run.
///
/// Carries the run configuration and an optionally injected progress sink.
/// Without a sink, progress goes through the process-wide logger shim.
pub struct WorkflowContext {
    /// Run configuration, read-only for the whole run
    pub config: Configuration,

    sink: Option<Arc<LogCallback>>,
}

impl WorkflowContext {
    /// Create a context with the global logger shim as the progress sink.
    pub fn new(config: Configuration) -> Self {
        Self { config, sink: None }
    }

    /// Inject an explicit progress sink, bypassing the global shim.
    pub fn with_sink(mut self, sink: Arc<LogCallback>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Emit a progress message.
    pub fn log(&self, message: &str) {
        match &self.sink {
            Some(sink) => sink(message),
            None => logger::log(message),
        }
    }

    /// Report a node lifecycle change.
    pub fn node_status(&self, node: &str, status: NodeStatus) {
        self.log(&format!("[{status}] {node}"));
    }
}

/// Generate a complete blog post for a topic.
///
/// `overrides` is the external configuration map (with its optional
/// `"configurable"` sub-map); `sink` optionally receives progress messages.
pub async fn generate_blog(
    topic: &str,
    overrides: Option<&Value>,
    sink: Option<Arc<LogCallback>>,
) -> anyhow::Result<String> {
    let config = Configuration::from_overrides(overrides)?;
    let mut ctx = WorkflowContext::new(config);
    if let Some(sink) = sink {
        ctx = ctx.with_sink(sink);
    }
    run(&ctx, topic).await
}

/// Run the full pipeline with an existing context.
pub async fn run(ctx: &WorkflowContext, topic: &str) -> anyhow::Result<String> {
    let mut state = BlogState::new(topic);

    ctx.node_status("plan_sections", NodeStatus::Processing);
    observed(ctx, "plan_sections", plan_sections(ctx, &mut state).await)?;

    let research_sections = std::mem::take(&mut state.research_needed_sections);
    for section in &research_sections {
        ctx.node_status(&format!("section '{}'", section.name), NodeStatus::Waiting);
    }
    for section in research_sections {
        ctx.log(&format!("Researching section '{}'", section.name));
        let mut section_state = SectionState::new(&state.topic, section);
        run_section_loop(ctx, &mut section_state).await?;
        state.completed_sections.append(&mut section_state.completed_sections);
    }

    write_remaining_sections(ctx, &mut state).await?;

    sort_by_plan_order(&mut state);
    ctx.node_status("combine_blog_sections", NodeStatus::Processing);
    observed(ctx, "combine_blog_sections", combine_blog_sections(ctx, &mut state).await)?;

    ctx.node_status("workflow", NodeStatus::Completed);
    Ok(state.blog_post)
}

/// Research/write/grade loop for one section.
///
/// Routing follows the write node's command: [`END`] finishes the section,
/// anything else goes back to the search step with the grader's follow-up
/// queries.
async fn run_section_loop(
    ctx: &WorkflowContext,
    section_state: &mut SectionState,
) -> anyhow::Result<()> {
    loop {
        ctx.node_status("generate_queries", NodeStatus::Processing);
        observed(ctx, "generate_queries", generate_queries(ctx, section_state).await)?;

        ctx.node_status("search_web", NodeStatus::Processing);
        observed(ctx, "search_web", search_web(ctx, section_state).await)?;

        ctx.node_status("combine_search_results", NodeStatus::Processing);
        combine_search_results(ctx, section_state);
        ctx.node_status("combine_search_results", NodeStatus::Completed);

        ctx.node_status("write_section", NodeStatus::Processing);
        let goto = observed(ctx, "write_section", write_section(ctx, section_state).await)?;
        if goto == END {
            return Ok(());
        }
    }
}

/// Write the planned sections that need no research, using the completed
/// sections as context.
async fn write_remaining_sections(
    ctx: &WorkflowContext,
    state: &mut BlogState,
) -> anyhow::Result<()> {
    let completed_names: Vec<String> =
        state.completed_sections.iter().map(|section| section.name.clone()).collect();
    let remaining: Vec<_> = state
        .sections
        .iter()
        .filter(|section| !section.needs_research && !completed_names.contains(&section.name))
        .cloned()
        .collect();

    if remaining.is_empty() {
        return Ok(());
    }

    let research_context = prompts::completed_sections_context(&state.completed_sections);
    for mut section in remaining {
        ctx.node_status("write_final_sections", NodeStatus::Processing);
        let result = write_final_section(ctx, &state.topic, &mut section, &research_context).await;
        observed(ctx, "write_final_sections", result)?;
        state.completed_sections.push(section);
    }

    Ok(())
}

/// Restore the planned section order before combining.
fn sort_by_plan_order(state: &mut BlogState) {
    let order: HashMap<&str, usize> = state
        .sections
        .iter()
        .enumerate()
        .map(|(index, section)| (section.name.as_str(), index))
        .collect();

    state
        .completed_sections
        .sort_by_key(|section| order.get(section.name.as_str()).copied().unwrap_or(usize::MAX));
}

/// Report a node's terminal status and pass its result through.
fn observed<T>(ctx: &WorkflowContext, node: &str, result: anyhow::Result<T>) -> anyhow::Result<T> {
    match &result {
        Ok(_) => ctx.node_status(node, NodeStatus::Completed),
        Err(_) => ctx.node_status(node, NodeStatus::Failed),
    }
    result
}
