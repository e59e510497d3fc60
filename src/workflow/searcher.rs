//! Section research nodes.
//!
//! Generates search queries for a section, runs them against the configured
//! search provider, and folds the results into writing context.

use super::engine::WorkflowContext;
use super::state::SectionState;
use crate::ai::{init_chat_model, ModelSettings};
use crate::prompts;
use crate::search::{dedupe_and_format_sources, multi_search};

/// Token budget per source when formatting search results.
const MAX_TOKENS_PER_SOURCE: usize = 4000;

/// Generate search queries for the section topic.
///
/// Queries already present in the state (e.g. follow-up queries from a
/// failed grade) are reused untouched.
pub async fn generate_queries(
    ctx: &WorkflowContext,
    state: &mut SectionState,
) -> anyhow::Result<()> {
    if !state.search_queries.is_empty() {
        tracing::debug!(count = state.search_queries.len(), "Reusing existing search queries");
        return Ok(());
    }

    let config = &ctx.config;
    let system = prompts::query_writer_instructions(
        &state.topic,
        &state.section.name,
        &state.section.description,
        config.number_of_queries,
    );

    let planner = init_chat_model(
        &config.planner_model,
        &config.planner_provider,
        ModelSettings::default().with_temperature(0.0),
    )?;

    let response = planner
        .invoke(
            &system,
            &format!("Generate search queries for the '{}' section.", state.section.name),
        )
        .await?;

    state.search_queries = parse_queries(&response);
    ctx.log(&format!(
        "Generated {} queries for section '{}'",
        state.search_queries.len(),
        state.section.name
    ));

    Ok(())
}

/// Parse one query per line, dropping commentary.
pub fn parse_queries(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                return None;
            }
            // Strip leading numbering ("1. query" -> "query")
            let query = match line.split_once('.') {
                Some((prefix, rest)) if prefix.chars().all(|c| c.is_ascii_digit()) => rest.trim(),
                _ => line,
            };
            if query.is_empty() {
                None
            } else {
                Some(query.to_string())
            }
        })
        .collect()
}

/// Run the section's queries against the configured search provider.
///
/// A search failure degrades to an empty result set instead of failing the
/// section; per-query outcomes are logged by status.
pub async fn search_web(ctx: &WorkflowContext, state: &mut SectionState) -> anyhow::Result<()> {
    if state.search_queries.is_empty() {
        tracing::warn!("No search queries to run");
        return Ok(());
    }

    let config = &ctx.config;
    let api_key =
        (!config.searcher_api_key.is_empty()).then_some(config.searcher_api_key.as_str());

    ctx.log(&format!(
        "Running {} queries against {}",
        state.search_queries.len(),
        config.searcher_provider
    ));

    match multi_search(&config.searcher_provider, &state.search_queries, api_key, None).await {
        Ok(responses) => {
            for response in &responses {
                tracing::debug!(query = %response.query, status = %response.status, results = response.results.len(), "Search query finished");
            }
            let found: usize = responses.iter().map(|r| r.results.len()).sum();
            ctx.log(&format!("Found {found} search results"));
            state.search_results.extend(responses.into_iter().flat_map(|r| r.results));
        }
        Err(err) => {
            tracing::warn!(error = %err, "Search failed, continuing without new results");
            ctx.log(&format!("Search failed: {err}"));
        }
    }

    Ok(())
}

/// Combine accumulated search results into writing context.
///
/// Also counts the search iteration, which bounds the write/grade loop.
pub fn combine_search_results(ctx: &WorkflowContext, state: &mut SectionState) {
    state.search_iterations += 1;

    state.source_str = if state.search_results.is_empty() {
        "No search results available.".to_string()
    } else {
        dedupe_and_format_sources(&state.search_results, MAX_TOKENS_PER_SOURCE, true)
    };

    ctx.log(&format!(
        "Combined {} results for section '{}' (iteration {})",
        state.search_results.len(),
        state.section.name,
        state.search_iterations
    ));
}
