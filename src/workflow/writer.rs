//! Section writing nodes.
//!
//! Drafts researched sections and grades them, writes the non-research
//! sections from completed context, and combines everything into the final
//! post.

use super::engine::WorkflowContext;
use super::state::{BlogSection, BlogState, Feedback, Grade, SectionState};
use super::status::END;
use crate::ai::{init_chat_model, ModelSettings, Provider, ThinkingConfig};
use crate::prompts;

/// Routing target that sends a failing section back to research.
pub const SEARCH_WEB: &str = "search_web";

/// Thinking budget used when grading with an Anthropic planner.
const GRADER_MAX_TOKENS: u32 = 20_000;
const GRADER_THINKING_BUDGET: u32 = 16_000;

/// Draft the section from its research context, then grade it.
///
/// Returns the next routing target: [`END`] when the section passes or the
/// search depth is exhausted, [`SEARCH_WEB`] when the grader requested
/// follow-up research.
pub async fn write_section(
    ctx: &WorkflowContext,
    state: &mut SectionState,
) -> anyhow::Result<&'static str> {
    let config = &ctx.config;

    let inputs = prompts::section_writer_inputs(
        &state.topic,
        &state.section.name,
        &state.section.description,
        &state.source_str,
        &state.section.content,
    );

    let writer = init_chat_model(
        &config.writer_model,
        &config.writer_provider,
        ModelSettings::default().with_temperature(0.0),
    )?;
    state.section.content =
        writer.invoke(&prompts::section_writer_instructions(), &inputs).await?;

    let feedback = grade_section(ctx, state).await?;

    if feedback.grade == Grade::Pass || state.search_iterations >= config.max_search_depth {
        if feedback.grade != Grade::Pass {
            ctx.log(&format!(
                "Section '{}' published after exhausting search depth {}",
                state.section.name, config.max_search_depth
            ));
        }
        state.completed_sections.push(state.section.clone());
        Ok(END)
    } else {
        ctx.log(&format!(
            "Section '{}' failed review, following up with {} queries",
            state.section.name,
            feedback.follow_up_queries.len()
        ));
        state.search_queries = feedback.follow_up_queries;
        Ok(SEARCH_WEB)
    }
}

/// Grade the drafted section with the planner model.
async fn grade_section(ctx: &WorkflowContext, state: &SectionState) -> anyhow::Result<Feedback> {
    let config = &ctx.config;

    let system = prompts::section_grader_instructions(
        &state.topic,
        &state.section.description,
        &state.section.content,
        config.number_of_queries,
    );
    let message = "Grade the section and consider follow-up queries for missing information. \
                   If the grade is 'pass', return an empty follow-up query list. If the grade \
                   is 'fail', provide specific search queries to gather the missing information.";

    // Anthropic planners grade with an extended-thinking budget
    let settings = match config.planner_provider.parse::<Provider>() {
        Ok(Provider::Anthropic) => ModelSettings::default()
            .with_max_tokens(GRADER_MAX_TOKENS)
            .with_thinking(ThinkingConfig::enabled(GRADER_THINKING_BUDGET)),
        _ => ModelSettings::default(),
    };

    let grader = init_chat_model(&config.planner_model, &config.planner_provider, settings)?;
    let response = grader.invoke(&system, message).await?;
    parse_feedback(&response)
}

/// Parse the grader's JSON feedback, tolerating surrounding prose or fences.
pub fn parse_feedback(text: &str) -> anyhow::Result<Feedback> {
    let start = text.find('{');
    let end = text.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if end >= start => &text[start..=end],
        _ => anyhow::bail!("grader returned no JSON feedback: {text}"),
    };

    serde_json::from_str(json)
        .map_err(|err| anyhow::anyhow!("failed to parse grader feedback: {err}"))
}

/// Write a non-research section (introduction, FAQ, closing) from the
/// completed sections' content.
pub async fn write_final_section(
    ctx: &WorkflowContext,
    topic: &str,
    section: &mut BlogSection,
    context: &str,
) -> anyhow::Result<()> {
    let config = &ctx.config;

    let system = prompts::final_section_writer_instructions(
        topic,
        &section.name,
        &section.description,
        context,
    );

    let writer = init_chat_model(
        &config.writer_model,
        &config.writer_provider,
        ModelSettings::default().with_temperature(0.0),
    )?;
    section.content =
        writer.invoke(&system, "Generate the section from the provided blog content.").await?;

    ctx.log(&format!("Wrote non-research section '{}'", section.name));
    Ok(())
}

/// Combine all completed sections into the final blog post.
pub async fn combine_blog_sections(
    ctx: &WorkflowContext,
    state: &mut BlogState,
) -> anyhow::Result<()> {
    let config = &ctx.config;

    let sections_str = prompts::completed_sections_context(&state.completed_sections);
    let system = prompts::combine_sections_instructions(&state.topic, &sections_str);

    let writer = init_chat_model(
        &config.writer_model,
        &config.writer_provider,
        ModelSettings::default().with_temperature(0.0),
    )?;
    state.blog_post = writer
        .invoke(
            &system,
            &format!("Combine these sections into a cohesive blog post about {}.", state.topic),
        )
        .await?;

    Ok(())
}
