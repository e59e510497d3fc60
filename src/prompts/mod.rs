//! Prompt templates for the blog generation pipeline.
//!
//! Each builder renders the system instructions for one pipeline node. The
//! templates assume the fixed five-step outline in
//! [`DEFAULT_BLOG_STRUCTURE`].

use crate::workflow::state::BlogSection;

/// The fixed content outline every generated post follows.
pub const DEFAULT_BLOG_STRUCTURE: &str = "\
Use this structure to create the blog post:

1. Opening: a title, a hooking phrase, a short greeting, and a table of
   contents with six items.
2. Body (items 1-3): each section at least 200 characters; the second
   section includes a table, the third a list.
3. Body (items 4-6): each section at least 200 characters; the fifth
   section includes a table, the sixth a list.
4. FAQ: six question/answer pairs.
5. Closing: a short finishing statement, optionally with a call to action
   and tags.";

/// System instructions for planning the section outline.
pub fn section_planner_instructions(topic: &str, num_sections: u32) -> String {
    format!(
        "You are an expert technical writer planning a blog post.

<Blog topic>
{topic}
</Blog topic>

<Blog organization>
{DEFAULT_BLOG_STRUCTURE}
</Blog organization>

<Task>
Generate a plan of {num_sections} sections for the blog post. Respond with a
numbered list; each item starts with a short, descriptive section name on
its own line, followed by a description of what the section covers.

- Keep the plan tight and focused with no overlapping sections or filler.
- Introductions, conclusions, and summaries are written from the other
  sections later and need no web research; say so in their descriptions.
- Avoid duplicate headings such as multiple conclusion sections.
</Task>"
    )
}

/// System instructions for generating section search queries.
pub fn query_writer_instructions(
    topic: &str,
    section_topic: &str,
    section_description: &str,
    num_queries: u32,
) -> String {
    format!(
        "You are an expert technical writer crafting targeted web search \
queries to gather comprehensive information for a specific blog section.

<Blog topic>
{topic}
</Blog topic>

<Section topic>
{section_topic}
</Section topic>

<Section description>
{section_description}
</Section description>

<Task>
Generate {num_queries} search queries that will help gather comprehensive
information on the section topic. Respond with one query per line and
nothing else.

The queries should:
1. Be closely related to the topic.
2. Address different aspects of the section topic.
3. Avoid duplicate or overly generic queries.
</Task>"
    )
}

/// System instructions for drafting a researched section.
pub fn section_writer_instructions() -> String {
    "Write one section of a blog post.

<Task>
1. Review the blog topic, the section name, and the section description.
2. If present, check any existing content for this section.
3. Examine the provided source material to support your writing.
4. Write the section content, honoring required tables or lists.
5. Conclude with a ### Sources list referencing the URLs you used.
</Task>

<Writing Guidelines>
- Each main section must have at least 200 characters.
- Use simple, clear language and short paragraphs.
- Use a Markdown heading for the section title (e.g. \"## Section name\").
- Do NOT write a concluding statement for the entire blog; the closing
  happens in its own section.
</Writing Guidelines>

<Citation Rules>
- Assign each unique URL a single citation number in your text.
- End the section with ### Sources, listing each source with its number.
- Number sources sequentially without gaps (1, 2, 3, ...).
- Example format:
  [1] Source Title: URL
  [2] Source Title: URL
</Citation Rules>"
        .to_string()
}

/// User-message inputs accompanying [`section_writer_instructions`].
pub fn section_writer_inputs(
    topic: &str,
    section_name: &str,
    section_topic: &str,
    context: &str,
    section_content: &str,
) -> String {
    format!(
        "<Blog topic>
{topic}
</Blog topic>

<Section name>
{section_name}
</Section name>

<Section topic>
{section_topic}
</Section topic>

<Existing section content (if populated)>
{section_content}
</Existing section content>

<Source material>
{context}
</Source material>"
    )
}

/// System instructions for grading a drafted section.
pub fn section_grader_instructions(
    topic: &str,
    section_topic: &str,
    section: &str,
    number_of_follow_up_queries: u32,
) -> String {
    format!(
        "Review a blog post section relative to the specified topic:

<Blog topic>
{topic}
</Blog topic>

<Section topic>
{section_topic}
</Section topic>

<Section content>
{section}
</Section content>

<Task>
Check whether this section meets the blog structure requirements: length of
at least 200 characters, required tables or lists, and no duplication of
the blog's overall conclusion.

If the content is lacking information, generate
{number_of_follow_up_queries} follow-up web search queries.
</Task>

<Format>
Respond with a JSON object and nothing else:
{{\"grade\": \"pass\" or \"fail\", \"feedback\": \"...\", \"follow_up_queries\": [\"...\"]}}
If the grade is \"pass\", return an empty follow_up_queries list.
</Format>"
    )
}

/// System instructions for sections written without research.
pub fn final_section_writer_instructions(
    topic: &str,
    section_name: &str,
    section_topic: &str,
    context: &str,
) -> String {
    format!(
        "You are an expert technical writer completing the non-research parts \
of a blog post, such as the introduction, FAQ, or closing statement.

<Blog topic>
{topic}
</Blog topic>

<Section name>
{section_name}
</Section name>

<Section topic>
{section_topic}
</Section topic>

<Available blog content>
{context}
</Available blog content>

<Task>
Write this section from the available blog content rather than outside
research.

- For an FAQ: provide exactly six question/answer pairs, each concise but
  informative.
- For a closing statement: 100-150 words wrapping up the post, optionally
  with a brief call to action and up to ten #tags at the very end.
- For an introduction: set up the post without duplicating body content.
- Do NOT add a sources section.
</Task>"
    )
}

/// System instructions for combining completed sections into the final post.
pub fn combine_sections_instructions(topic: &str, sections: &str) -> String {
    format!(
        "You are assembling the final version of a blog post.

<Blog topic>
{topic}
</Blog topic>

<Completed sections>
{sections}
</Completed sections>

<Task>
Combine the completed sections into one cohesive blog post in Markdown.
Keep the section order and content; smooth transitions where needed; remove
duplicated headings or repeated concluding statements; keep each section's
sources with that section.
</Task>"
    )
}

/// Render completed sections as context for combination.
pub fn completed_sections_context(sections: &[BlogSection]) -> String {
    sections
        .iter()
        .map(|section| format!("### {}\n{}", section.name, section.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
