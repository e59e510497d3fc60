//! Blogsmith - LLM-backed blog drafting from the terminal.
//!
//! Plans a section outline for a topic, researches it through web search,
//! writes and grades each section, and assembles the final post.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use serde_json::{json, Value};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use blogsmith::diagram::{generate_card_diagram, DiagramEntry};
use blogsmith::workflow::generate_blog;
use blogsmith::Configuration;

/// Draft blog posts with LLM planning, web research, and grading
#[derive(Parser)]
#[command(name = "blogsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a blog post for a topic
    Generate {
        /// Blog topic
        topic: String,

        /// Configuration file to use instead of the default lookup
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of blog sections to plan
        #[arg(long)]
        sections: Option<u32>,

        /// Number of search queries per section
        #[arg(long)]
        queries: Option<u32>,

        /// Maximum search iterations per section
        #[arg(long)]
        search_depth: Option<u32>,

        /// Planner model provider (openai, anthropic)
        #[arg(long)]
        planner_provider: Option<String>,

        /// Planner model name
        #[arg(long)]
        planner_model: Option<String>,

        /// Writer model provider (openai, anthropic)
        #[arg(long)]
        writer_provider: Option<String>,

        /// Writer model name
        #[arg(long)]
        writer_model: Option<String>,

        /// Search provider (tavily, perplexity)
        #[arg(long)]
        search_provider: Option<String>,

        /// Write the post to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        operation: ConfigOperation,
    },

    /// Render a sample card diagram (debug entry point)
    Diagram {
        /// Output SVG path
        #[arg(short, long, default_value = "diagram.svg")]
        output: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigOperation {
    /// Show the resolved configuration
    Show,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    match cli.command {
        Commands::Generate {
            topic,
            config,
            sections,
            queries,
            search_depth,
            planner_provider,
            planner_model,
            writer_provider,
            writer_model,
            search_provider,
            output,
        } => {
            let overrides = build_overrides(
                config.as_ref(),
                &[
                    ("number_of_blog_sections", sections.map(Value::from)),
                    ("number_of_queries", queries.map(Value::from)),
                    ("max_search_depth", search_depth.map(Value::from)),
                    ("planner_provider", planner_provider.map(Value::from)),
                    ("planner_model", planner_model.map(Value::from)),
                    ("writer_provider", writer_provider.map(Value::from)),
                    ("writer_model", writer_model.map(Value::from)),
                    ("searcher_provider", search_provider.map(Value::from)),
                ],
            )?;
            cmd_generate(&topic, &overrides, output.as_ref())?;
        }
        Commands::Config { operation: ConfigOperation::Show } => {
            cmd_config_show()?;
        }
        Commands::Diagram { output } => {
            cmd_diagram(&output);
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// Merge the file configuration and CLI flags into an override map.
fn build_overrides(
    config_path: Option<&PathBuf>,
    flags: &[(&str, Option<Value>)],
) -> Result<Value> {
    let base = match config_path {
        Some(path) => Configuration::load_from_file(path)?,
        None => Configuration::load()?,
    };

    let mut configurable = base.to_map();
    for (key, value) in flags {
        if let Some(value) = value {
            configurable.insert((*key).to_string(), value.clone());
        }
    }

    Ok(json!({ "configurable": configurable }))
}

fn cmd_generate(topic: &str, overrides: &Value, output: Option<&PathBuf>) -> Result<()> {
    println!("Drafting blog post for '{topic}'...\n");

    let rt = tokio::runtime::Runtime::new()?;
    let post = rt.block_on(async { generate_blog(topic, Some(overrides), None).await })?;

    match output {
        Some(path) => {
            std::fs::write(path, &post)?;
            println!("\nWrote blog post to {}", path.display());
        }
        None => println!("\n{post}"),
    }

    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = Configuration::load()?;
    println!("{}", serde_json::to_string_pretty(&Value::Object(config.to_map()))?);
    Ok(())
}

/// Exercise the diagram generator with fixed sample data.
fn cmd_diagram(output: &PathBuf) {
    let entries = vec![
        DiagramEntry::new("Test 1", "Test content 1"),
        DiagramEntry::new("Test 2", "Test content 2"),
    ];

    println!("Rendering sample diagram with {} entries...", entries.len());
    match generate_card_diagram(&entries, output) {
        Ok(path) => println!("Diagram written to {}", path.display()),
        Err(err) => println!("Diagram generation failed: {err}"),
    }
}

fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "blogsmith", &mut io::stdout());
}
