//! # Blogsmith
//!
//! LLM-backed blog drafting pipeline - plan, research, write, and assemble
//! blog posts from the terminal.
//!
//! Blogsmith plans a section outline for a topic, gathers supporting
//! material through web search, writes and grades each section with hosted
//! chat models, and combines the results into a single post following a
//! fixed content outline.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install
//! cargo install blogsmith
//!
//! # Draft a post
//! blogsmith generate "Why Rust for network services"
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod ai;
pub mod core;
pub mod diagram;
pub mod prompts;
pub mod search;
pub mod workflow;

pub use ai::{init_chat_model, ChatModel, ModelError, ModelSettings, Provider, ThinkingConfig};
pub use crate::core::{ConfigError, Configuration};
pub use diagram::{generate_card_diagram, parse_text_to_entries, DiagramEntry};
pub use search::{multi_search, QuerySearch, SearchProviderKind, SearchResult};
pub use workflow::{generate_blog, BlogSection, BlogState, NodeStatus, SearchStatus, END};
