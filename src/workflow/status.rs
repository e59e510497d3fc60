//! Workflow state vocabulary.
//!
//! Status labels for pipeline nodes and search outcomes, plus the terminal
//! routing marker consumed by the section write/grade loop.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel routing target denoting workflow completion.
pub const END: &str = "END";

/// Lifecycle stage of a single workflow node.
///
/// Nodes move waiting -> processing -> completed or failed; the engine uses
/// these labels for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Waiting,
    Processing,
    Completed,
    Failed,
}

impl NodeStatus {
    /// Lowercase label, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome classification of a single search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    /// The search returned results
    Success,
    /// The search succeeded but returned no results
    Partial,
    /// The search request failed
    Failed,
}

impl SearchStatus {
    /// Lowercase label, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
