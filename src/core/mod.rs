//! Core types and functionality for Blogsmith.
//!
//! This module contains the fundamental pieces shared by the pipeline:
//! run configuration and the progress logger shim.

mod config;
pub mod logger;

pub use config::{ConfigError, Configuration};
pub use logger::{clear_logger, log, logger, set_logger, LogCallback};
