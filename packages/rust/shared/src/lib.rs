//! Shared types, error model, configuration, and persisted state for LeetTutor.
//!
//! This crate is the foundation depended on by all other LeetTutor crates.
//! It provides:
//! - [`LeetTutorError`], the unified error type
//! - Domain types ([`ProblemRecord`], [`DatasetFallbackRecord`], [`ContentBlock`])
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)
//! - Persisted process-wide state ([`AppState`], [`StateStore`])
//! - Best-effort parsing of embedded JSON fields ([`parse_embedded`], [`recover`])

pub mod config;
pub mod error;
pub mod parse;
pub mod state;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ApiConfig, AppConfig, ConversionMode, DatasetConfig, FetchConfig, NotebookConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{LeetTutorError, Result};
pub use parse::{parse_embedded, recover};
pub use state::{AppState, StateStore};
pub use types::{
    CodeSnippet, ContentBlock, DatasetFallbackRecord, DependencyFinding, DocumentHandle,
    ExampleCase, ProblemRecord, ProblemStats, SimilarQuestion, TestSpec, TopicTag,
};
