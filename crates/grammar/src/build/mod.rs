//! Grammar compilation.
//!
//! Turns a generated tree-sitter grammar (`src/parser.c` plus an optional
//! external scanner) into a shared library the providers can load.

mod compile;

pub use compile::{BuildStatus, build_grammar, resolve_source_dir};

pub use crate::error::GrammarBuildError;

/// Result type for grammar build operations.
pub type Result<T> = std::result::Result<T, GrammarBuildError>;
