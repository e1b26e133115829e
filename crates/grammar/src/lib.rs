// Grammar operations report through tracing; stderr belongs to the caller.
#![deny(clippy::print_stderr)]

//! Loading and load verification for the Kulala HTTP tree-sitter grammar.
//!
//! The grammar itself is generated by the tree-sitter toolchain and compiled
//! from `parser.c`. This crate answers one question about the compiled
//! artifact: does the tree-sitter runtime accept it?
//!
//! # Architecture
//!
//! * [`info`]: Grammar identity (name, display name, exported symbol)
//! * [`handle`]: The opaque [`GrammarHandle`] handed from provider to runtime
//! * [`provider`]: Where handles come from (linked in, or a shared library)
//! * [`runtime`]: Construction of a [`LanguageObject`] from a handle
//! * [`verify`]: The load check and its outcome
//! * [`config`]: Configuration file and search directories
//! * [`build`]: Compiling grammar sources into a shared library

pub mod build;
pub mod config;
pub mod error;
pub mod handle;
pub mod info;
pub mod provider;
pub mod runtime;
pub mod verify;

pub use build::{BuildStatus, build_grammar};
pub use config::{GrammarConfig, grammar_search_paths, load_config};
pub use error::{ConfigError, GrammarBuildError, GrammarError, GrammarLoadError};
pub use handle::{GrammarHandle, HandleOrigin};
pub use info::{GrammarInfo, KULALA_HTTP_DISPLAY_NAME, KULALA_HTTP_NAME};
pub use provider::{GrammarProvider, LibraryGrammar, LinkedGrammar};
pub use runtime::{LanguageObject, LanguageRuntime, TreeSitterRuntime};
pub use verify::{Pass, VerifyState, Verifier, verify_grammar_loads};

