//! Error types for grammar loading, building and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Why a grammar handle could not be obtained or was refused by the runtime.
#[derive(Error, Debug)]
pub enum GrammarError {
	/// Grammar library not found in any search path.
	#[error("grammar not found: {0}")]
	NotFound(String),

	/// Failed to open the dynamic library.
	#[error("failed to load grammar library {path}: {source}")]
	LoadError {
		path: PathBuf,
		#[source]
		source: libloading::Error,
	},

	/// Library opened but does not export the language function.
	#[error("grammar library missing language function {symbol}: {source}")]
	MissingSymbol {
		symbol: String,
		#[source]
		source: libloading::Error,
	},

	/// The language function returned a null table.
	#[error("grammar handle is null")]
	NullHandle,

	/// Language table was generated for an ABI this runtime cannot load.
	#[error("incompatible grammar ABI version {version}")]
	IncompatibleAbi { version: u32 },

	/// The tree-sitter runtime refused the grammar.
	#[error("tree-sitter rejected grammar: {0}")]
	Rejected(String),

	/// Language construction panicked.
	#[error("language construction panicked: {0}")]
	Panicked(String),

	/// Filesystem I/O error.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// The single failure reported by the load verifier.
///
/// The message is fixed per grammar; the underlying [`GrammarError`] is kept
/// as the error source.
#[derive(Error, Debug)]
#[error("Error loading {grammar} grammar")]
pub struct GrammarLoadError {
	pub grammar: String,
	#[source]
	pub cause: GrammarError,
}

impl GrammarLoadError {
	pub fn new(grammar: impl Into<String>, cause: GrammarError) -> Self {
		Self {
			grammar: grammar.into(),
			cause,
		}
	}
}

/// Errors that can occur while compiling a grammar.
#[derive(Debug, Error)]
pub enum GrammarBuildError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("compilation failed: {0}")]
	Compilation(String),
	#[error("no parser.c found in {0}")]
	NoParserSource(PathBuf),
	#[error("no grammar source directory configured")]
	NoSourceDir,
}

/// Errors that can occur while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse grammar config: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("invalid grammar config: {0}")]
	Invalid(String),
}
