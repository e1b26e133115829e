//! Grammar configuration and search directories.
//!
//! The built-in configuration lives in `grammar.toml` next to this crate's
//! manifest. A user file with the same shape replaces it wholesale.
//!
//! Compiled grammars are searched for, in order, in the configured
//! `search-paths`, the directories listed in `KULALA_GRAMMAR_PATH`, the cache
//! directory and the runtime directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::info::GrammarInfo;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../grammar.toml");

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GrammarConfig {
	pub grammar: GrammarSection,
	#[serde(default)]
	pub build: BuildSection,
}

/// `[grammar]`: which grammar to load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GrammarSection {
	pub name: String,
	pub display_name: String,
}

/// `[build]`: where sources and extra libraries live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildSection {
	/// Grammar root or its `src/` directory.
	pub source_dir: Option<PathBuf>,
	/// Searched before the default directories.
	#[serde(default)]
	pub search_paths: Vec<PathBuf>,
}

impl GrammarConfig {
	pub fn parse(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	pub fn info(&self) -> GrammarInfo {
		GrammarInfo::new(&self.grammar.name, &self.grammar.display_name)
	}

	/// Search directories for the compiled grammar, in lookup order.
	pub fn search_paths(&self) -> Vec<PathBuf> {
		let mut dirs = self.build.search_paths.clone();
		dirs.extend(grammar_search_paths());
		dirs
	}

	fn validate(&self) -> Result<(), ConfigError> {
		let name = &self.grammar.name;
		if name.is_empty() {
			return Err(ConfigError::Invalid("grammar name is empty".into()));
		}
		if !name
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
		{
			return Err(ConfigError::Invalid(format!(
				"grammar name {name:?} is not a valid C identifier"
			)));
		}
		Ok(())
	}
}

impl Default for GrammarConfig {
	fn default() -> Self {
		Self {
			grammar: GrammarSection {
				name: crate::info::KULALA_HTTP_NAME.into(),
				display_name: crate::info::KULALA_HTTP_DISPLAY_NAME.into(),
			},
			build: BuildSection::default(),
		}
	}
}

/// Loads the configuration from `path`, or the embedded default.
pub fn load_config(path: Option<&Path>) -> Result<GrammarConfig, ConfigError> {
	match path {
		Some(path) => {
			debug!(path = %path.display(), "Reading grammar config");
			let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
				path: path.to_path_buf(),
				source,
			})?;
			GrammarConfig::parse(&text)
		}
		None => GrammarConfig::parse(DEFAULT_CONFIG),
	}
}

/// Returns the runtime directory: `$KULALA_RUNTIME` or `~/.local/share/kulala/`.
pub fn runtime_dir() -> PathBuf {
	if let Some(runtime) = std::env::var_os("KULALA_RUNTIME") {
		return PathBuf::from(runtime);
	}

	data_local_dir()
		.map(|d| d.join("kulala"))
		.unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the cache directory: `~/.cache/kulala/`.
pub fn cache_dir() -> Option<PathBuf> {
	#[cfg(unix)]
	{
		std::env::var_os("XDG_CACHE_HOME")
			.map(PathBuf::from)
			.or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".cache")))
			.map(|p| p.join("kulala"))
	}
	#[cfg(windows)]
	{
		std::env::var_os("LOCALAPPDATA").map(|p| PathBuf::from(p).join("kulala").join("cache"))
	}
	#[cfg(not(any(unix, windows)))]
	{
		None
	}
}

/// Directory compiled grammars are written to.
pub fn grammar_lib_dir() -> PathBuf {
	cache_dir()
		.unwrap_or_else(runtime_dir)
		.join("grammars")
}

/// Returns the default directories to search for compiled grammar libraries.
pub fn grammar_search_paths() -> Vec<PathBuf> {
	let mut dirs = Vec::new();

	if let Some(paths) = std::env::var_os("KULALA_GRAMMAR_PATH") {
		dirs.extend(std::env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
	}

	if let Some(cache) = cache_dir() {
		dirs.push(cache.join("grammars"));
	}

	dirs.push(runtime_dir().join("grammars"));

	dirs
}

fn data_local_dir() -> Option<PathBuf> {
	#[cfg(unix)]
	{
		std::env::var_os("XDG_DATA_HOME")
			.map(PathBuf::from)
			.or_else(|| {
				std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share"))
			})
	}
	#[cfg(windows)]
	{
		std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
	}
	#[cfg(not(any(unix, windows)))]
	{
		None
	}
}
