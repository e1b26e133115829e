//! Grammar providers.
//!
//! A provider hands out a [`GrammarHandle`] for one grammar. The handle is
//! either linked into the binary ([`LinkedGrammar`]) or resolved from a
//! compiled shared library ([`LibraryGrammar`]).

use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use tracing::{debug, trace};
use tree_sitter_language::LanguageFn;

use crate::error::GrammarError;
use crate::handle::GrammarHandle;
use crate::info::GrammarInfo;

/// Signature of the language function a generated parser exports.
type RawLanguageFn = unsafe extern "C" fn() -> *const ();

/// Produces grammar handles.
pub trait GrammarProvider {
	/// Identity of the grammar this provider serves.
	fn info(&self) -> &GrammarInfo;

	/// Obtains a fresh handle to the compiled grammar.
	fn language_handle(&self) -> Result<GrammarHandle, GrammarError>;
}

/// A grammar linked into the current binary.
pub struct LinkedGrammar {
	info: GrammarInfo,
	language: LanguageFn,
}

impl LinkedGrammar {
	pub fn new(info: GrammarInfo, language: LanguageFn) -> Self {
		Self { info, language }
	}
}

impl GrammarProvider for LinkedGrammar {
	fn info(&self) -> &GrammarInfo {
		&self.info
	}

	fn language_handle(&self) -> Result<GrammarHandle, GrammarError> {
		trace!(grammar = %self.info.name, "Obtained linked grammar handle");
		Ok(GrammarHandle::linked(self.language))
	}
}

#[derive(Debug, Clone)]
enum Location {
	Path(PathBuf),
	Search(Vec<PathBuf>),
}

/// A grammar compiled to a shared library.
#[derive(Debug, Clone)]
pub struct LibraryGrammar {
	info: GrammarInfo,
	location: Location,
}

impl LibraryGrammar {
	/// Loads the grammar from an explicit library path.
	pub fn from_path(info: GrammarInfo, path: impl Into<PathBuf>) -> Self {
		Self {
			info,
			location: Location::Path(path.into()),
		}
	}

	/// Loads the grammar from the first directory containing its library.
	pub fn search(info: GrammarInfo, dirs: Vec<PathBuf>) -> Self {
		Self {
			info,
			location: Location::Search(dirs),
		}
	}

	/// Resolves the library file without opening it.
	pub fn locate(&self) -> Result<PathBuf, GrammarError> {
		match &self.location {
			Location::Path(path) if path.is_file() => Ok(path.clone()),
			Location::Path(path) => Err(GrammarError::NotFound(path.display().to_string())),
			Location::Search(dirs) => {
				let file_name = self.info.library_file_name();
				dirs.iter()
					.map(|dir| dir.join(&file_name))
					.find(|candidate| candidate.is_file())
					.ok_or_else(|| GrammarError::NotFound(self.info.name.clone()))
			}
		}
	}

	fn open(&self, path: &Path) -> Result<GrammarHandle, GrammarError> {
		// SAFETY: Loading a tree-sitter grammar from a dynamic library. Grammar
		// libraries have no initialisers beyond the C runtime's.
		let library = unsafe { Library::new(path) }.map_err(|source| GrammarError::LoadError {
			path: path.to_path_buf(),
			source,
		})?;

		let symbol = self.info.symbol();
		// SAFETY: the exported language function takes no arguments and
		// returns a pointer into the library's static data.
		let language = unsafe {
			let language: Symbol<RawLanguageFn> = library
				.get(symbol.as_bytes())
				.map_err(|source| GrammarError::MissingSymbol {
					symbol: symbol.clone(),
					source,
				})?;
			LanguageFn::from_raw(*language)
		};

		// SAFETY: `language` came from `library`, which the handle now owns.
		Ok(unsafe { GrammarHandle::from_library(language, path.to_path_buf(), library) })
	}
}

impl GrammarProvider for LibraryGrammar {
	fn info(&self) -> &GrammarInfo {
		&self.info
	}

	fn language_handle(&self) -> Result<GrammarHandle, GrammarError> {
		let path = self.locate()?;
		debug!(grammar = %self.info.name, path = %path.display(), "Opening grammar library");
		self.open(&path)
	}
}
