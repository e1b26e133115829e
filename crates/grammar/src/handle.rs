//! The opaque grammar handle passed from a provider to the runtime.

use std::fmt;
use std::path::{Path, PathBuf};

use libloading::Library;
use tree_sitter_language::LanguageFn;

/// Where a handle's language function lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOrigin {
	/// Linked into the current binary.
	Linked,
	/// Exported by a shared library at the given path.
	Library(PathBuf),
}

/// A grammar's language function, as handed to the runtime.
///
/// A handle that came from a shared library owns that library, so the
/// function and the table it returns stay valid for as long as the handle is
/// alive.
pub struct GrammarHandle {
	language: LanguageFn,
	origin: HandleOrigin,
	// Never read; keeps `language` mapped.
	_library: Option<Library>,
}

impl GrammarHandle {
	/// Wraps the language function of a linked grammar.
	pub fn linked(language: LanguageFn) -> Self {
		Self {
			language,
			origin: HandleOrigin::Linked,
			_library: None,
		}
	}

	/// Wraps a language function exported by `library`.
	///
	/// # Safety
	///
	/// `language` must point into `library`, which must have been opened from
	/// `path`.
	pub(crate) unsafe fn from_library(language: LanguageFn, path: PathBuf, library: Library) -> Self {
		Self {
			language,
			origin: HandleOrigin::Library(path),
			_library: Some(library),
		}
	}

	/// True when the language function returns no table.
	pub fn is_null(&self) -> bool {
		// SAFETY: `LanguageFn` is only built from tree-sitter language functions,
		// which take no arguments and return a static pointer.
		unsafe { (self.language.into_raw())().is_null() }
	}

	pub fn origin(&self) -> &HandleOrigin {
		&self.origin
	}

	/// Path of the backing shared library, if any.
	pub fn library_path(&self) -> Option<&Path> {
		match &self.origin {
			HandleOrigin::Library(path) => Some(path),
			HandleOrigin::Linked => None,
		}
	}

	pub(crate) fn language_fn(&self) -> LanguageFn {
		self.language
	}
}

impl fmt::Debug for GrammarHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GrammarHandle")
			.field("language", &(self.language.into_raw() as *const ()))
			.field("origin", &self.origin)
			.finish()
	}
}
