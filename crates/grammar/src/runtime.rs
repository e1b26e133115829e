//! Language construction.
//!
//! [`LanguageRuntime`] is the parsing framework's entry point: it turns an
//! opaque [`GrammarHandle`] into a [`LanguageObject`] or refuses it.

use std::marker::PhantomData;

use tracing::debug;
use tree_sitter::Grammar;
use tree_sitter_language::LanguageFn;

use crate::error::GrammarError;
use crate::handle::GrammarHandle;
use crate::info::GrammarInfo;

/// Error tree-sitter reports when building a [`Grammar`] from a language function.
type GrammarDataError = <Grammar as TryFrom<LanguageFn>>::Error;

/// A grammar the runtime has accepted.
///
/// Borrows the handle it was built from: a library grammar's tables live in
/// the library the handle owns.
#[derive(Debug)]
pub struct LanguageObject<'h> {
	pub name: String,
	pub abi_version: u32,
	pub grammar: Grammar,
	_handle: PhantomData<&'h GrammarHandle>,
}

/// Constructs language objects from grammar handles.
pub trait LanguageRuntime {
	fn language<'h>(
		&self,
		info: &GrammarInfo,
		handle: &'h GrammarHandle,
	) -> Result<LanguageObject<'h>, GrammarError>;
}

/// The tree-sitter runtime.
///
/// Hands the handle's language function to tree-sitter, which checks the
/// table's ABI version against the range its vendored C runtime supports.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterRuntime;

impl LanguageRuntime for TreeSitterRuntime {
	fn language<'h>(
		&self,
		info: &GrammarInfo,
		handle: &'h GrammarHandle,
	) -> Result<LanguageObject<'h>, GrammarError> {
		// tree-sitter assumes a non-null table.
		if handle.is_null() {
			return Err(GrammarError::NullHandle);
		}

		let grammar = Grammar::try_from(handle.language_fn()).map_err(|e| match e {
			GrammarDataError::IncompatibleVersion { version } => {
				GrammarError::IncompatibleAbi { version }
			}
			other => GrammarError::Rejected(other.to_string()),
		})?;
		let abi_version = grammar.abi_version();

		debug!(grammar = %info.name, abi_version, origin = ?handle.origin(), "Constructed language");
		Ok(LanguageObject {
			name: info.name.clone(),
			abi_version,
			grammar,
			_handle: PhantomData,
		})
	}
}
