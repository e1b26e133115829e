//! Grammar identity.

/// Machine name the grammar was generated with.
pub const KULALA_HTTP_NAME: &str = "kulala_http";

/// Name used in user-facing messages.
pub const KULALA_HTTP_DISPLAY_NAME: &str = "Kulala HTTP";

/// Names a tree-sitter grammar and derives its exported symbol and library file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarInfo {
	pub name: String,
	pub display_name: String,
}

impl GrammarInfo {
	pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			display_name: display_name.into(),
		}
	}

	pub fn kulala_http() -> Self {
		Self::new(KULALA_HTTP_NAME, KULALA_HTTP_DISPLAY_NAME)
	}

	/// Identifier safe for C symbols and file names.
	pub fn safe_name(&self) -> String {
		self.name.replace('-', "_")
	}

	/// The language function exported by the generated parser.
	pub fn symbol(&self) -> String {
		format!("tree_sitter_{}", self.safe_name())
	}

	/// Platform-specific library file name for the compiled grammar.
	pub fn library_file_name(&self) -> String {
		format!(
			"{}{}.{}",
			library_prefix(),
			self.safe_name(),
			library_extension()
		)
	}
}

impl Default for GrammarInfo {
	fn default() -> Self {
		Self::kulala_http()
	}
}

fn library_prefix() -> &'static str {
	if cfg!(windows) { "" } else { "lib" }
}

/// Shared library extension for the current platform.
pub fn library_extension() -> &'static str {
	if cfg!(target_os = "macos") {
		"dylib"
	} else if cfg!(windows) {
		"dll"
	} else {
		"so"
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_symbol_replaces_dashes() {
		let info = GrammarInfo::new("kulala-http", "Kulala HTTP");
		assert_eq!(info.symbol(), "tree_sitter_kulala_http");
		assert_eq!(GrammarInfo::kulala_http().symbol(), "tree_sitter_kulala_http");
	}

	#[test]
	fn test_library_file_name() {
		let name = GrammarInfo::kulala_http().library_file_name();
		#[cfg(target_os = "linux")]
		assert_eq!(name, "libkulala_http.so");
		#[cfg(target_os = "macos")]
		assert_eq!(name, "libkulala_http.dylib");
		#[cfg(target_os = "windows")]
		assert_eq!(name, "kulala_http.dll");
	}
}
