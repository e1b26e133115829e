#![allow(unused_crate_dependencies)]

use std::error::Error;
use std::fs;
use std::path::Path;

use kulala_grammar::{
	BuildStatus, GrammarError, GrammarInfo, LibraryGrammar, Pass, Verifier, VerifyState,
	build_grammar,
};

/// A parser exporting a language table with just the leading ABI fields.
const PARSER: &str = r#"
#include <stdint.h>

typedef struct {
	uint32_t abi_version;
	uint32_t symbol_count;
} TSLanguage;

static const TSLanguage language = {14, 1};

const TSLanguage *tree_sitter_kulala_http(void) {
	return &language;
}
"#;

/// Same table, exported under another grammar's name.
const PARSER_WRONG_SYMBOL: &str = r#"
#include <stdint.h>

typedef struct {
	uint32_t abi_version;
	uint32_t symbol_count;
} TSLanguage;

static const TSLanguage language = {14, 1};

const TSLanguage *tree_sitter_other(void) {
	return &language;
}
"#;

fn compile(parser: &str, src: &Path, out: &Path) -> BuildStatus {
	fs::write(src.join("parser.c"), parser).unwrap();
	build_grammar(&GrammarInfo::kulala_http(), src, out).unwrap()
}

#[test]
fn test_compiled_library_loads() {
	let src = tempfile::tempdir().unwrap();
	let out = tempfile::tempdir().unwrap();
	let info = GrammarInfo::kulala_http();

	let status = compile(PARSER, src.path(), out.path());
	let path = out.path().join(info.library_file_name());
	assert_eq!(status, BuildStatus::Built(path.clone()));

	let mut verifier = Verifier::new(LibraryGrammar::from_path(info.clone(), &path));
	assert_eq!(verifier.run().unwrap(), Pass { abi_version: 14 });
	assert_eq!(verifier.state(), VerifyState::Passed);

	let mut searched = Verifier::new(LibraryGrammar::search(
		info.clone(),
		vec![src.path().to_path_buf(), out.path().to_path_buf()],
	));
	assert_eq!(searched.run().unwrap(), Pass { abi_version: 14 });

	let rebuilt = build_grammar(&info, src.path(), out.path()).unwrap();
	assert_eq!(rebuilt, BuildStatus::AlreadyBuilt(path));
}

#[test]
fn test_library_without_language_function_fails() {
	let src = tempfile::tempdir().unwrap();
	let out = tempfile::tempdir().unwrap();
	let status = compile(PARSER_WRONG_SYMBOL, src.path(), out.path());

	let mut verifier = Verifier::new(LibraryGrammar::from_path(
		GrammarInfo::kulala_http(),
		status.library_path(),
	));
	let err = verifier.run().unwrap_err();
	assert_eq!(err.to_string(), "Error loading Kulala HTTP grammar");
	assert_eq!(verifier.state(), VerifyState::Failed);
	assert!(matches!(
		&err.cause,
		GrammarError::MissingSymbol { symbol, .. } if symbol == "tree_sitter_kulala_http"
	));
	assert!(err.cause.source().is_some());
}
