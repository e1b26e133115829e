//! Grammar compilation into dynamic libraries.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::{GrammarBuildError, Result};
use crate::info::GrammarInfo;

const SOURCES: [&str; 3] = ["parser.c", "scanner.c", "scanner.cc"];

/// Returns the first compiler from `candidates` that executes successfully.
fn find_compiler(candidates: &[&str]) -> Option<String> {
	candidates
		.iter()
		.copied()
		.find(|name| {
			Command::new(name)
				.arg("--version")
				.stdout(Stdio::null())
				.stderr(Stdio::null())
				.status()
				.is_ok()
		})
		.map(str::to_string)
}

/// Resolves the compiler for a grammar, preferring env vars then common names.
fn resolve_compiler(needs_cxx: bool) -> Result<String> {
	if needs_cxx {
		std::env::var("CXX")
			.ok()
			.or_else(|| find_compiler(&["c++", "clang++", "g++"]))
			.ok_or_else(|| {
				GrammarBuildError::Compilation(
					"C++ compiler required for scanner.cc but none found. \
					 Install clang++/g++ or set CXX env var."
						.into(),
				)
			})
	} else {
		std::env::var("CC")
			.ok()
			.or_else(|| find_compiler(&["cc", "clang", "gcc"]))
			.ok_or_else(|| {
				GrammarBuildError::Compilation(
					"C compiler required but none found. Install clang/gcc or set CC env var."
						.into(),
				)
			})
	}
}

/// Status of a build operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
	/// Grammar was already built and up to date.
	AlreadyBuilt(PathBuf),
	/// Grammar was newly built.
	Built(PathBuf),
}

impl BuildStatus {
	pub fn library_path(&self) -> &Path {
		match self {
			Self::AlreadyBuilt(path) | Self::Built(path) => path,
		}
	}
}

/// Finds the directory holding `parser.c`: `dir` itself or `dir/src`.
pub fn resolve_source_dir(dir: &Path) -> Result<PathBuf> {
	[dir.to_path_buf(), dir.join("src")]
		.into_iter()
		.find(|candidate| candidate.join("parser.c").is_file())
		.ok_or_else(|| GrammarBuildError::NoParserSource(dir.to_path_buf()))
}

/// Returns true if any source file is newer than the compiled library.
fn needs_recompile(src_dir: &Path, lib_path: &Path) -> bool {
	let Ok(lib_mtime) = fs::metadata(lib_path).and_then(|m| m.modified()) else {
		return true;
	};

	SOURCES.iter().any(|file| {
		fs::metadata(src_dir.join(file))
			.and_then(|m| m.modified())
			.is_ok_and(|src_mtime| src_mtime > lib_mtime)
	})
}

/// Compiles a tree-sitter grammar into a dynamic library in `lib_dir`.
///
/// Skips compilation if the library is newer than all source files.
///
/// # Errors
///
/// Returns [`GrammarBuildError::NoParserSource`] if `parser.c` is missing,
/// or [`GrammarBuildError::Compilation`] if compilation fails.
pub fn build_grammar(info: &GrammarInfo, src_dir: &Path, lib_dir: &Path) -> Result<BuildStatus> {
	let src_dir = resolve_source_dir(src_dir)?;
	fs::create_dir_all(lib_dir)?;

	let lib_path = lib_dir.join(info.library_file_name());
	debug!(
		grammar = %info.name,
		lib_path = %lib_path.display(),
		lib_exists = lib_path.exists(),
		"Grammar library path"
	);

	if !needs_recompile(&src_dir, &lib_path) {
		return Ok(BuildStatus::AlreadyBuilt(lib_path));
	}

	info!(grammar = %info.name, lib_path = %lib_path.display(), "Compiling grammar");

	let needs_cxx = src_dir.join("scanner.cc").exists();
	let compiler = resolve_compiler(needs_cxx)?;
	link_shared_library(&compiler, &src_dir, &lib_path)?;

	if !lib_path.exists() {
		return Err(GrammarBuildError::Compilation(format!(
			"compilation succeeded but library not found at {}",
			lib_path.display()
		)));
	}

	debug!(grammar = %info.name, lib_path = %lib_path.display(), "Successfully compiled grammar");
	Ok(BuildStatus::Built(lib_path))
}

/// Compiles and links the grammar sources into `lib_path`.
fn link_shared_library(compiler: &str, src_dir: &Path, lib_path: &Path) -> Result<()> {
	let scanner_cc = src_dir.join("scanner.cc");
	let scanner_c = src_dir.join("scanner.c");
	let target = std::env::var("TARGET").unwrap_or_else(|_| host_triple());

	let mut build = cc::Build::new();
	build
		.opt_level(3)
		.debug(false)
		.cargo_metadata(false)
		.warnings(false)
		.host(&target)
		.target(&target)
		.compiler(compiler)
		.cpp(scanner_cc.exists());
	let tool = build
		.try_get_compiler()
		.map_err(|e| GrammarBuildError::Compilation(e.to_string()))?;

	let mut cmd = tool.to_command();

	if tool.is_like_msvc() {
		cmd.args(["/nologo", "/LD", "/utf-8"])
			.arg(format!("/I{}", src_dir.display()))
			.arg(format!("/Fe:{}", lib_path.display()))
			.arg(src_dir.join("parser.c"));

		if scanner_cc.exists() {
			cmd.arg("/std:c++14").arg(&scanner_cc);
		} else if scanner_c.exists() {
			cmd.arg(&scanner_c);
		}
	} else {
		cmd.args(["-shared", "-fPIC", "-fno-exceptions"])
			.arg("-I")
			.arg(src_dir)
			.arg("-o")
			.arg(lib_path)
			.arg(src_dir.join("parser.c"));

		if scanner_cc.exists() {
			cmd.args(["-std=c++14", "-lstdc++"]).arg(&scanner_cc);
		} else if scanner_c.exists() {
			cmd.arg(&scanner_c);
		}

		#[cfg(target_os = "linux")]
		cmd.arg("-Wl,-z,relro,-z,now");
	}

	run_compiler(cmd)
}

fn host_triple() -> String {
	let arch = std::env::consts::ARCH;
	if cfg!(target_os = "macos") {
		format!("{arch}-apple-darwin")
	} else if cfg!(windows) {
		format!("{arch}-pc-windows-msvc")
	} else {
		format!("{arch}-unknown-linux-gnu")
	}
}

fn run_compiler(mut cmd: Command) -> Result<()> {
	let output = cmd
		.output()
		.map_err(|e| GrammarBuildError::Compilation(e.to_string()))?;

	if output.status.success() {
		Ok(())
	} else {
		Err(GrammarBuildError::Compilation(
			String::from_utf8_lossy(&output.stderr).into(),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_missing_parser_source() {
		let dir = tempfile::tempdir().unwrap();
		let out = tempfile::tempdir().unwrap();
		let err = build_grammar(&GrammarInfo::kulala_http(), dir.path(), out.path()).unwrap_err();
		assert!(matches!(err, GrammarBuildError::NoParserSource(p) if p == dir.path()));
	}

	#[test]
	fn test_source_dir_accepts_grammar_root() {
		let dir = tempfile::tempdir().unwrap();
		fs::create_dir(dir.path().join("src")).unwrap();
		fs::write(dir.path().join("src").join("parser.c"), "").unwrap();

		assert_eq!(
			resolve_source_dir(dir.path()).unwrap(),
			dir.path().join("src")
		);
		assert_eq!(
			resolve_source_dir(&dir.path().join("src")).unwrap(),
			dir.path().join("src")
		);
	}

	#[test]
	fn test_up_to_date_library_is_not_rebuilt() {
		let src = tempfile::tempdir().unwrap();
		let out = tempfile::tempdir().unwrap();
		let info = GrammarInfo::kulala_http();
		fs::write(src.path().join("parser.c"), "").unwrap();
		let lib = out.path().join(info.library_file_name());
		fs::write(&lib, "").unwrap();

		let status = build_grammar(&info, src.path(), out.path()).unwrap();
		assert_eq!(status, BuildStatus::AlreadyBuilt(lib));
	}

	#[test]
	fn test_missing_library_needs_recompile() {
		let src = tempfile::tempdir().unwrap();
		assert!(needs_recompile(src.path(), &src.path().join("libnone.so")));
	}
}
