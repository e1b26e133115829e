//! Kulala HTTP grammar tool.
//!
//! Builds the tree-sitter grammar into a shared library and checks that the
//! result loads.

mod cli;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use kulala_grammar::build::GrammarBuildError;
use kulala_grammar::config::grammar_lib_dir;
use kulala_grammar::{
	BuildStatus, GrammarConfig, LibraryGrammar, Verifier, build_grammar, load_config,
};
use tracing::info;

use crate::cli::{Cli, Command};

fn main() -> Result<ExitCode, Box<dyn Error>> {
	let cli = Cli::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if cli.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config = load_config(cli.config.as_deref())?;

	match cli.command {
		Command::Verify { library } => Ok(verify(&config, library)),
		Command::Build { src, out } => {
			build(&config, src, out)?;
			Ok(ExitCode::SUCCESS)
		}
		Command::Paths => {
			for dir in config.search_paths() {
				println!("{}", dir.display());
			}
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn verify(config: &GrammarConfig, library: Option<PathBuf>) -> ExitCode {
	let info = config.info();
	let provider = match library {
		Some(path) => LibraryGrammar::from_path(info, path),
		None => LibraryGrammar::search(info, config.search_paths()),
	};

	let mut verifier = Verifier::new(provider);
	match verifier.run() {
		Ok(pass) => {
			println!(
				"ok: {} grammar loads (ABI {})",
				config.grammar.display_name, pass.abi_version
			);
			ExitCode::SUCCESS
		}
		Err(err) => {
			println!("FAILED: {err}");
			let mut source = err.source();
			while let Some(cause) = source {
				println!("  caused by: {cause}");
				source = cause.source();
			}
			ExitCode::FAILURE
		}
	}
}

fn build(
	config: &GrammarConfig,
	src: Option<PathBuf>,
	out: Option<PathBuf>,
) -> Result<(), GrammarBuildError> {
	let src = src
		.or_else(|| config.build.source_dir.clone())
		.ok_or(GrammarBuildError::NoSourceDir)?;
	let out = out.unwrap_or_else(grammar_lib_dir);
	info!(src = %src.display(), out = %out.display(), "Building grammar");

	match build_grammar(&config.info(), &src, &out)? {
		BuildStatus::Built(path) => println!("built {}", path.display()),
		BuildStatus::AlreadyBuilt(path) => println!("up to date {}", path.display()),
	}
	Ok(())
}
