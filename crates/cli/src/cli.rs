use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "kulala-grammar")]
#[command(about = "Build and verify the Kulala HTTP tree-sitter grammar")]
#[command(version)]
pub struct Cli {
	/// Grammar config file (uses the built-in config if omitted)
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Check that the compiled grammar loads
	Verify {
		/// Grammar library to load instead of searching
		#[arg(long, short = 'l', value_name = "PATH")]
		library: Option<PathBuf>,
	},
	/// Compile the grammar into a shared library
	Build {
		/// Grammar root or its src/ directory
		#[arg(long, value_name = "DIR")]
		src: Option<PathBuf>,
		/// Output directory (defaults to the grammar cache)
		#[arg(long, short = 'o', value_name = "DIR")]
		out: Option<PathBuf>,
	},
	/// Print the directories searched for the compiled grammar
	Paths,
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn test_cli_definition() {
		Cli::command().debug_assert();
	}

	#[test]
	fn test_about_text() {
		let command = Cli::command();
		assert_eq!(
			command.get_about().map(ToString::to_string).as_deref(),
			Some("Build and verify the Kulala HTTP tree-sitter grammar")
		);
		assert_eq!(command.get_name(), "kulala-grammar");
	}

	#[test]
	fn test_verify_with_library() {
		let cli = Cli::parse_from(["kulala-grammar", "-v", "verify", "--library", "/tmp/lib.so"]);
		assert!(cli.verbose);
		assert!(matches!(
			cli.command,
			Command::Verify { library: Some(ref p) } if p == &PathBuf::from("/tmp/lib.so")
		));
	}

	#[test]
	fn test_global_config_after_subcommand() {
		let cli = Cli::parse_from(["kulala-grammar", "build", "--config", "g.toml"]);
		assert_eq!(cli.config, Some(PathBuf::from("g.toml")));
		assert!(matches!(cli.command, Command::Build { src: None, out: None }));
	}
}
