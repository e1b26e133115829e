//! Grammar load verification.
//!
//! Obtains a handle from a [`GrammarProvider`], asks a [`LanguageRuntime`] to
//! construct a language from it, and reports the outcome. Every failure,
//! including a panic inside the runtime, becomes one [`GrammarLoadError`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::error::{GrammarError, GrammarLoadError};
use crate::provider::GrammarProvider;
use crate::runtime::{LanguageRuntime, TreeSitterRuntime};

/// A successful load check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pass {
	/// ABI version of the accepted language table.
	pub abi_version: u32,
}

/// Outcome of the most recent check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyState {
	#[default]
	NotRun,
	Passed,
	Failed,
}

/// Checks that `provider`'s grammar is accepted by `runtime`.
///
/// The language object is dropped before returning, together with the handle.
pub fn verify_grammar_loads<P, R>(provider: &P, runtime: &R) -> Result<Pass, GrammarLoadError>
where
	P: GrammarProvider + ?Sized,
	R: LanguageRuntime + ?Sized,
{
	let info = provider.info();
	debug!(grammar = %info.name, "Verifying grammar loads");

	let result = provider.language_handle().and_then(|handle| {
		debug!(grammar = %info.name, origin = ?handle.origin(), "Obtained grammar handle");
		panic::catch_unwind(AssertUnwindSafe(|| {
			runtime.language(info, &handle).map(|language| Pass {
				abi_version: language.abi_version,
			})
		}))
		.unwrap_or_else(|payload| Err(GrammarError::Panicked(panic_message(payload))))
	});

	result.map_err(|cause| {
		warn!(grammar = %info.name, error = %cause, "Grammar failed to load");
		GrammarLoadError::new(info.display_name.clone(), cause)
	})
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
	match payload.downcast::<String>() {
		Ok(message) => *message,
		Err(payload) => payload
			.downcast_ref::<&str>()
			.map(|s| (*s).to_string())
			.unwrap_or_else(|| "non-string panic payload".to_string()),
	}
}

/// Runs the load check and remembers its outcome.
pub struct Verifier<P, R = TreeSitterRuntime> {
	provider: P,
	runtime: R,
	state: VerifyState,
}

impl<P: GrammarProvider> Verifier<P> {
	pub fn new(provider: P) -> Self {
		Self::with_runtime(provider, TreeSitterRuntime)
	}
}

impl<P: GrammarProvider, R: LanguageRuntime> Verifier<P, R> {
	pub fn with_runtime(provider: P, runtime: R) -> Self {
		Self {
			provider,
			runtime,
			state: VerifyState::NotRun,
		}
	}

	pub fn state(&self) -> VerifyState {
		self.state
	}

	pub fn provider(&self) -> &P {
		&self.provider
	}

	/// Runs the check with a fresh handle.
	pub fn run(&mut self) -> Result<Pass, GrammarLoadError> {
		let result = verify_grammar_loads(&self.provider, &self.runtime);
		self.state = match result {
			Ok(_) => VerifyState::Passed,
			Err(_) => VerifyState::Failed,
		};
		result
	}
}
