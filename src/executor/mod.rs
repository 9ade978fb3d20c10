//! Call and create dispatch.

mod builder;
mod engine;

pub use self::builder::EngineBuilder;
pub use self::engine::Engine;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag of an [`Engine`]. It can be cloned and set from
/// any thread; the interpreter polls it before every step.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
	pub fn abort(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_aborted(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}
}
