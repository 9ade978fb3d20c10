//! Hooks around the top-level frame of a transaction.

use primitive_types::{H160, U256};
use std::time::Duration;
use yvm_core::ExitReason;

/// Listener for the outermost call or create. Nested frames are not
/// reported.
pub trait Tracer {
	fn capture_start(
		&mut self,
		from: H160,
		to: H160,
		create: bool,
		input: &[u8],
		gas: u64,
		value: U256,
	);

	fn capture_end(&mut self, output: &[u8], gas_used: u64, elapsed: Duration, reason: ExitReason);
}
