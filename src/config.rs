/// Engine configuration. Gas pricing is not part of it; that follows the
/// chain rules of the block.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
	feature = "with-serde",
	derive(serde::Serialize, serde::Deserialize),
	serde(default)
)]
pub struct Config {
	/// Call the tracer at the top-level frame boundary.
	pub debug: bool,
	/// Nested calls and creates succeed without running anything.
	pub no_recursion: bool,
	/// Keep SHA3 inputs in the state.
	pub enable_preimage_recording: bool,
	/// Stack limit.
	pub stack_limit: usize,
	/// Memory limit.
	pub memory_limit: usize,
	/// Call stack limit.
	pub call_stack_limit: usize,
	/// Largest code a create may deploy once EIP-158 is active.
	pub max_code_size: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			debug: false,
			no_recursion: false,
			enable_preimage_recording: false,
			stack_limit: 1024,
			memory_limit: usize::MAX,
			call_stack_limit: 1024,
			max_code_size: 24576,
		}
	}
}
