use crate::{Contract, ExitReason, ExitSucceed, Handler, Runtime};
use std::rc::Rc;

/// An executor for some family of code blobs. The engine hands each frame
/// to the first installed interpreter that accepts its code.
pub trait Interpreter {
	/// Whether this interpreter understands `code`.
	fn can_run(&self, code: &[u8]) -> bool;

	/// Execute `contract` with `input`, charging gas to the contract. The
	/// output is the data returned or reverted with, empty otherwise.
	fn run(
		&self,
		handler: &mut dyn Handler,
		contract: &mut Contract,
		input: &[u8],
	) -> (ExitReason, Vec<u8>);
}

/// The stack machine interpreter for plain bytecode.
#[derive(Clone, Debug)]
pub struct BytecodeInterpreter {
	stack_limit: usize,
	memory_limit: usize,
}

impl BytecodeInterpreter {
	pub fn new(stack_limit: usize, memory_limit: usize) -> Self {
		Self {
			stack_limit,
			memory_limit,
		}
	}
}

impl Default for BytecodeInterpreter {
	fn default() -> Self {
		Self::new(1024, usize::MAX)
	}
}

impl Interpreter for BytecodeInterpreter {
	fn can_run(&self, _code: &[u8]) -> bool {
		true
	}

	fn run(
		&self,
		handler: &mut dyn Handler,
		contract: &mut Contract,
		input: &[u8],
	) -> (ExitReason, Vec<u8>) {
		if contract.code.is_empty() {
			return (ExitSucceed::Stopped.into(), Vec::new());
		}

		let config = handler.gas_config().clone();
		let mut runtime = Runtime::new(
			contract,
			Rc::new(input.to_vec()),
			&config,
			self.stack_limit,
			self.memory_limit,
		);
		let reason = runtime.run(handler);
		let output = match reason {
			ExitReason::Succeed(ExitSucceed::Returned) | ExitReason::Revert(_) => {
				runtime.machine().return_value()
			}
			_ => Vec::new(),
		};

		log::trace!(
			target: "yvm",
			"frame {:?} exited with {:?}, {} gas left",
			runtime.contract().address,
			reason,
			runtime.contract().gas,
		);

		(reason, output)
	}
}
