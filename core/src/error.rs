use crate::Opcode;

/// Capture represents the result of execution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Capture<E, T> {
	/// The machine has exited. It cannot be executed again.
	Exit(E),
	/// The machine has trapped. It is waiting for external information, and can
	/// be executed again.
	Trap(T),
}

/// Exit reason.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitReason {
	/// Machine has succeeded.
	Succeed(ExitSucceed),
	/// Machine requested a rollback that keeps the remaining gas.
	Revert(ExitRevert),
	/// Machine encountered an error. All state is rolled back and the gas
	/// handed to the frame is forfeit.
	Error(ExitError),
}

impl ExitReason {
	/// Whether the exit is succeeded.
	pub fn is_succeed(&self) -> bool {
		matches!(self, Self::Succeed(_))
	}

	/// Whether the exit is revert.
	pub fn is_revert(&self) -> bool {
		matches!(self, Self::Revert(_))
	}

	/// Whether the exit is error.
	pub fn is_error(&self) -> bool {
		matches!(self, Self::Error(_))
	}

	/// The error kind, if any.
	pub fn error(&self) -> Option<ExitError> {
		match self {
			Self::Error(e) => Some(*e),
			_ => None,
		}
	}
}

/// Exit succeed reason.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitSucceed {
	/// Machine encountered an explicit stop, or ran off the end of the code.
	Stopped,
	/// Machine encountered an explicit return.
	Returned,
	/// Machine encountered an explicit suicide.
	Suicided,
}

impl From<ExitSucceed> for ExitReason {
	fn from(s: ExitSucceed) -> Self {
		Self::Succeed(s)
	}
}

/// Exit revert reason.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitRevert {
	/// Machine encountered an explicit revert.
	Reverted,
}

impl From<ExitRevert> for ExitReason {
	fn from(s: ExitRevert) -> Self {
		Self::Revert(s)
	}
}

/// Exit error reason.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ExitError {
	/// Call or create nested deeper than the call stack limit.
	#[error("max call depth exceeded")]
	DepthExceeded,
	/// The caller cannot afford the value transfer.
	#[error("insufficient balance for transfer")]
	InsufficientBalance,
	/// The create target already carries a nonce or code.
	#[error("contract address collision")]
	ContractAddressCollision,
	/// Not enough gas left to pay for the deployed code.
	#[error("contract creation code storage out of gas")]
	CodeStoreOutOfGas,
	/// Deployed code is larger than the configured maximum.
	#[error("max code size exceeded")]
	MaxCodeSizeExceeded,
	/// Execution runs out of gas.
	#[error("out of gas")]
	OutOfGas,
	/// Opcode is undefined, designated invalid, or not active on this chain.
	#[error("invalid opcode {0}")]
	InvalidOpcode(Opcode),
	/// Trying to pop from an empty stack.
	#[error("stack underflow")]
	StackUnderflow,
	/// Trying to push into a stack over stack limit.
	#[error("stack limit reached")]
	StackOverflow,
	/// Jump destination is invalid.
	#[error("invalid jump destination")]
	InvalidJump,
	/// An opcode accesses memory region, but the region is invalid.
	#[error("invalid memory range")]
	InvalidRange,
	/// Attempt to read past the end of the return data buffer.
	#[error("return data out of bounds")]
	ReturnDataOutOfBounds,
	/// State mutation attempted while executing read-only.
	#[error("write protection")]
	WriteProtection,
	/// No installed interpreter accepts the code.
	#[error("no compatible interpreter")]
	NoCompatibleInterpreter,
	/// Execution was cancelled from outside.
	#[error("execution aborted")]
	Aborted,
	/// Other normal errors, mostly raised by precompiles.
	#[error("{0}")]
	Other(&'static str),
}

impl From<ExitError> for ExitReason {
	fn from(s: ExitError) -> Self {
		Self::Error(s)
	}
}
