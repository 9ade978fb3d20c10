//! Core layer of the YVM: the value stack, linear memory, jump table and the
//! opcodes that need nothing but the machine itself.

mod error;
mod eval;
mod memory;
mod opcode;
mod stack;
pub mod utils;
mod valids;

pub use crate::error::{Capture, ExitError, ExitReason, ExitRevert, ExitSucceed};
pub use crate::memory::Memory;
pub use crate::opcode::Opcode;
pub use crate::stack::Stack;
pub use crate::valids::Valids;

use crate::eval::{eval, Control};
use crate::utils::USIZE_MAX;
use core::ops::Range;
use primitive_types::U256;
use std::rc::Rc;

/// Core execution layer for EVM.
pub struct Machine {
	/// Program data.
	data: Rc<Vec<u8>>,
	/// Program code.
	code: Rc<Vec<u8>>,
	/// Program counter.
	position: Result<usize, ExitReason>,
	/// Return value.
	return_range: Range<U256>,
	/// Code validity maps.
	valids: Valids,
	/// Memory.
	memory: Memory,
	/// Stack.
	stack: Stack,
}

impl Machine {
	/// Reference of machine stack.
	pub fn stack(&self) -> &Stack {
		&self.stack
	}
	/// Mutable reference of machine stack.
	pub fn stack_mut(&mut self) -> &mut Stack {
		&mut self.stack
	}
	/// Reference of machine memory.
	pub fn memory(&self) -> &Memory {
		&self.memory
	}
	/// Mutable reference of machine memory.
	pub fn memory_mut(&mut self) -> &mut Memory {
		&mut self.memory
	}
	/// Return a reference of the program counter.
	pub fn position(&self) -> &Result<usize, ExitReason> {
		&self.position
	}
	/// Program code.
	pub fn code(&self) -> &Rc<Vec<u8>> {
		&self.code
	}
	/// Program input.
	pub fn data(&self) -> &Rc<Vec<u8>> {
		&self.data
	}

	/// Create a new machine with given code and data.
	pub fn new(
		code: Rc<Vec<u8>>,
		data: Rc<Vec<u8>>,
		stack_limit: usize,
		memory_limit: usize,
	) -> Self {
		let valids = Valids::new(&code[..]);

		Self {
			data,
			code,
			position: Ok(0),
			return_range: U256::zero()..U256::zero(),
			valids,
			memory: Memory::new(memory_limit),
			stack: Stack::new(stack_limit),
		}
	}

	/// Explicit exit of the machine. Further step will return error.
	pub fn exit(&mut self, reason: ExitReason) {
		self.position = Err(reason);
	}

	/// Inspect the machine's next opcode and current stack.
	pub fn inspect(&self) -> Option<(Opcode, &Stack)> {
		let position = match self.position {
			Ok(position) => position,
			Err(_) => return None,
		};
		self.code.get(position).map(|v| (Opcode(*v), &self.stack))
	}

	/// Record the memory range handed back by `RETURN` or `REVERT`. An empty
	/// range may carry any offset.
	pub(crate) fn set_return_range(&mut self, start: U256, len: U256) -> Result<(), ExitError> {
		if len.is_zero() {
			self.return_range = U256::zero()..U256::zero();
			return Ok(());
		}

		match start.checked_add(len) {
			Some(end) if end <= USIZE_MAX => {
				self.return_range = start..end;
				Ok(())
			}
			_ => Err(ExitError::InvalidRange),
		}
	}

	/// Copy and get the return value of the machine, if any.
	pub fn return_value(&self) -> Vec<u8> {
		let start = self.return_range.start.as_usize();
		let end = self.return_range.end.as_usize();
		self.memory.get(start, end - start)
	}

	/// Loop stepping the machine, until it stops.
	pub fn run(&mut self) -> Capture<ExitReason, Opcode> {
		loop {
			match self.step() {
				Ok(()) => (),
				Err(res) => return res,
			}
		}
	}

	/// Step the machine, executing one opcode. It then returns.
	pub fn step(&mut self) -> Result<(), Capture<ExitReason, Opcode>> {
		let position = self.position.map_err(Capture::Exit)?;

		match self.code.get(position).map(|v| Opcode(*v)) {
			Some(opcode) => match eval(self, opcode, position) {
				Control::Continue(p) => {
					self.position = Ok(position + p);
					Ok(())
				}
				Control::Exit(e) => {
					self.position = Err(e);
					Err(Capture::Exit(e))
				}
				Control::Jump(p) => {
					if self.valids.is_valid(p) {
						self.position = Ok(p);
						Ok(())
					} else {
						self.position = Err(ExitError::InvalidJump.into());
						Err(Capture::Exit(ExitError::InvalidJump.into()))
					}
				}
				Control::Trap(opcode) => {
					self.position = Ok(position + 1);
					Err(Capture::Trap(opcode))
				}
			},
			None => {
				self.position = Err(ExitSucceed::Stopped.into());
				Err(Capture::Exit(ExitSucceed::Stopped.into()))
			}
		}
	}
}
