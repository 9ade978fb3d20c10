//! Bytecode interpreter of the YVM. The [`Runtime`] drives a core
//! [`Machine`], charging gas before every step and evaluating the opcodes
//! that need the outside world through a [`Handler`].

mod contract;
mod eval;
mod gas;
mod handler;
mod interpreter;

pub use yvm_core::*;
pub use yvm_gasometer::Config;

pub use crate::contract::Contract;
pub use crate::handler::{CallOutcome, CreateOutcome, Handler};
pub use crate::interpreter::{BytecodeInterpreter, Interpreter};

use std::rc::Rc;
use yvm_gasometer::Gasometer;

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CallScheme {
	Call,
	CallCode,
	DelegateCall,
	StaticCall,
}

/// One running frame: a machine over the contract's code plus the gas and
/// return data bookkeeping around it.
pub struct Runtime<'a, 'config> {
	machine: Machine,
	contract: &'a mut Contract,
	gasometer: Gasometer<'config>,
	return_data_buffer: Vec<u8>,
	/// Gas set aside for the nested call being priced.
	forwarded_gas: u64,
}

impl<'a, 'config> Runtime<'a, 'config> {
	pub fn new(
		contract: &'a mut Contract,
		data: Rc<Vec<u8>>,
		config: &'config Config,
		stack_limit: usize,
		memory_limit: usize,
	) -> Self {
		Self {
			machine: Machine::new(contract.code.clone(), data, stack_limit, memory_limit),
			contract,
			gasometer: Gasometer::new(config),
			return_data_buffer: Vec::new(),
			forwarded_gas: 0,
		}
	}

	pub fn machine(&self) -> &Machine {
		&self.machine
	}

	pub fn contract(&self) -> &Contract {
		self.contract
	}

	/// Step until the frame exits.
	pub fn run(&mut self, handler: &mut dyn Handler) -> ExitReason {
		if self.machine.code().is_empty() {
			return ExitSucceed::Stopped.into();
		}

		loop {
			if let Err(reason) = self.step(handler) {
				return reason;
			}
		}
	}

	/// Charge for and execute one opcode.
	pub fn step(&mut self, handler: &mut dyn Handler) -> Result<(), ExitReason> {
		let opcode = self.machine.inspect().map(|(opcode, _)| opcode);
		if let Some(opcode) = opcode {
			if let Err(error) = self.pre_validate(&*handler, opcode) {
				self.machine.exit(error.into());
				return Err(error.into());
			}
		}

		match self.machine.step() {
			Ok(()) => Ok(()),
			Err(Capture::Exit(reason)) => Err(reason),
			Err(Capture::Trap(opcode)) => match eval::eval(self, opcode, handler) {
				eval::Control::Continue => Ok(()),
				eval::Control::Exit(reason) => {
					self.machine.exit(reason);
					Err(reason)
				}
			},
		}
	}

	fn pre_validate(&mut self, handler: &dyn Handler, opcode: Opcode) -> Result<(), ExitError> {
		if handler.is_aborted() {
			return Err(ExitError::Aborted);
		}

		let config = self.gasometer.config();
		if !gas::is_available(opcode, config) {
			return Err(ExitError::InvalidOpcode(opcode));
		}

		let stack = self.machine.stack();
		if handler.is_read_only() {
			gas::check_write_protection(opcode, stack)?;
		}

		let (cost, memory) = gas::opcode_cost(
			&self.gasometer,
			opcode,
			stack,
			handler,
			self.contract.address,
		)?;
		let expansion = self.gasometer.memory_expansion(memory)?;
		let mut total = cost
			.checked_add(expansion.cost)
			.ok_or(ExitError::OutOfGas)?;

		if gas::is_call(opcode) {
			let forwarded = self
				.gasometer
				.call_gas(self.contract.gas, total, stack.peek(0)?)?;
			total = total.checked_add(forwarded).ok_or(ExitError::OutOfGas)?;
			self.forwarded_gas = forwarded;
		}

		if !self.contract.use_gas(total) {
			return Err(ExitError::OutOfGas);
		}

		self.gasometer.commit_memory(expansion);
		if let Some(memory) = memory {
			self.machine
				.memory_mut()
				.resize_offset(memory.offset, memory.len)?;
		}

		Ok(())
	}
}
