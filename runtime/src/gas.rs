use crate::Handler;
use primitive_types::{H160, U256};
use yvm_core::{ExitError, Opcode, Stack};
use yvm_gasometer::{static_opcode_cost, Config, GasCost, Gasometer, MemoryCost};

/// Whether the active fork knows `opcode`.
pub fn is_available(opcode: Opcode, config: &Config) -> bool {
	match opcode {
		Opcode::DELEGATECALL => config.has_delegate_call,
		Opcode::REVERT => config.has_revert,
		Opcode::RETURNDATASIZE | Opcode::RETURNDATACOPY => config.has_return_data,
		Opcode::STATICCALL => config.has_static_call,
		Opcode::SHL | Opcode::SHR | Opcode::SAR => config.has_bitwise_shifting,
		Opcode::EXTCODEHASH => config.has_ext_code_hash,
		Opcode::CREATE2 => config.has_create2,
		_ => true,
	}
}

/// Opcodes that would change state. A CALL only counts when it moves value.
pub fn check_write_protection(opcode: Opcode, stack: &Stack) -> Result<(), ExitError> {
	match opcode {
		Opcode::SSTORE | Opcode(0xa0..=0xa4) | Opcode::CREATE | Opcode::CREATE2 | Opcode::SUICIDE => {
			Err(ExitError::WriteProtection)
		}
		Opcode::CALL if stack.peek(2)? != U256::zero() => Err(ExitError::WriteProtection),
		_ => Ok(()),
	}
}

pub fn is_call(opcode: Opcode) -> bool {
	matches!(
		opcode,
		Opcode::CALL | Opcode::CALLCODE | Opcode::DELEGATECALL | Opcode::STATICCALL
	)
}

fn memory(stack: &Stack, offset: usize, len: usize) -> Result<MemoryCost, ExitError> {
	Ok(MemoryCost {
		offset: stack.peek(offset)?,
		len: stack.peek(len)?,
	})
}

fn fixed_memory(stack: &Stack, len: u64) -> Result<MemoryCost, ExitError> {
	Ok(MemoryCost {
		offset: stack.peek(0)?,
		len: U256::from(len),
	})
}

/// Whether touching `address` pays the new account surcharge under `config`.
fn is_new_account(handler: &dyn Handler, address: H160, config: &Config) -> bool {
	if config.empty_considered_exists {
		!handler.exists(address)
	} else {
		handler.is_empty(address)
	}
}

/// Price of `opcode` before gas forwarded to a nested call, along with the
/// memory it will touch.
pub fn opcode_cost(
	gasometer: &Gasometer,
	opcode: Opcode,
	stack: &Stack,
	handler: &dyn Handler,
	address: H160,
) -> Result<(u64, Option<MemoryCost>), ExitError> {
	if let Some(cost) = static_opcode_cost(opcode) {
		let memory = match opcode {
			Opcode::RETURN | Opcode::REVERT => Some(memory(stack, 0, 1)?),
			_ => None,
		};
		return Ok((cost, memory));
	}

	let config = gasometer.config();
	let (cost, memory) = match opcode {
		Opcode::EXP => (
			GasCost::Exp {
				power: stack.peek(1)?,
			},
			None,
		),
		Opcode::SHA3 => (
			GasCost::Sha3 {
				len: stack.peek(1)?,
			},
			Some(memory(stack, 0, 1)?),
		),
		Opcode::BALANCE => (GasCost::Balance, None),
		Opcode::EXTCODESIZE => (GasCost::ExtCodeSize, None),
		Opcode::EXTCODEHASH => (GasCost::ExtCodeHash, None),
		Opcode::SLOAD => (GasCost::SLoad, None),

		Opcode::CALLDATACOPY | Opcode::CODECOPY | Opcode::RETURNDATACOPY => (
			GasCost::VeryLowCopy {
				len: stack.peek(2)?,
			},
			Some(memory(stack, 0, 2)?),
		),
		Opcode::EXTCODECOPY => (
			GasCost::ExtCodeCopy {
				len: stack.peek(3)?,
			},
			Some(memory(stack, 1, 3)?),
		),
		Opcode::MLOAD | Opcode::MSTORE => (GasCost::VeryLow, Some(fixed_memory(stack, 32)?)),
		Opcode::MSTORE8 => (GasCost::VeryLow, Some(fixed_memory(stack, 1)?)),

		Opcode::SSTORE => {
			let index = stack.peek_h256(0)?;
			let new = stack.peek_h256(1)?;
			let current = handler.storage(address, index);
			(GasCost::SStore { current, new }, None)
		}
		Opcode(n @ 0xa0..=0xa4) => (
			GasCost::Log {
				n: n - 0xa0,
				len: stack.peek(1)?,
			},
			Some(memory(stack, 0, 1)?),
		),

		Opcode::CREATE => (GasCost::Create, Some(memory(stack, 1, 2)?)),
		Opcode::CREATE2 => (
			GasCost::Create2 {
				len: stack.peek(2)?,
			},
			Some(memory(stack, 1, 2)?),
		),
		Opcode::SUICIDE => {
			let target = H160::from(stack.peek_h256(0)?);
			(
				GasCost::Suicide {
					value: handler.balance(address),
					new_account: is_new_account(handler, target, config),
				},
				None,
			)
		}

		Opcode::CALL => {
			let target = H160::from(stack.peek_h256(1)?);
			(
				GasCost::Call {
					value: stack.peek(2)?,
					new_account: is_new_account(handler, target, config),
				},
				Some(memory(stack, 3, 4)?.join(memory(stack, 5, 6)?)),
			)
		}
		Opcode::CALLCODE => (
			GasCost::CallCode {
				value: stack.peek(2)?,
			},
			Some(memory(stack, 3, 4)?.join(memory(stack, 5, 6)?)),
		),
		Opcode::DELEGATECALL => (
			GasCost::DelegateCall,
			Some(memory(stack, 2, 3)?.join(memory(stack, 4, 5)?)),
		),
		Opcode::STATICCALL => (
			GasCost::StaticCall,
			Some(memory(stack, 2, 3)?.join(memory(stack, 4, 5)?)),
		),

		_ => return Err(ExitError::InvalidOpcode(opcode)),
	};

	Ok((gasometer.gas_cost(cost)?, memory))
}
