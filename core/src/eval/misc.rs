use super::Control;
use crate::utils::USIZE_MAX;
use crate::{ExitError, ExitRevert, ExitSucceed, Machine};
use primitive_types::{H256, U256};

pub fn codesize(state: &mut Machine) -> Control {
	let size = U256::from(state.code.len());
	push_u256!(state, size);
	Control::Continue(1)
}

pub fn codecopy(state: &mut Machine) -> Control {
	pop_u256!(state, memory_offset, code_offset, len);

	try_or_fail!(state
		.memory
		.copy_large(memory_offset, code_offset, len, &state.code));
	Control::Continue(1)
}

pub fn calldataload(state: &mut Machine) -> Control {
	pop_u256!(state, index);

	let mut load = [0u8; 32];
	#[allow(clippy::needless_range_loop)]
	for i in 0..32 {
		if let Some(p) = index.checked_add(U256::from(i)) {
			if p <= USIZE_MAX {
				let p = p.as_usize();
				if p < state.data.len() {
					load[i] = state.data[p];
				}
			}
		}
	}

	push!(state, H256::from(load));
	Control::Continue(1)
}

pub fn calldatasize(state: &mut Machine) -> Control {
	let len = U256::from(state.data.len());
	push_u256!(state, len);
	Control::Continue(1)
}

pub fn calldatacopy(state: &mut Machine) -> Control {
	pop_u256!(state, memory_offset, data_offset, len);

	try_or_fail!(state
		.memory
		.copy_large(memory_offset, data_offset, len, &state.data));
	Control::Continue(1)
}

pub fn pop(state: &mut Machine) -> Control {
	pop_u256!(state, _val);
	Control::Continue(1)
}

pub fn mload(state: &mut Machine) -> Control {
	pop_u256!(state, index);
	let index = as_usize_or_fail!(index);
	let value = H256::from_slice(&state.memory.get(index, 32)[..]);
	push!(state, value);
	Control::Continue(1)
}

pub fn mstore(state: &mut Machine) -> Control {
	pop_u256!(state, index);
	pop!(state, value);
	let index = as_usize_or_fail!(index);
	try_or_fail!(state.memory.set(index, &value[..], Some(32)));
	Control::Continue(1)
}

pub fn mstore8(state: &mut Machine) -> Control {
	pop_u256!(state, index, value);
	let index = as_usize_or_fail!(index);
	let value = (value.low_u32() & 0xff) as u8;
	try_or_fail!(state.memory.set(index, &[value], Some(1)));
	Control::Continue(1)
}

pub fn jump(state: &mut Machine) -> Control {
	pop_u256!(state, dest);
	let dest = as_usize_or_fail!(dest, ExitError::InvalidJump);
	Control::Jump(dest)
}

pub fn jumpi(state: &mut Machine) -> Control {
	pop_u256!(state, dest, value);
	if value != U256::zero() {
		let dest = as_usize_or_fail!(dest, ExitError::InvalidJump);
		Control::Jump(dest)
	} else {
		Control::Continue(1)
	}
}

pub fn pc(state: &mut Machine, position: usize) -> Control {
	push_u256!(state, U256::from(position));
	Control::Continue(1)
}

pub fn msize(state: &mut Machine) -> Control {
	let len = state.memory.effective_len();
	push_u256!(state, len);
	Control::Continue(1)
}

/// Push `n` immediate bytes. Immediates running past the end of the code
/// read as zeros.
pub fn push(state: &mut Machine, n: usize, position: usize) -> Control {
	let end = position + 1 + n;
	let mut val = [0u8; 32];
	let available = state.code.len().saturating_sub(position + 1).min(n);
	val[(32 - n)..(32 - n + available)]
		.copy_from_slice(&state.code[(position + 1)..(position + 1 + available)]);

	push_u256!(state, U256::from_big_endian(&val));
	Control::Continue(end - position)
}

pub fn dup(state: &mut Machine, n: usize) -> Control {
	let value = try_or_fail!(state.stack.peek(n - 1));
	push_u256!(state, value);
	Control::Continue(1)
}

pub fn swap(state: &mut Machine, n: usize) -> Control {
	let val1 = try_or_fail!(state.stack.peek(0));
	let val2 = try_or_fail!(state.stack.peek(n));
	try_or_fail!(state.stack.set(0, val2));
	try_or_fail!(state.stack.set(n, val1));
	Control::Continue(1)
}

pub fn ret(state: &mut Machine) -> Control {
	pop_u256!(state, start, len);
	try_or_fail!(state.set_return_range(start, len));
	Control::Exit(ExitSucceed::Returned.into())
}

pub fn revert(state: &mut Machine) -> Control {
	pop_u256!(state, start, len);
	try_or_fail!(state.set_return_range(start, len));
	Control::Exit(ExitRevert::Reverted.into())
}
