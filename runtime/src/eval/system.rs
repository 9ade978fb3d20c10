use super::Control;
use crate::{CallScheme, ExitError, ExitReason, ExitSucceed, Handler, Runtime};
use core::cmp::min;
use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};
use yvm_gasometer::consts::{G_CALLSTIPEND, R_SUICIDE};
use yvm_gasometer::{l64, sstore_refund};

pub fn sha3(runtime: &mut Runtime, handler: &mut dyn Handler) -> Control {
	pop_u256!(runtime, from, len);
	let data = memory_read!(runtime, from, len);

	let ret = H256::from_slice(Keccak256::digest(data.as_slice()).as_slice());
	handler.record_preimage(ret, &data);
	push!(runtime, ret);

	Control::Continue
}

pub fn address(runtime: &mut Runtime) -> Control {
	let ret = H256::from(runtime.contract.address);
	push!(runtime, ret);

	Control::Continue
}

pub fn balance(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	pop!(runtime, address);
	push_u256!(runtime, handler.balance(address.into()));

	Control::Continue
}

pub fn origin(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	let ret = H256::from(handler.origin());
	push!(runtime, ret);

	Control::Continue
}

pub fn caller(runtime: &mut Runtime) -> Control {
	let ret = H256::from(runtime.contract.caller);
	push!(runtime, ret);

	Control::Continue
}

pub fn callvalue(runtime: &mut Runtime) -> Control {
	push_u256!(runtime, runtime.contract.value);

	Control::Continue
}

pub fn gasprice(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	push_u256!(runtime, handler.gas_price());

	Control::Continue
}

pub fn extcodesize(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	pop!(runtime, address);
	push_u256!(runtime, handler.code_size(address.into()));

	Control::Continue
}

pub fn extcodehash(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	pop!(runtime, address);
	let address = H160::from(address);
	if handler.is_empty(address) {
		push!(runtime, H256::zero());
	} else {
		push!(runtime, handler.code_hash(address));
	}

	Control::Continue
}

pub fn extcodecopy(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	pop!(runtime, address);
	pop_u256!(runtime, memory_offset, code_offset, len);

	try_or_fail!(runtime.machine.memory_mut().copy_large(
		memory_offset,
		code_offset,
		len,
		&handler.code(address.into()),
	));

	Control::Continue
}

pub fn returndatasize(runtime: &mut Runtime) -> Control {
	let size = U256::from(runtime.return_data_buffer.len());
	push_u256!(runtime, size);

	Control::Continue
}

pub fn returndatacopy(runtime: &mut Runtime) -> Control {
	pop_u256!(runtime, memory_offset, data_offset, len);

	if data_offset
		.checked_add(len)
		.map(|l| l > U256::from(runtime.return_data_buffer.len()))
		.unwrap_or(true)
	{
		return Control::Exit(ExitError::ReturnDataOutOfBounds.into());
	}

	try_or_fail!(runtime.machine.memory_mut().copy_large(
		memory_offset,
		data_offset,
		len,
		&runtime.return_data_buffer,
	));

	Control::Continue
}

pub fn blockhash(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	pop_u256!(runtime, number);

	let current = handler.block_number();
	let lowest = current.saturating_sub(U256::from(256));
	if number >= lowest && number < current && number <= U256::from(u64::MAX) {
		push!(runtime, handler.block_hash(number.low_u64()));
	} else {
		push!(runtime, H256::zero());
	}

	Control::Continue
}

pub fn coinbase(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	push!(runtime, H256::from(handler.block_coinbase()));
	Control::Continue
}

pub fn timestamp(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	push_u256!(runtime, handler.block_timestamp());
	Control::Continue
}

pub fn number(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	push_u256!(runtime, handler.block_number());
	Control::Continue
}

pub fn difficulty(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	push_u256!(runtime, handler.block_difficulty());
	Control::Continue
}

pub fn gaslimit(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	push_u256!(runtime, handler.block_gas_limit());
	Control::Continue
}

pub fn sload(runtime: &mut Runtime, handler: &dyn Handler) -> Control {
	pop!(runtime, index);
	let value = handler.storage(runtime.contract.address, index);
	push!(runtime, value);

	Control::Continue
}

pub fn sstore(runtime: &mut Runtime, handler: &mut dyn Handler) -> Control {
	pop!(runtime, index, value);

	let address = runtime.contract.address;
	let current = handler.storage(address, index);
	let refund = sstore_refund(current, value);
	if refund > 0 {
		handler.add_refund(refund);
	}
	handler.set_storage(address, index, value);

	Control::Continue
}

pub fn gas(runtime: &mut Runtime) -> Control {
	push_u256!(runtime, U256::from(runtime.contract.gas));

	Control::Continue
}

pub fn log(runtime: &mut Runtime, n: u8, handler: &mut dyn Handler) -> Control {
	pop_u256!(runtime, offset, len);
	let data = memory_read!(runtime, offset, len);

	let mut topics = Vec::with_capacity(n as usize);
	for _ in 0..(n as usize) {
		pop!(runtime, topic);
		topics.push(topic);
	}

	handler.log(runtime.contract.address, topics, data);

	Control::Continue
}

pub fn suicide(runtime: &mut Runtime, handler: &mut dyn Handler) -> Control {
	pop!(runtime, target);

	let address = runtime.contract.address;
	if !handler.has_suicided(address) {
		handler.add_refund(R_SUICIDE);
	}
	handler.mark_delete(address, target.into());

	Control::Exit(ExitSucceed::Suicided.into())
}

pub fn create(runtime: &mut Runtime, is_create2: bool, handler: &mut dyn Handler) -> Control {
	runtime.return_data_buffer = Vec::new();

	pop_u256!(runtime, value, code_offset, len);
	let code = memory_read!(runtime, code_offset, len);

	let config = runtime.gasometer.config();
	let mut gas = runtime.contract.gas;
	if config.call_l64_after_gas {
		gas = l64(gas);
	}
	if !runtime.contract.use_gas(gas) {
		return Control::Exit(ExitError::OutOfGas.into());
	}

	let caller = runtime.contract.address;
	let outcome = if is_create2 {
		pop!(runtime, salt);
		handler.create2(caller, code, gas, value, salt)
	} else {
		handler.create(caller, code, gas, value)
	};

	runtime.contract.refund_gas(outcome.gas_left);

	let created = match outcome.reason {
		ExitReason::Succeed(_) => outcome.address,
		ExitReason::Error(ExitError::CodeStoreOutOfGas) if !config.code_deposit_oog_fails => {
			outcome.address
		}
		ExitReason::Revert(_) => {
			runtime.return_data_buffer = outcome.output;
			None
		}
		ExitReason::Error(_) => None,
	};
	push!(runtime, H256::from(created.unwrap_or_default()));

	Control::Continue
}

pub fn call(runtime: &mut Runtime, scheme: CallScheme, handler: &mut dyn Handler) -> Control {
	runtime.return_data_buffer = Vec::new();

	pop_u256!(runtime, _requested_gas);
	pop!(runtime, to);
	let to = H160::from(to);

	let value = match scheme {
		CallScheme::Call | CallScheme::CallCode => {
			pop_u256!(runtime, value);
			value
		}
		CallScheme::DelegateCall | CallScheme::StaticCall => U256::zero(),
	};

	pop_u256!(runtime, in_offset, in_len, out_offset, out_len);
	let input = memory_read!(runtime, in_offset, in_len);

	let mut gas = runtime.forwarded_gas;
	if value != U256::zero() {
		gas = gas.saturating_add(G_CALLSTIPEND);
	}

	let caller = runtime.contract.address;
	let outcome = match scheme {
		CallScheme::Call => handler.call(caller, to, input, gas, value),
		CallScheme::CallCode => handler.call_code(caller, to, input, gas, value),
		CallScheme::DelegateCall => handler.delegate_call(runtime.contract, to, input, gas),
		CallScheme::StaticCall => handler.static_call(caller, to, input, gas),
	};

	runtime.contract.refund_gas(outcome.gas_left);
	runtime.return_data_buffer = outcome.output;

	match outcome.reason {
		ExitReason::Succeed(_) | ExitReason::Revert(_) => {
			let target_len = min(out_len, U256::from(runtime.return_data_buffer.len()));
			try_or_fail!(runtime.machine.memory_mut().copy_large(
				out_offset,
				U256::zero(),
				target_len,
				&runtime.return_data_buffer[..],
			));
			let status = if outcome.reason.is_succeed() {
				U256::one()
			} else {
				U256::zero()
			};
			push_u256!(runtime, status);
		}
		ExitReason::Error(_) => {
			push_u256!(runtime, U256::zero());
		}
	}

	Control::Continue
}
