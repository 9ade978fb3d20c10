use crate::consts::*;
use crate::memory::to_word_size;
use crate::utils::log2floor;
use crate::Config;
use primitive_types::{H256, U256};
use yvm_core::ExitError;

fn words(len: U256) -> Result<u64, ExitError> {
	if len > U256::from(u64::MAX) {
		return Err(ExitError::OutOfGas);
	}
	Ok(to_word_size(len.as_u64()))
}

fn linear(base: u64, per_word: u64, len: U256) -> Result<u64, ExitError> {
	per_word
		.checked_mul(words(len)?)
		.and_then(|cost| cost.checked_add(base))
		.ok_or(ExitError::OutOfGas)
}

pub fn call_cost(
	value: U256,
	is_call_or_callcode: bool,
	is_call_or_staticcall: bool,
	new_account: bool,
	config: &Config,
) -> u64 {
	let transfers_value = value != U256::default();
	config.gas_call
		+ xfer_cost(is_call_or_callcode, transfers_value)
		+ new_cost(is_call_or_staticcall, new_account, transfers_value, config)
}

pub fn suicide_cost(value: U256, new_account: bool, config: &Config) -> u64 {
	let eip161 = !config.empty_considered_exists;
	let should_charge_topup = if eip161 {
		value != U256::zero() && new_account
	} else {
		new_account
	};

	let suicide_gas_topup = if should_charge_topup {
		config.gas_suicide_new_account
	} else {
		0
	};

	config.gas_suicide + suicide_gas_topup
}

pub fn sstore_cost(current: H256, new: H256) -> u64 {
	if current == H256::default() && new != H256::default() {
		G_SSTORE_SET
	} else {
		G_SSTORE_RESET
	}
}

pub fn sstore_refund(current: H256, new: H256) -> u64 {
	if current != H256::default() && new == H256::default() {
		R_SSTORE_CLEAR
	} else {
		0
	}
}

pub fn sha3_cost(len: U256) -> Result<u64, ExitError> {
	linear(G_SHA3, G_SHA3WORD, len)
}

pub fn verylowcopy_cost(len: U256) -> Result<u64, ExitError> {
	linear(G_VERYLOW, G_COPY, len)
}

pub fn extcodecopy_cost(len: U256, config: &Config) -> Result<u64, ExitError> {
	linear(config.gas_ext_code, G_COPY, len)
}

pub fn create2_cost(len: U256) -> Result<u64, ExitError> {
	linear(G_CREATE, G_SHA3WORD, len)
}

pub fn log_cost(n: u8, len: U256) -> Result<u64, ExitError> {
	if len > U256::from(u64::MAX) {
		return Err(ExitError::OutOfGas);
	}

	G_LOGDATA
		.checked_mul(len.as_u64())
		.and_then(|cost| cost.checked_add(G_LOG + G_LOGTOPIC * u64::from(n)))
		.ok_or(ExitError::OutOfGas)
}

pub fn exp_cost(power: U256, config: &Config) -> Result<u64, ExitError> {
	if power == U256::zero() {
		Ok(G_EXP)
	} else {
		let bytes = log2floor(power) / 8 + 1;
		config
			.gas_expbyte
			.checked_mul(bytes)
			.and_then(|cost| cost.checked_add(G_EXP))
			.ok_or(ExitError::OutOfGas)
	}
}

fn xfer_cost(is_call_or_callcode: bool, transfers_value: bool) -> u64 {
	if is_call_or_callcode && transfers_value {
		G_CALLVALUE
	} else {
		0
	}
}

fn new_cost(
	is_call_or_staticcall: bool,
	new_account: bool,
	transfers_value: bool,
	config: &Config,
) -> u64 {
	let eip161 = !config.empty_considered_exists;
	if is_call_or_staticcall {
		if eip161 {
			if transfers_value && new_account {
				G_NEWACCOUNT
			} else {
				0
			}
		} else if new_account {
			G_NEWACCOUNT
		} else {
			0
		}
	} else {
		0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn value_transfer_to_new_account() {
		let frontier = Config::frontier();
		let eip158 = Config::eip158();

		assert_eq!(call_cost(U256::zero(), true, true, true, &frontier), 40 + 25000);
		assert_eq!(call_cost(U256::one(), true, true, false, &frontier), 40 + 9000);
		assert_eq!(call_cost(U256::zero(), true, true, true, &eip158), 700);
		assert_eq!(call_cost(U256::one(), true, true, true, &eip158), 700 + 9000 + 25000);
		assert_eq!(call_cost(U256::one(), true, false, true, &eip158), 700 + 9000);
	}

	#[test]
	fn suicide_topup() {
		assert_eq!(suicide_cost(U256::one(), true, &Config::frontier()), 0);
		assert_eq!(suicide_cost(U256::zero(), true, &Config::eip150()), 30000);
		assert_eq!(suicide_cost(U256::zero(), true, &Config::eip158()), 5000);
		assert_eq!(suicide_cost(U256::one(), true, &Config::eip158()), 30000);
	}

	#[test]
	fn sstore_schedule() {
		let one = H256::from_low_u64_be(1);
		let zero = H256::default();
		assert_eq!(sstore_cost(zero, one), 20000);
		assert_eq!(sstore_cost(one, one), 5000);
		assert_eq!(sstore_cost(one, zero), 5000);
		assert_eq!(sstore_refund(one, zero), 15000);
		assert_eq!(sstore_refund(zero, zero), 0);
	}

	#[test]
	fn exp_charges_per_exponent_byte() {
		assert_eq!(exp_cost(U256::zero(), &Config::frontier()), Ok(10));
		assert_eq!(exp_cost(U256::from(255), &Config::frontier()), Ok(20));
		assert_eq!(exp_cost(U256::from(256), &Config::eip158()), Ok(110));
		assert_eq!(exp_cost(U256::MAX, &Config::eip158()), Ok(10 + 50 * 32));
	}

	#[test]
	fn word_priced_operations() {
		assert_eq!(sha3_cost(U256::from(33)), Ok(42));
		assert_eq!(verylowcopy_cost(U256::zero()), Ok(3));
		assert_eq!(create2_cost(U256::from(64)), Ok(32012));
		assert_eq!(log_cost(2, U256::from(10)), Ok(375 + 750 + 80));
		assert_eq!(sha3_cost(U256::MAX), Err(ExitError::OutOfGas));
	}
}
