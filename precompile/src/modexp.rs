use crate::{left_pad_vec, right_pad, right_pad_vec, to_u64, Precompile};
use core::cmp::{max, min};
use primitive_types::U256;
use yvm_core::ExitError;

const HEADER_LENGTH: usize = 96;

/// Big integer modular exponentiation.
pub struct Modexp;

/// Lengths of base, exponent and modulus from the header. `None` for a
/// length that does not fit `u64`.
fn lengths(input: &[u8]) -> [Option<u64>; 3] {
	let header = right_pad::<HEADER_LENGTH>(input);
	[
		to_u64(U256::from_big_endian(&header[0..32])),
		to_u64(U256::from_big_endian(&header[32..64])),
		to_u64(U256::from_big_endian(&header[64..96])),
	]
}

/// Up to the first 32 bytes of the exponent, as a number.
fn exponent_head(input: &[u8], base_len: u64, exp_len: u64) -> U256 {
	let data = input.get(HEADER_LENGTH..).unwrap_or_default();
	let start = min(base_len, data.len() as u64) as usize;
	let head = right_pad::<32>(&data[start..]);
	let head_len = min(exp_len, 32) as usize;
	U256::from_big_endian(&left_pad_vec(&head[..head_len], 32))
}

fn iteration_count(exp_len: u64, exp_head: &U256) -> u64 {
	let count = if exp_len <= 32 {
		if exp_head.is_zero() {
			0
		} else {
			exp_head.bits() as u64 - 1
		}
	} else {
		8u64.saturating_mul(exp_len - 32)
			.saturating_add(max(1, exp_head.bits() as u64) - 1)
	};

	max(count, 1)
}

fn multiplication_complexity(x: u64) -> U256 {
	if x <= 64 {
		U256::from(x * x)
	} else if x <= 1_024 {
		U256::from(x * x / 4 + 96 * x - 3_072)
	} else {
		let x = U256::from(x);
		x * x / U256::from(16) + U256::from(480) * x - U256::from(199_680)
	}
}

/// Gas of a modexp call under the Byzantium rules.
pub fn byzantium_gas_calc(base_len: u64, exp_len: u64, mod_len: u64, exp_head: &U256) -> u64 {
	const GAS_DIVISOR: u64 = 20;

	let complexity = multiplication_complexity(max(base_len, mod_len));
	let gas = complexity * U256::from(iteration_count(exp_len, exp_head)) / U256::from(GAS_DIVISOR);

	to_u64(gas).unwrap_or(u64::MAX)
}

impl Precompile for Modexp {
	fn required_gas(&self, input: &[u8]) -> u64 {
		let [base_len, exp_len, mod_len] = lengths(input);
		let (base_len, mod_len) = match (base_len, mod_len) {
			(Some(base_len), Some(mod_len)) => (base_len, mod_len),
			_ => return u64::MAX,
		};
		// An unreasonable exponent is only free when there is nothing to raise.
		let exp_len = exp_len.unwrap_or(u64::MAX);

		let exp_head = exponent_head(input, base_len, exp_len);
		byzantium_gas_calc(base_len, exp_len, mod_len, &exp_head)
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, ExitError> {
		let [base_len, exp_len, mod_len] = lengths(input);
		let base_len = base_len.ok_or(ExitError::OutOfGas)? as usize;
		let mod_len = mod_len.ok_or(ExitError::OutOfGas)? as usize;

		if base_len == 0 && mod_len == 0 {
			return Ok(Vec::new());
		}
		let exp_len = exp_len.ok_or(ExitError::OutOfGas)? as usize;

		let data = input.get(HEADER_LENGTH..).unwrap_or_default();
		let total = base_len
			.checked_add(exp_len)
			.and_then(|len| len.checked_add(mod_len))
			.ok_or(ExitError::OutOfGas)?;
		let data = right_pad_vec(data, total);
		let (base, rest) = data.split_at(base_len);
		let (exponent, modulus) = rest.split_at(exp_len);

		if modulus.iter().all(|b| *b == 0) {
			return Ok(vec![0u8; mod_len]);
		}

		let output = aurora_engine_modexp::modexp(base, exponent, modulus);
		Ok(left_pad_vec(&output, mod_len))
	}
}
