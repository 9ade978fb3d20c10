//! Built-in contracts living at the lowest addresses. Which of them exist
//! depends on the fork, so they come in per-fork tables selected by
//! [`precompiles`].

mod bn128;
mod modexp;
mod simple;

use crate::bn128::{Bn128Add, Bn128Mul, Bn128Pairing};
use crate::modexp::Modexp;
use crate::simple::{ECRecover, Identity, Ripemd160, Sha256};
use core::cmp::min;
use primitive_types::{H160, U256};
use yvm_core::ExitError;

/// A contract implemented natively rather than in bytecode.
pub trait Precompile: Sync {
	/// Gas charged for running on `input`, checked before `run`.
	fn required_gas(&self, input: &[u8]) -> u64;
	/// Compute the output. An error forfeits the gas handed to the call.
	fn run(&self, input: &[u8]) -> Result<Vec<u8>, ExitError>;
}

/// A fixed table of precompiles keyed by address.
pub trait PrecompileSet: Sync {
	fn get(&self, address: H160) -> Option<&dyn Precompile>;

	fn contains(&self, address: H160) -> bool {
		self.get(address).is_some()
	}
}

/// ECRECOVER, SHA256, RIPEMD160 and IDENTITY.
#[derive(Clone, Copy, Debug, Default)]
pub struct Homestead;

impl PrecompileSet for Homestead {
	fn get(&self, address: H160) -> Option<&dyn Precompile> {
		match index(address)? {
			1 => Some(&ECRecover),
			2 => Some(&Sha256),
			3 => Some(&Ripemd160),
			4 => Some(&Identity),
			_ => None,
		}
	}
}

/// The Homestead table plus MODEXP and the alt_bn128 curve operations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Byzantium;

impl PrecompileSet for Byzantium {
	fn get(&self, address: H160) -> Option<&dyn Precompile> {
		match index(address)? {
			5 => Some(&Modexp),
			6 => Some(&Bn128Add),
			7 => Some(&Bn128Mul),
			8 => Some(&Bn128Pairing),
			_ => Homestead.get(address),
		}
	}
}

static HOMESTEAD: Homestead = Homestead;
static BYZANTIUM: Byzantium = Byzantium;

/// Precompile table in force, depending on whether Byzantium is active.
pub fn precompiles(byzantium: bool) -> &'static dyn PrecompileSet {
	if byzantium {
		&BYZANTIUM
	} else {
		&HOMESTEAD
	}
}

/// Low byte of a precompile address, `None` for any other address.
fn index(address: H160) -> Option<u8> {
	let bytes = address.as_bytes();
	if bytes[..19].iter().all(|b| *b == 0) {
		Some(bytes[19])
	} else {
		None
	}
}

fn linear_cost(len: usize, base: u64, word: u64) -> u64 {
	let words = (len as u64).saturating_add(31) / 32;
	base.saturating_add(word.saturating_mul(words))
}

/// Value of a big-endian length field, `None` when it does not fit `u64`.
fn to_u64(value: U256) -> Option<u64> {
	if value > U256::from(u64::MAX) {
		None
	} else {
		Some(value.as_u64())
	}
}

/// The first `LEN` bytes of `data`, zero padded on the right.
fn right_pad<const LEN: usize>(data: &[u8]) -> [u8; LEN] {
	let mut padded = [0u8; LEN];
	let len = min(LEN, data.len());
	padded[..len].copy_from_slice(&data[..len]);
	padded
}

/// The first `len` bytes of `data`, zero padded on the right.
fn right_pad_vec(data: &[u8], len: usize) -> Vec<u8> {
	let mut padded = vec![0u8; len];
	let copied = min(len, data.len());
	padded[..copied].copy_from_slice(&data[..copied]);
	padded
}

/// `data` zero padded on the left to `len` bytes. Longer input keeps its
/// last `len` bytes.
fn left_pad_vec(data: &[u8], len: usize) -> Vec<u8> {
	let mut padded = vec![0u8; len];
	let copied = min(len, data.len());
	padded[len - copied..].copy_from_slice(&data[data.len() - copied..]);
	padded
}

#[cfg(test)]
mod tests {
	use super::*;

	fn address(last: u8) -> H160 {
		H160::from_low_u64_be(last as u64)
	}

	#[test]
	fn tables_by_fork() {
		let homestead = precompiles(false);
		let byzantium = precompiles(true);

		for i in 1..=4 {
			assert!(homestead.contains(address(i)));
			assert!(byzantium.contains(address(i)));
		}
		for i in 5..=8 {
			assert!(!homestead.contains(address(i)));
			assert!(byzantium.contains(address(i)));
		}
		assert!(!byzantium.contains(address(0)));
		assert!(!byzantium.contains(address(9)));
		assert!(!byzantium.contains(H160::repeat_byte(1)));
	}

	#[test]
	fn padding() {
		assert_eq!(right_pad::<4>(&[1, 2]), [1, 2, 0, 0]);
		assert_eq!(right_pad::<2>(&[1, 2, 3]), [1, 2]);
		assert_eq!(left_pad_vec(&[1, 2], 4), vec![0, 0, 1, 2]);
		assert_eq!(left_pad_vec(&[1, 2, 3], 2), vec![2, 3]);
		assert_eq!(right_pad_vec(&[1], 3), vec![1, 0, 0]);
	}

	#[test]
	fn word_pricing() {
		assert_eq!(linear_cost(0, 15, 3), 15);
		assert_eq!(linear_cost(1, 15, 3), 18);
		assert_eq!(linear_cost(33, 15, 3), 21);
	}
}
