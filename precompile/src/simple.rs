use crate::{linear_cost, Precompile};
use core::cmp::min;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use primitive_types::H256;
use sha3::{Digest, Keccak256};
use yvm_core::ExitError;

/// Address recovery from a secp256k1 signature over a message hash.
pub struct ECRecover;

impl ECRecover {
	fn recover(input: &[u8; 128]) -> Option<H256> {
		// v is a full 32-byte word holding 27 or 28.
		if input[32..63] != [0u8; 31] || ![27, 28].contains(&input[63]) {
			return None;
		}

		let mut signature = Signature::from_slice(&input[64..128]).ok()?;
		let mut recid = RecoveryId::from_byte(input[63] - 27)?;
		// High-s signatures recover fine, they just have to be flipped for k256.
		if let Some(normalized) = signature.normalize_s() {
			signature = normalized;
			recid = RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced());
		}

		let key = VerifyingKey::recover_from_prehash(&input[0..32], &signature, recid).ok()?;
		let point = key.to_encoded_point(false);
		let mut address = H256::from_slice(Keccak256::digest(&point.as_bytes()[1..]).as_slice());
		address.0[0..12].copy_from_slice(&[0u8; 12]);
		Some(address)
	}
}

impl Precompile for ECRecover {
	fn required_gas(&self, _input: &[u8]) -> u64 {
		3000
	}

	fn run(&self, i: &[u8]) -> Result<Vec<u8>, ExitError> {
		let mut input = [0u8; 128];
		input[..min(i.len(), 128)].copy_from_slice(&i[..min(i.len(), 128)]);

		// Bad signatures are not an error, they just recover nothing.
		Ok(Self::recover(&input)
			.map(|address| address.0.to_vec())
			.unwrap_or_default())
	}
}

pub struct Sha256;

impl Precompile for Sha256 {
	fn required_gas(&self, input: &[u8]) -> u64 {
		linear_cost(input.len(), 60, 12)
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, ExitError> {
		Ok(sha2::Sha256::digest(input).to_vec())
	}
}

pub struct Ripemd160;

impl Precompile for Ripemd160 {
	fn required_gas(&self, input: &[u8]) -> u64 {
		linear_cost(input.len(), 600, 120)
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, ExitError> {
		let mut ret = [0u8; 32];
		let hash = ripemd::Ripemd160::digest(input);
		ret[12..32].copy_from_slice(&hash);

		Ok(ret.to_vec())
	}
}

pub struct Identity;

impl Precompile for Identity {
	fn required_gas(&self, input: &[u8]) -> u64 {
		linear_cost(input.len(), 15, 3)
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, ExitError> {
		Ok(input.to_vec())
	}
}
