use crate::{right_pad, Precompile};
use bn::{AffineG1, AffineG2, Fq, Fq2, Group, Gt, G1, G2};
use primitive_types::{H256, U256};
use yvm_core::ExitError;

/// Bytes of one base field element.
const FQ_LEN: usize = 32;
/// Bytes of one scalar field element.
const SCALAR_LEN: usize = 32;
const FQ2_LEN: usize = 2 * FQ_LEN;
const G1_LEN: usize = 2 * FQ_LEN;
const G2_LEN: usize = 2 * FQ2_LEN;

const ADD_INPUT_LEN: usize = 2 * G1_LEN;
const MUL_INPUT_LEN: usize = G1_LEN + SCALAR_LEN;
/// One pairing element: a G1 point followed by a G2 point.
const PAIR_ELEMENT_LEN: usize = G1_LEN + G2_LEN;

const INVALID_POINT: ExitError = ExitError::Other("invalid alt_bn128 point");

/// Point addition on alt_bn128.
pub struct Bn128Add;

impl Precompile for Bn128Add {
	fn required_gas(&self, _input: &[u8]) -> u64 {
		500
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, ExitError> {
		let input = right_pad::<ADD_INPUT_LEN>(input);
		let p1 = read_g1_point(&input[..G1_LEN])?;
		let p2 = read_g1_point(&input[G1_LEN..])?;

		Ok(encode_g1_point(p1 + p2)?.to_vec())
	}
}

/// Scalar multiplication on alt_bn128.
pub struct Bn128Mul;

impl Precompile for Bn128Mul {
	fn required_gas(&self, _input: &[u8]) -> u64 {
		40_000
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, ExitError> {
		let input = right_pad::<MUL_INPUT_LEN>(input);
		let point = read_g1_point(&input[..G1_LEN])?;
		let scalar = bn::Fr::from_slice(&input[G1_LEN..]).map_err(|_| INVALID_POINT)?;

		Ok(encode_g1_point(point * scalar)?.to_vec())
	}
}

/// Pairing check on alt_bn128.
pub struct Bn128Pairing;

impl Precompile for Bn128Pairing {
	fn required_gas(&self, input: &[u8]) -> u64 {
		const BASE: u64 = 100_000;
		const PER_PAIR: u64 = 80_000;

		let pairs = (input.len() / PAIR_ELEMENT_LEN) as u64;
		BASE.saturating_add(PER_PAIR.saturating_mul(pairs))
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, ExitError> {
		if input.len() % PAIR_ELEMENT_LEN != 0 {
			return Err(ExitError::Other("bad alt_bn128 pairing input"));
		}

		let mut pairs = Vec::with_capacity(input.len() / PAIR_ELEMENT_LEN);
		for element in input.chunks(PAIR_ELEMENT_LEN) {
			let g1 = read_g1_point(&element[..G1_LEN])?;
			let g2 = read_g2_point(&element[G1_LEN..])?;

			// Pairs with a point at infinity contribute nothing.
			if !g1.is_zero() && !g2.is_zero() {
				pairs.push((g1, g2));
			}
		}

		let success = pairs.is_empty() || bn::pairing_batch(&pairs) == Gt::one();
		let result = if success { U256::one() } else { U256::zero() };

		let mut output = H256::zero();
		result.to_big_endian(&mut output[..]);
		Ok(output.0.to_vec())
	}
}

fn read_fq(input: &[u8]) -> Result<Fq, ExitError> {
	Fq::from_slice(&input[..FQ_LEN]).map_err(|_| INVALID_POINT)
}

/// The imaginary part comes first on the wire.
fn read_fq2(input: &[u8]) -> Result<Fq2, ExitError> {
	let y = read_fq(&input[..FQ_LEN])?;
	let x = read_fq(&input[FQ_LEN..FQ2_LEN])?;
	Ok(Fq2::new(x, y))
}

/// (0, 0) encodes the point at infinity, which `AffineG1` cannot hold.
fn read_g1_point(input: &[u8]) -> Result<G1, ExitError> {
	let px = read_fq(&input[0..FQ_LEN])?;
	let py = read_fq(&input[FQ_LEN..G1_LEN])?;

	if px == Fq::zero() && py == Fq::zero() {
		Ok(G1::zero())
	} else {
		AffineG1::new(px, py)
			.map(Into::into)
			.map_err(|_| INVALID_POINT)
	}
}

fn read_g2_point(input: &[u8]) -> Result<G2, ExitError> {
	let x = read_fq2(&input[0..FQ2_LEN])?;
	let y = read_fq2(&input[FQ2_LEN..G2_LEN])?;

	if x.is_zero() && y.is_zero() {
		Ok(G2::zero())
	} else {
		AffineG2::new(x, y)
			.map(Into::into)
			.map_err(|_| INVALID_POINT)
	}
}

/// The point at infinity encodes as all zeros.
fn encode_g1_point(point: G1) -> Result<[u8; G1_LEN], ExitError> {
	let mut output = [0u8; G1_LEN];

	if let Some(affine) = AffineG1::from_jacobian(point) {
		affine
			.x()
			.to_big_endian(&mut output[..FQ_LEN])
			.map_err(|_| INVALID_POINT)?;
		affine
			.y()
			.to_big_endian(&mut output[FQ_LEN..])
			.map_err(|_| INVALID_POINT)?;
	}

	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;

	const G1_GENERATOR: &str = "0000000000000000000000000000000000000000000000000000000000000001\
		0000000000000000000000000000000000000000000000000000000000000002";

	#[test]
	fn add_to_infinity_is_identity() {
		let mut input = hex::decode(G1_GENERATOR).unwrap();
		input.extend_from_slice(&[0u8; 64]);
		assert_eq!(Bn128Add.run(&input).unwrap(), hex::decode(G1_GENERATOR).unwrap());
	}

	#[test]
	fn doubling_matches_multiplication_by_two() {
		let generator = hex::decode(G1_GENERATOR).unwrap();

		let mut add_input = generator.clone();
		add_input.extend_from_slice(&generator);

		let mut mul_input = generator;
		let mut two = [0u8; 32];
		two[31] = 2;
		mul_input.extend_from_slice(&two);

		assert_eq!(Bn128Add.run(&add_input), Bn128Mul.run(&mul_input));
	}

	#[test]
	fn point_off_the_curve_fails() {
		let mut input = [0u8; 128];
		input[31] = 1;
		input[63] = 3;
		assert_eq!(Bn128Add.run(&input), Err(INVALID_POINT));
	}

	#[test]
	fn empty_pairing_succeeds() {
		let output = Bn128Pairing.run(&[]).unwrap();
		assert_eq!(U256::from_big_endian(&output), U256::one());
		assert_eq!(Bn128Pairing.required_gas(&[]), 100_000);
	}

	#[test]
	fn pairing_input_must_be_whole_elements() {
		assert!(Bn128Pairing.run(&[0u8; 100]).is_err());
		assert_eq!(Bn128Pairing.required_gas(&[0u8; 384]), 260_000);
	}
}
