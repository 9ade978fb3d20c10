use crate::backend::StateDB;
use primitive_types::{H160, H256, U256};
use std::sync::Arc;

/// Whether `from` can afford to send `value`.
pub type CanTransferFn = fn(state: &dyn StateDB, from: H160, value: U256) -> bool;
/// Move `value` from `from` to `to` in the block `number`.
pub type TransferFn =
	fn(state: &mut dyn StateDB, from: H160, to: H160, value: U256, number: U256);
/// Hash of the block with the given number.
pub type GetHashFn = Arc<dyn Fn(u64) -> H256>;

/// Block and transaction environment of one execution. Never changes while
/// the engine runs.
#[derive(Clone)]
pub struct Context {
	pub origin: H160,
	pub gas_price: U256,
	pub coinbase: H160,
	pub gas_limit: U256,
	pub block_number: U256,
	pub timestamp: U256,
	pub difficulty: U256,
	pub get_hash: GetHashFn,
	pub can_transfer: CanTransferFn,
	pub transfer: TransferFn,
}

impl Default for Context {
	fn default() -> Self {
		Self {
			origin: H160::zero(),
			gas_price: U256::zero(),
			coinbase: H160::zero(),
			gas_limit: U256::zero(),
			block_number: U256::zero(),
			timestamp: U256::zero(),
			difficulty: U256::zero(),
			get_hash: Arc::new(|_| H256::zero()),
			can_transfer,
			transfer,
		}
	}
}

/// Default transfer check: the balance covers the value.
pub fn can_transfer(state: &dyn StateDB, from: H160, value: U256) -> bool {
	state.get_balance(from) >= value
}

/// Default transfer: plain balance move.
pub fn transfer(state: &mut dyn StateDB, from: H160, to: H160, value: U256, _number: U256) {
	state.sub_balance(from, value);
	state.add_balance(to, value);
}

/// Transfer check that allows any value.
pub fn noop_can_transfer(_state: &dyn StateDB, _from: H160, _value: U256) -> bool {
	true
}

/// Transfer that moves nothing.
pub fn noop_transfer(_state: &mut dyn StateDB, _from: H160, _to: H160, _value: U256, _number: U256) {}
