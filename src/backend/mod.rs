//! World state as the engine sees it.

mod memory;
mod noop;

pub use self::memory::{MemoryAccount, MemoryState};
pub use self::noop::NoopState;

use auto_impl::auto_impl;
use primitive_types::{H160, H256, U256};

/// Keccak-256 of empty code.
pub const EMPTY_CODE_HASH: H256 = H256([
	0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
	0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
]);

/// Token returned by [`StateDB::snapshot`]. Only meaningful to the state
/// that issued it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Snapshot(pub usize);

/// A log emitted by LOG0 to LOG4.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Log {
	pub address: H160,
	pub topics: Vec<H256>,
	pub data: Vec<u8>,
	/// Block the log was emitted in.
	pub block_number: u64,
}

/// The mutable ledger of accounts the engine executes against.
///
/// Every mutation must be undoable through [`StateDB::revert_to_snapshot`].
/// The engine takes exactly one snapshot per call or create frame and
/// never mutates state from more than one thread.
#[auto_impl(&mut, Box)]
pub trait StateDB {
	/// Create a fresh account at `address`, replacing whatever was there
	/// except its balance.
	fn create_account(&mut self, address: H160);

	fn get_balance(&self, address: H160) -> U256;
	fn set_balance(&mut self, address: H160, balance: U256);
	fn add_balance(&mut self, address: H160, amount: U256);
	fn sub_balance(&mut self, address: H160, amount: U256);

	fn get_nonce(&self, address: H160) -> u64;
	fn set_nonce(&mut self, address: H160, nonce: u64);

	fn get_code(&self, address: H160) -> Vec<u8>;
	fn set_code(&mut self, address: H160, code: Vec<u8>);
	/// Hash of the account's code. Zero for an account that does not exist.
	fn get_code_hash(&self, address: H160) -> H256;
	fn get_code_size(&self, address: H160) -> usize;

	/// Read a storage slot, zero when unset.
	fn get_state(&self, address: H160, key: H256) -> H256;
	fn set_state(&mut self, address: H160, key: H256, value: H256);

	/// Mark the account as self-destructed and clear its balance. Returns
	/// whether the account existed.
	fn suicide(&mut self, address: H160) -> bool;
	fn has_suicided(&self, address: H160) -> bool;

	fn exist(&self, address: H160) -> bool;
	/// Whether the account has no nonce, no balance and no code. Accounts
	/// that do not exist are empty.
	fn empty(&self, address: H160) -> bool;

	fn snapshot(&mut self) -> Snapshot;
	/// Undo every mutation made since `snapshot` was issued. Snapshots
	/// issued after it become invalid.
	fn revert_to_snapshot(&mut self, snapshot: Snapshot);

	fn add_log(&mut self, log: Log);
	fn add_preimage(&mut self, hash: H256, preimage: Vec<u8>);

	fn add_refund(&mut self, gas: u64);
	fn get_refund(&self) -> u64;

	/// Visit the account's storage slots until `f` returns `false`.
	fn for_each_storage(&self, address: H160, f: &mut dyn FnMut(H256, H256) -> bool);
}
