use crate::Contract;
use auto_impl::auto_impl;
use primitive_types::{H160, H256, U256};
use yvm_core::ExitReason;
use yvm_gasometer::Config;

/// Result of a nested call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallOutcome {
	pub reason: ExitReason,
	/// Data returned or reverted with. Empty for every other outcome.
	pub output: Vec<u8>,
	/// Gas handed back to the caller.
	pub gas_left: u64,
}

/// Result of a nested create.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateOutcome {
	pub reason: ExitReason,
	/// Address the contract was, or would have been, created at. `None` when
	/// the depth or balance check refused the attempt.
	pub address: Option<H160>,
	/// Output of the init code.
	pub output: Vec<u8>,
	/// Gas handed back to the caller.
	pub gas_left: u64,
}

/// Everything the interpreter needs from outside the running frame.
#[auto_impl(&mut, Box)]
pub trait Handler {
	/// Pricing and opcode availability of the active fork.
	fn gas_config(&self) -> &Config;

	/// Get execution origin.
	fn origin(&self) -> H160;
	/// Get the gas price value.
	fn gas_price(&self) -> U256;
	/// Get environmental coinbase.
	fn block_coinbase(&self) -> H160;
	/// Get environmental block number.
	fn block_number(&self) -> U256;
	/// Get environmental block timestamp.
	fn block_timestamp(&self) -> U256;
	/// Get environmental block difficulty.
	fn block_difficulty(&self) -> U256;
	/// Get environmental gas limit.
	fn block_gas_limit(&self) -> U256;
	/// Hash of an ancestor block. Only asked about the 256 most recent ones.
	fn block_hash(&self, number: u64) -> H256;

	/// Get balance of address.
	fn balance(&self, address: H160) -> U256;
	/// Get code size of address.
	fn code_size(&self, address: H160) -> U256;
	/// Get code hash of address.
	fn code_hash(&self, address: H160) -> H256;
	/// Get code of address.
	fn code(&self, address: H160) -> Vec<u8>;
	/// Get storage value of address at index.
	fn storage(&self, address: H160, index: H256) -> H256;
	/// Check whether an address exists.
	fn exists(&self, address: H160) -> bool;
	/// Check whether an address has no nonce, no balance and no code.
	fn is_empty(&self, address: H160) -> bool;
	/// Check whether an address has already suicided in this transaction.
	fn has_suicided(&self, address: H160) -> bool;

	/// Set storage value of address at index.
	fn set_storage(&mut self, address: H160, index: H256, value: H256);
	/// Add to the refund counter.
	fn add_refund(&mut self, gas: u64);
	/// Create a log owned by address with given topics and data.
	fn log(&mut self, address: H160, topics: Vec<H256>, data: Vec<u8>);
	/// Move the balance of `address` to `target` and mark it for deletion.
	fn mark_delete(&mut self, address: H160, target: H160);
	/// Remember the input of a SHA3, if preimages are being recorded.
	fn record_preimage(&mut self, hash: H256, preimage: &[u8]);

	/// Whether execution has been cancelled from outside.
	fn is_aborted(&self) -> bool;
	/// Whether state changes are currently forbidden.
	fn is_read_only(&self) -> bool;

	/// Run `address` as its own account, transferring `value` to it.
	fn call(
		&mut self,
		caller: H160,
		address: H160,
		input: Vec<u8>,
		gas: u64,
		value: U256,
	) -> CallOutcome;
	/// Run the code of `address` as the caller's own account.
	fn call_code(
		&mut self,
		caller: H160,
		address: H160,
		input: Vec<u8>,
		gas: u64,
		value: U256,
	) -> CallOutcome;
	/// Run the code of `address` as `parent`, keeping its caller and value.
	fn delegate_call(
		&mut self,
		parent: &Contract,
		address: H160,
		input: Vec<u8>,
		gas: u64,
	) -> CallOutcome;
	/// Run `address` with every state change forbidden.
	fn static_call(&mut self, caller: H160, address: H160, input: Vec<u8>, gas: u64) -> CallOutcome;
	/// Create a contract at an address derived from the caller's nonce.
	fn create(&mut self, caller: H160, code: Vec<u8>, gas: u64, value: U256) -> CreateOutcome;
	/// Create a contract at an address derived from `salt` and the init code.
	fn create2(
		&mut self,
		caller: H160,
		code: Vec<u8>,
		gas: u64,
		value: U256,
		salt: H256,
	) -> CreateOutcome;
}
