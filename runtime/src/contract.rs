use primitive_types::{H160, H256, U256};
use std::rc::Rc;

/// One frame's view of the code it runs and the account it runs as.
#[derive(Clone, Debug)]
pub struct Contract {
	/// Address reported by CALLER.
	pub caller: H160,
	/// Account whose storage and balance the code acts on.
	pub address: H160,
	/// Value reported by CALLVALUE.
	pub value: U256,
	/// Code being executed.
	pub code: Rc<Vec<u8>>,
	/// Hash of `code`.
	pub code_hash: H256,
	/// Account the code was loaded from, `None` for init code.
	pub code_address: Option<H160>,
	/// Gas left in this frame.
	pub gas: u64,
	delegate: bool,
}

impl Contract {
	pub fn new(caller: H160, address: H160, value: U256, gas: u64) -> Self {
		Self {
			caller,
			address,
			value,
			code: Rc::new(Vec::new()),
			code_hash: H256::zero(),
			code_address: None,
			gas,
			delegate: false,
		}
	}

	/// Turn the frame into a delegate of `parent`: it keeps the parent's
	/// caller and value.
	pub fn as_delegate(mut self, parent: &Contract) -> Self {
		self.caller = parent.caller;
		self.value = parent.value;
		self.delegate = true;
		self
	}

	pub fn is_delegate(&self) -> bool {
		self.delegate
	}

	/// Load the code to run from `address`.
	pub fn set_call_code(&mut self, address: H160, hash: H256, code: Rc<Vec<u8>>) {
		self.code = code;
		self.code_hash = hash;
		self.code_address = Some(address);
	}

	/// Load init code, which belongs to no account yet.
	pub fn set_code(&mut self, hash: H256, code: Rc<Vec<u8>>) {
		self.code = code;
		self.code_hash = hash;
		self.code_address = None;
	}

	/// Deduct `gas`. Leaves the frame untouched and returns `false` when it
	/// holds less than that.
	pub fn use_gas(&mut self, gas: u64) -> bool {
		if self.gas < gas {
			return false;
		}
		self.gas -= gas;
		true
	}

	pub fn refund_gas(&mut self, gas: u64) {
		self.gas = self.gas.saturating_add(gas);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn gas_accounting() {
		let mut contract = Contract::new(H160::zero(), H160::repeat_byte(1), U256::zero(), 100);
		assert!(contract.use_gas(60));
		assert!(!contract.use_gas(41));
		assert_eq!(contract.gas, 40);
		contract.refund_gas(10);
		assert_eq!(contract.gas, 50);
	}

	#[test]
	fn delegate_inherits_caller_and_value() {
		let parent = Contract::new(
			H160::repeat_byte(0xaa),
			H160::repeat_byte(0xbb),
			U256::from(7),
			1000,
		);
		let child = Contract::new(parent.address, parent.address, U256::zero(), 10).as_delegate(&parent);

		assert!(child.is_delegate());
		assert_eq!(child.caller, H160::repeat_byte(0xaa));
		assert_eq!(child.address, H160::repeat_byte(0xbb));
		assert_eq!(child.value, U256::from(7));
	}
}
