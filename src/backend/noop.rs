use super::{Log, Snapshot, StateDB};
use primitive_types::{H160, H256, U256};

/// A state that stores nothing. Every account reads as missing and every
/// write is dropped, for embedders that run code without a backing store.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopState;

impl StateDB for NoopState {
	fn create_account(&mut self, _address: H160) {}

	fn get_balance(&self, _address: H160) -> U256 {
		U256::zero()
	}
	fn set_balance(&mut self, _address: H160, _balance: U256) {}
	fn add_balance(&mut self, _address: H160, _amount: U256) {}
	fn sub_balance(&mut self, _address: H160, _amount: U256) {}

	fn get_nonce(&self, _address: H160) -> u64 {
		0
	}
	fn set_nonce(&mut self, _address: H160, _nonce: u64) {}

	fn get_code(&self, _address: H160) -> Vec<u8> {
		Vec::new()
	}
	fn set_code(&mut self, _address: H160, _code: Vec<u8>) {}
	fn get_code_hash(&self, _address: H160) -> H256 {
		H256::zero()
	}
	fn get_code_size(&self, _address: H160) -> usize {
		0
	}

	fn get_state(&self, _address: H160, _key: H256) -> H256 {
		H256::zero()
	}
	fn set_state(&mut self, _address: H160, _key: H256, _value: H256) {}

	fn suicide(&mut self, _address: H160) -> bool {
		false
	}
	fn has_suicided(&self, _address: H160) -> bool {
		false
	}

	fn exist(&self, _address: H160) -> bool {
		false
	}
	fn empty(&self, _address: H160) -> bool {
		false
	}

	fn snapshot(&mut self) -> Snapshot {
		Snapshot(0)
	}
	fn revert_to_snapshot(&mut self, _snapshot: Snapshot) {}

	fn add_log(&mut self, _log: Log) {}
	fn add_preimage(&mut self, _hash: H256, _preimage: Vec<u8>) {}

	fn add_refund(&mut self, _gas: u64) {}
	fn get_refund(&self) -> u64 {
		0
	}

	fn for_each_storage(&self, _address: H160, _f: &mut dyn FnMut(H256, H256) -> bool) {}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn writes_are_dropped() {
		let mut state = NoopState;
		let address = H160::repeat_byte(0x01);
		state.add_balance(address, U256::from(10));
		state.set_nonce(address, 3);
		state.set_state(address, H256::zero(), H256::repeat_byte(0xff));
		state.add_refund(100);

		assert_eq!(state.get_balance(address), U256::zero());
		assert_eq!(state.get_nonce(address), 0);
		assert_eq!(state.get_state(address, H256::zero()), H256::zero());
		assert_eq!(state.get_refund(), 0);
		assert!(!state.exist(address));
	}
}
