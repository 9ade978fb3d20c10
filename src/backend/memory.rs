use super::{Log, Snapshot, StateDB, EMPTY_CODE_HASH};
use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};
use std::collections::BTreeMap;

/// Account information of the memory state.
#[derive(Default, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryAccount {
	/// Account nonce.
	pub nonce: u64,
	/// Account balance.
	pub balance: U256,
	/// Full account storage.
	pub storage: BTreeMap<H256, H256>,
	/// Account code.
	pub code: Vec<u8>,
	/// Whether the account self-destructed in this transaction.
	#[cfg_attr(feature = "with-serde", serde(default))]
	pub suicided: bool,
}

impl MemoryAccount {
	fn is_empty(&self) -> bool {
		self.nonce == 0 && self.balance.is_zero() && self.code.is_empty()
	}
}

#[derive(Clone, Debug)]
enum JournalEntry {
	/// Account at `address` was created or replaced.
	Account {
		address: H160,
		prev: Option<MemoryAccount>,
	},
	Balance {
		address: H160,
		prev: U256,
	},
	Nonce {
		address: H160,
		prev: u64,
	},
	Code {
		address: H160,
		prev: Vec<u8>,
	},
	Storage {
		address: H160,
		key: H256,
		prev: Option<H256>,
	},
	Suicide {
		address: H160,
		prev: bool,
		prev_balance: U256,
	},
	Refund {
		prev: u64,
	},
	Log,
	Preimage {
		hash: H256,
	},
}

/// Journaled state kept in a `BTreeMap` in memory.
///
/// Every mutation appends an undo record. A snapshot is the journal length
/// at the time it was taken.
#[derive(Clone, Debug, Default)]
pub struct MemoryState {
	accounts: BTreeMap<H160, MemoryAccount>,
	journal: Vec<JournalEntry>,
	/// Live snapshots as (id, journal length), ordered by id.
	revisions: Vec<(usize, usize)>,
	next_revision: usize,
	refund: u64,
	logs: Vec<Log>,
	preimages: BTreeMap<H256, Vec<u8>>,
}

impl MemoryState {
	/// Create a new memory state.
	pub fn new(accounts: BTreeMap<H160, MemoryAccount>) -> Self {
		Self {
			accounts,
			..Default::default()
		}
	}

	/// Get the underlying `BTreeMap` storing the state.
	pub fn accounts(&self) -> &BTreeMap<H160, MemoryAccount> {
		&self.accounts
	}

	pub fn account(&self, address: H160) -> Option<&MemoryAccount> {
		self.accounts.get(&address)
	}

	pub fn logs(&self) -> &[Log] {
		&self.logs
	}

	pub fn preimages(&self) -> &BTreeMap<H256, Vec<u8>> {
		&self.preimages
	}

	/// Account at `address`, created empty if it does not exist yet.
	fn account_mut(&mut self, address: H160) -> &mut MemoryAccount {
		if !self.accounts.contains_key(&address) {
			self.journal.push(JournalEntry::Account {
				address,
				prev: None,
			});
		}
		self.accounts.entry(address).or_default()
	}

	fn undo(&mut self, entry: JournalEntry) {
		match entry {
			JournalEntry::Account { address, prev } => match prev {
				Some(account) => {
					self.accounts.insert(address, account);
				}
				None => {
					self.accounts.remove(&address);
				}
			},
			JournalEntry::Balance { address, prev } => {
				if let Some(account) = self.accounts.get_mut(&address) {
					account.balance = prev;
				}
			}
			JournalEntry::Nonce { address, prev } => {
				if let Some(account) = self.accounts.get_mut(&address) {
					account.nonce = prev;
				}
			}
			JournalEntry::Code { address, prev } => {
				if let Some(account) = self.accounts.get_mut(&address) {
					account.code = prev;
				}
			}
			JournalEntry::Storage { address, key, prev } => {
				if let Some(account) = self.accounts.get_mut(&address) {
					match prev {
						Some(value) => account.storage.insert(key, value),
						None => account.storage.remove(&key),
					};
				}
			}
			JournalEntry::Suicide {
				address,
				prev,
				prev_balance,
			} => {
				if let Some(account) = self.accounts.get_mut(&address) {
					account.suicided = prev;
					account.balance = prev_balance;
				}
			}
			JournalEntry::Refund { prev } => self.refund = prev,
			JournalEntry::Log => {
				self.logs.pop();
			}
			JournalEntry::Preimage { hash } => {
				self.preimages.remove(&hash);
			}
		}
	}
}

impl StateDB for MemoryState {
	fn create_account(&mut self, address: H160) {
		let prev = self.accounts.get(&address).cloned();
		let balance = prev.as_ref().map(|a| a.balance).unwrap_or_default();
		self.journal.push(JournalEntry::Account { address, prev });
		self.accounts.insert(
			address,
			MemoryAccount {
				balance,
				..Default::default()
			},
		);
	}

	fn get_balance(&self, address: H160) -> U256 {
		self.accounts
			.get(&address)
			.map(|a| a.balance)
			.unwrap_or_default()
	}

	fn set_balance(&mut self, address: H160, balance: U256) {
		let account = self.account_mut(address);
		let prev = account.balance;
		account.balance = balance;
		self.journal.push(JournalEntry::Balance { address, prev });
	}

	/// A zero credit does not materialize a missing account.
	fn add_balance(&mut self, address: H160, amount: U256) {
		if amount.is_zero() && !self.accounts.contains_key(&address) {
			return;
		}
		let balance = self.get_balance(address).saturating_add(amount);
		self.set_balance(address, balance);
	}

	fn sub_balance(&mut self, address: H160, amount: U256) {
		if amount.is_zero() {
			return;
		}
		let balance = self.get_balance(address).saturating_sub(amount);
		self.set_balance(address, balance);
	}

	fn get_nonce(&self, address: H160) -> u64 {
		self.accounts.get(&address).map(|a| a.nonce).unwrap_or(0)
	}

	fn set_nonce(&mut self, address: H160, nonce: u64) {
		let account = self.account_mut(address);
		let prev = account.nonce;
		account.nonce = nonce;
		self.journal.push(JournalEntry::Nonce { address, prev });
	}

	fn get_code(&self, address: H160) -> Vec<u8> {
		self.accounts
			.get(&address)
			.map(|a| a.code.clone())
			.unwrap_or_default()
	}

	fn set_code(&mut self, address: H160, code: Vec<u8>) {
		let account = self.account_mut(address);
		let prev = std::mem::replace(&mut account.code, code);
		self.journal.push(JournalEntry::Code { address, prev });
	}

	fn get_code_hash(&self, address: H160) -> H256 {
		match self.accounts.get(&address) {
			None => H256::zero(),
			Some(account) if account.code.is_empty() => EMPTY_CODE_HASH,
			Some(account) => H256::from_slice(Keccak256::digest(&account.code).as_slice()),
		}
	}

	fn get_code_size(&self, address: H160) -> usize {
		self.accounts
			.get(&address)
			.map(|a| a.code.len())
			.unwrap_or(0)
	}

	fn get_state(&self, address: H160, key: H256) -> H256 {
		self.accounts
			.get(&address)
			.and_then(|a| a.storage.get(&key).copied())
			.unwrap_or_default()
	}

	fn set_state(&mut self, address: H160, key: H256, value: H256) {
		let account = self.account_mut(address);
		let prev = if value.is_zero() {
			account.storage.remove(&key)
		} else {
			account.storage.insert(key, value)
		};
		self.journal.push(JournalEntry::Storage { address, key, prev });
	}

	fn suicide(&mut self, address: H160) -> bool {
		let account = match self.accounts.get_mut(&address) {
			Some(account) => account,
			None => return false,
		};
		self.journal.push(JournalEntry::Suicide {
			address,
			prev: account.suicided,
			prev_balance: account.balance,
		});
		account.suicided = true;
		account.balance = U256::zero();
		true
	}

	fn has_suicided(&self, address: H160) -> bool {
		self.accounts
			.get(&address)
			.map(|a| a.suicided)
			.unwrap_or(false)
	}

	fn exist(&self, address: H160) -> bool {
		self.accounts.contains_key(&address)
	}

	fn empty(&self, address: H160) -> bool {
		self.accounts
			.get(&address)
			.map(|a| a.is_empty())
			.unwrap_or(true)
	}

	fn snapshot(&mut self) -> Snapshot {
		let id = self.next_revision;
		self.next_revision += 1;
		self.revisions.push((id, self.journal.len()));
		Snapshot(id)
	}

	fn revert_to_snapshot(&mut self, snapshot: Snapshot) {
		let index = match self
			.revisions
			.binary_search_by_key(&snapshot.0, |(id, _)| *id)
		{
			Ok(index) => index,
			Err(_) => {
				log::warn!(target: "yvm", "revert to unknown snapshot {}", snapshot.0);
				return;
			}
		};
		let (_, len) = self.revisions[index];
		self.revisions.truncate(index);

		while self.journal.len() > len {
			if let Some(entry) = self.journal.pop() {
				self.undo(entry);
			}
		}
	}

	fn add_log(&mut self, log: Log) {
		self.logs.push(log);
		self.journal.push(JournalEntry::Log);
	}

	fn add_preimage(&mut self, hash: H256, preimage: Vec<u8>) {
		if self.preimages.contains_key(&hash) {
			return;
		}
		self.preimages.insert(hash, preimage);
		self.journal.push(JournalEntry::Preimage { hash });
	}

	fn add_refund(&mut self, gas: u64) {
		self.journal.push(JournalEntry::Refund { prev: self.refund });
		self.refund = self.refund.saturating_add(gas);
	}

	fn get_refund(&self) -> u64 {
		self.refund
	}

	fn for_each_storage(&self, address: H160, f: &mut dyn FnMut(H256, H256) -> bool) {
		if let Some(account) = self.accounts.get(&address) {
			for (key, value) in &account.storage {
				if !f(*key, *value) {
					break;
				}
			}
		}
	}
}
