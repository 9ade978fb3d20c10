//! Gas schedule of the YVM: per-fork pricing, memory expansion billing and
//! the forwarding rule for nested calls.

pub mod consts;
mod costs;
mod memory;
mod utils;

pub use crate::costs::sstore_refund;
pub use crate::memory::{memory_gas, required_words, to_word_size};

use primitive_types::{H256, U256};
use yvm_core::{ExitError, Opcode};

/// Pricing and opcode availability of one fork.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
	/// Gas paid for EXTCODESIZE and the base of EXTCODECOPY.
	pub gas_ext_code: u64,
	/// Gas paid for EXTCODEHASH.
	pub gas_ext_code_hash: u64,
	/// Gas paid for BALANCE.
	pub gas_balance: u64,
	/// Gas paid for SLOAD.
	pub gas_sload: u64,
	/// Gas paid for SUICIDE.
	pub gas_suicide: u64,
	/// Extra gas paid for SUICIDE when the beneficiary is a new account.
	pub gas_suicide_new_account: u64,
	/// Gas paid for the CALL family.
	pub gas_call: u64,
	/// Gas paid for EXP for every byte of the exponent.
	pub gas_expbyte: u64,
	/// Whether a call requesting more gas than available fails instead of
	/// being capped.
	pub err_on_call_with_more_gas: bool,
	/// Whether calls and creates forward at most all but one 64th of the gas
	/// left after paying for the opcode.
	pub call_l64_after_gas: bool,
	/// Whether an empty account counts as existing.
	pub empty_considered_exists: bool,
	/// Whether running out of gas while paying the code deposit fails the
	/// creation rather than leaving an empty contract behind.
	pub code_deposit_oog_fails: bool,
	/// Whether the VM has DELEGATECALL.
	pub has_delegate_call: bool,
	/// Whether the VM has STATICCALL.
	pub has_static_call: bool,
	/// Whether the VM has REVERT.
	pub has_revert: bool,
	/// Whether the VM has RETURNDATASIZE and RETURNDATACOPY.
	pub has_return_data: bool,
	/// Whether the VM has SHL, SHR and SAR.
	pub has_bitwise_shifting: bool,
	/// Whether the VM has EXTCODEHASH.
	pub has_ext_code_hash: bool,
	/// Whether the VM has CREATE2.
	pub has_create2: bool,
}

impl Config {
	pub const fn frontier() -> Config {
		Config {
			gas_ext_code: 20,
			gas_ext_code_hash: 20,
			gas_balance: 20,
			gas_sload: 50,
			gas_suicide: 0,
			gas_suicide_new_account: 0,
			gas_call: 40,
			gas_expbyte: 10,
			err_on_call_with_more_gas: true,
			call_l64_after_gas: false,
			empty_considered_exists: true,
			code_deposit_oog_fails: false,
			has_delegate_call: false,
			has_static_call: false,
			has_revert: false,
			has_return_data: false,
			has_bitwise_shifting: false,
			has_ext_code_hash: false,
			has_create2: false,
		}
	}

	pub const fn homestead() -> Config {
		let mut config = Self::frontier();
		config.code_deposit_oog_fails = true;
		config.has_delegate_call = true;
		config
	}

	/// Gas repricing of IO-heavy operations.
	pub const fn eip150() -> Config {
		let mut config = Self::homestead();
		config.gas_ext_code = 700;
		config.gas_ext_code_hash = 700;
		config.gas_balance = 400;
		config.gas_sload = 200;
		config.gas_suicide = 5000;
		config.gas_suicide_new_account = 25000;
		config.gas_call = 700;
		config.err_on_call_with_more_gas = false;
		config.call_l64_after_gas = true;
		config
	}

	/// State clearing: empty accounts stop counting as existing.
	pub const fn eip158() -> Config {
		let mut config = Self::eip150();
		config.gas_expbyte = 50;
		config.empty_considered_exists = false;
		config
	}

	pub const fn byzantium() -> Config {
		let mut config = Self::eip158();
		config.has_revert = true;
		config.has_return_data = true;
		config.has_static_call = true;
		config
	}

	pub const fn constantinople() -> Config {
		let mut config = Self::byzantium();
		config.gas_ext_code_hash = 400;
		config.has_bitwise_shifting = true;
		config.has_ext_code_hash = true;
		config.has_create2 = true;
		config
	}
}

/// Gas cost of an opcode whose price depends on its operands or on state.
/// State-derived inputs are looked up by the caller beforehand.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GasCost {
	Zero,
	Base,
	VeryLow,
	Low,
	Mid,
	High,
	JumpDest,

	ExtCodeSize,
	ExtCodeHash,
	Balance,
	BlockHash,
	SLoad,

	Call { value: U256, new_account: bool },
	CallCode { value: U256 },
	DelegateCall,
	StaticCall,
	Suicide { value: U256, new_account: bool },
	SStore { current: H256, new: H256 },
	Sha3 { len: U256 },
	Log { n: u8, len: U256 },
	ExtCodeCopy { len: U256 },
	VeryLowCopy { len: U256 },
	Exp { power: U256 },
	Create,
	Create2 { len: U256 },
}

/// Memory region an opcode is about to touch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MemoryCost {
	pub offset: U256,
	pub len: U256,
}

impl MemoryCost {
	/// Region whose end reaches further. Empty regions never win.
	pub fn join(self, other: MemoryCost) -> MemoryCost {
		if self.len.is_zero() {
			return other;
		}
		if other.len.is_zero() {
			return self;
		}

		let self_end = self.offset.saturating_add(self.len);
		let other_end = other.offset.saturating_add(other.len);

		if self_end >= other_end {
			self
		} else {
			other
		}
	}
}

/// Outcome of pricing a memory expansion, applied with
/// [`Gasometer::commit_memory`] once the opcode has been paid for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MemoryExpansion {
	/// Gas to charge now.
	pub cost: u64,
	/// Words covered after the expansion.
	pub words: u64,
	/// Memory fee paid in total after the expansion.
	pub total: u64,
}

/// Prices opcodes for one frame and remembers how much memory it has paid
/// for. The remaining gas itself lives with the contract being executed.
pub struct Gasometer<'config> {
	config: &'config Config,
	memory_words: u64,
	memory_gas: u64,
}

impl<'config> Gasometer<'config> {
	pub fn new(config: &'config Config) -> Self {
		Self {
			config,
			memory_words: 0,
			memory_gas: 0,
		}
	}

	#[inline]
	pub fn config(&self) -> &'config Config {
		self.config
	}

	/// Words of memory paid for so far.
	#[inline]
	pub fn memory_words(&self) -> u64 {
		self.memory_words
	}

	/// Price growing memory to cover `memory`. Memory never shrinks, so a
	/// region inside what is already paid for costs nothing.
	pub fn memory_expansion(
		&self,
		memory: Option<MemoryCost>,
	) -> Result<MemoryExpansion, ExitError> {
		let unchanged = MemoryExpansion {
			cost: 0,
			words: self.memory_words,
			total: self.memory_gas,
		};

		let words = match memory {
			Some(memory) => match required_words(memory.offset, memory.len)? {
				Some(words) => words,
				None => return Ok(unchanged),
			},
			None => return Ok(unchanged),
		};

		if words <= self.memory_words {
			return Ok(unchanged);
		}

		let total = memory_gas(words)?;
		Ok(MemoryExpansion {
			cost: total - self.memory_gas,
			words,
			total,
		})
	}

	pub fn commit_memory(&mut self, expansion: MemoryExpansion) {
		if expansion.words > self.memory_words {
			log::trace!(target: "yvm", "memory grows to {} words", expansion.words);
		}
		self.memory_words = expansion.words;
		self.memory_gas = expansion.total;
	}

	/// Price of an opcode, memory expansion excluded.
	pub fn gas_cost(&self, cost: GasCost) -> Result<u64, ExitError> {
		let config = self.config;
		Ok(match cost {
			GasCost::Call { value, new_account } => {
				costs::call_cost(value, true, true, new_account, config)
			}
			GasCost::CallCode { value } => costs::call_cost(value, true, false, false, config),
			GasCost::DelegateCall => costs::call_cost(U256::zero(), false, false, false, config),
			GasCost::StaticCall => costs::call_cost(U256::zero(), false, true, false, config),
			GasCost::Suicide { value, new_account } => {
				costs::suicide_cost(value, new_account, config)
			}
			GasCost::SStore { current, new } => costs::sstore_cost(current, new),

			GasCost::Sha3 { len } => costs::sha3_cost(len)?,
			GasCost::Log { n, len } => costs::log_cost(n, len)?,
			GasCost::ExtCodeCopy { len } => costs::extcodecopy_cost(len, config)?,
			GasCost::VeryLowCopy { len } => costs::verylowcopy_cost(len)?,
			GasCost::Exp { power } => costs::exp_cost(power, config)?,
			GasCost::Create => consts::G_CREATE,
			GasCost::Create2 { len } => costs::create2_cost(len)?,
			GasCost::JumpDest => consts::G_JUMPDEST,
			GasCost::SLoad => config.gas_sload,

			GasCost::Zero => consts::G_ZERO,
			GasCost::Base => consts::G_BASE,
			GasCost::VeryLow => consts::G_VERYLOW,
			GasCost::Low => consts::G_LOW,
			GasCost::Mid => consts::G_MID,
			GasCost::High => consts::G_HIGH,

			GasCost::ExtCodeSize => config.gas_ext_code,
			GasCost::ExtCodeHash => config.gas_ext_code_hash,
			GasCost::Balance => config.gas_balance,
			GasCost::BlockHash => consts::G_BLOCKHASH,
		})
	}

	/// Gas handed to a nested call. `available` is the gas the caller holds
	/// and `base` what the opcode costs before forwarding anything.
	pub fn call_gas(&self, available: u64, base: u64, requested: U256) -> Result<u64, ExitError> {
		if self.config.call_l64_after_gas {
			let available = available.checked_sub(base).ok_or(ExitError::OutOfGas)?;
			let capped = l64(available);
			if requested >= U256::from(capped) {
				return Ok(capped);
			}
			return Ok(requested.as_u64());
		}

		if requested > U256::from(u64::MAX) {
			return Err(ExitError::OutOfGas);
		}
		Ok(requested.as_u64())
	}
}

/// All but one 64th of `gas`.
#[inline]
pub fn l64(gas: u64) -> u64 {
	gas - gas / 64
}

/// Cost of opcodes priced by a constant alone. Opcodes that read state,
/// touch memory or scale with their operands return `None`.
pub fn static_opcode_cost(opcode: Opcode) -> Option<u64> {
	let cost = match opcode {
		Opcode::STOP | Opcode::RETURN | Opcode::REVERT => consts::G_ZERO,

		Opcode::ADDRESS
		| Opcode::ORIGIN
		| Opcode::CALLER
		| Opcode::CALLVALUE
		| Opcode::CALLDATASIZE
		| Opcode::CODESIZE
		| Opcode::GASPRICE
		| Opcode::RETURNDATASIZE
		| Opcode::COINBASE
		| Opcode::TIMESTAMP
		| Opcode::NUMBER
		| Opcode::DIFFICULTY
		| Opcode::GASLIMIT
		| Opcode::POP
		| Opcode::PC
		| Opcode::MSIZE
		| Opcode::GAS => consts::G_BASE,

		Opcode::ADD
		| Opcode::SUB
		| Opcode::NOT
		| Opcode::LT
		| Opcode::GT
		| Opcode::SLT
		| Opcode::SGT
		| Opcode::EQ
		| Opcode::ISZERO
		| Opcode::AND
		| Opcode::OR
		| Opcode::XOR
		| Opcode::BYTE
		| Opcode::SHL
		| Opcode::SHR
		| Opcode::SAR
		| Opcode::CALLDATALOAD => consts::G_VERYLOW,
		Opcode(0x60..=0x9f) => consts::G_VERYLOW,

		Opcode::MUL | Opcode::DIV | Opcode::SDIV | Opcode::MOD | Opcode::SMOD | Opcode::SIGNEXTEND => {
			consts::G_LOW
		}

		Opcode::ADDMOD | Opcode::MULMOD | Opcode::JUMP => consts::G_MID,
		Opcode::JUMPI => consts::G_HIGH,
		Opcode::JUMPDEST => consts::G_JUMPDEST,
		Opcode::BLOCKHASH => consts::G_BLOCKHASH,

		_ => return None,
	};

	Some(cost)
}
