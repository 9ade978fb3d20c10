use yvm_gasometer::Config as GasConfig;

/// Fork activation flags in force for one block.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Rules {
	pub chain_id: u64,
	pub is_homestead: bool,
	pub is_eip150: bool,
	pub is_eip155: bool,
	pub is_eip158: bool,
	pub is_byzantium: bool,
	pub is_constantinople: bool,
	/// A zero-value CALL to an account that does not exist succeeds
	/// without creating it.
	pub skip_missing_zero_value_call: bool,
}

impl Rules {
	/// Gas schedule of the latest active fork.
	pub fn gas_config(&self) -> GasConfig {
		if self.is_constantinople {
			GasConfig::constantinople()
		} else if self.is_byzantium {
			GasConfig::byzantium()
		} else if self.is_eip158 {
			GasConfig::eip158()
		} else if self.is_eip150 {
			GasConfig::eip150()
		} else if self.is_homestead {
			GasConfig::homestead()
		} else {
			GasConfig::frontier()
		}
	}
}

/// Source of the fork rules for a block height.
pub trait ChainRules {
	fn rules(&self, number: u64) -> Rules;
}

/// Fork activation heights. A fork set to `None` never activates.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
	feature = "with-serde",
	derive(serde::Serialize, serde::Deserialize),
	serde(rename_all = "camelCase", default)
)]
pub struct ChainConfig {
	pub chain_id: u64,
	pub homestead_block: Option<u64>,
	pub eip150_block: Option<u64>,
	pub eip155_block: Option<u64>,
	pub eip158_block: Option<u64>,
	pub byzantium_block: Option<u64>,
	pub constantinople_block: Option<u64>,
}

impl ChainConfig {
	/// A chain that never leaves Frontier.
	pub const fn frontier() -> Self {
		Self {
			chain_id: 1,
			homestead_block: None,
			eip150_block: None,
			eip155_block: None,
			eip158_block: None,
			byzantium_block: None,
			constantinople_block: None,
		}
	}

	/// Every fork active from genesis.
	pub const fn all_forks() -> Self {
		Self {
			chain_id: 1,
			homestead_block: Some(0),
			eip150_block: Some(0),
			eip155_block: Some(0),
			eip158_block: Some(0),
			byzantium_block: Some(0),
			constantinople_block: Some(0),
		}
	}
}

fn is_active(fork: Option<u64>, number: u64) -> bool {
	matches!(fork, Some(block) if block <= number)
}

impl ChainRules for ChainConfig {
	fn rules(&self, number: u64) -> Rules {
		let is_eip158 = is_active(self.eip158_block, number);
		Rules {
			chain_id: self.chain_id,
			is_homestead: is_active(self.homestead_block, number),
			is_eip150: is_active(self.eip150_block, number),
			is_eip155: is_active(self.eip155_block, number),
			is_eip158,
			is_byzantium: is_active(self.byzantium_block, number),
			is_constantinople: is_active(self.constantinople_block, number),
			skip_missing_zero_value_call: is_eip158,
		}
	}
}
