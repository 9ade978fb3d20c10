#![cfg(feature = "with-serde")]

use yvm::{ChainConfig, ChainRules, Config};

#[test]
fn chain_config_from_json() {
	let json = r#"{
		"chainId": 61,
		"homesteadBlock": 1150000,
		"eip150Block": 2500000,
		"eip155Block": 3000000,
		"eip158Block": 8772000
	}"#;
	let config: ChainConfig = serde_json::from_str(json).unwrap();

	assert_eq!(config.chain_id, 61);
	assert_eq!(config.eip150_block, Some(2_500_000));
	assert_eq!(config.byzantium_block, None);

	let rules = config.rules(3_000_000);
	assert!(rules.is_homestead);
	assert!(rules.is_eip155);
	assert!(!rules.is_eip158);
	assert!(!rules.skip_missing_zero_value_call);
	assert!(config.rules(8_772_000).skip_missing_zero_value_call);
}

#[test]
fn engine_config_defaults_fill_gaps() {
	let config: Config = serde_json::from_str(r#"{ "debug": true, "max_code_size": 1024 }"#).unwrap();

	assert!(config.debug);
	assert_eq!(config.max_code_size, 1024);
	assert_eq!(config.call_stack_limit, 1024);
	assert_eq!(config.stack_limit, 1024);
	assert_eq!(config.memory_limit, usize::MAX);
}
