use primitive_types::{H160, H256, U256};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use yvm::backend::EMPTY_CODE_HASH;
use yvm::{
	ChainConfig, Config, Context, Contract, Engine, EngineBuilder, ExitError, ExitReason,
	ExitRevert, ExitSucceed, Handler, Interpreter, MemoryAccount, MemoryState, NoopState,
	Opcode, StateDB, Tracer, noop_can_transfer, noop_transfer,
};

const GAS: u64 = 1_000_000;

fn sender() -> H160 {
	H160::repeat_byte(0x5e)
}

fn push20(address: H160) -> String {
	format!("73{}", hex::encode(address))
}

fn code(parts: &[&str]) -> Vec<u8> {
	hex::decode(parts.concat()).unwrap()
}

fn account(balance: u64, code: Vec<u8>) -> MemoryAccount {
	MemoryAccount {
		balance: U256::from(balance),
		code,
		..Default::default()
	}
}

fn state(accounts: Vec<(H160, MemoryAccount)>) -> MemoryState {
	let mut map = BTreeMap::new();
	map.insert(sender(), account(1_000_000, Vec::new()));
	for (address, account) in accounts {
		map.insert(address, account);
	}
	MemoryState::new(map)
}

fn slot(state: &MemoryState, address: H160, key: u64) -> U256 {
	U256::from_big_endian(state.get_state(address, H256::from_low_u64_be(key)).as_bytes())
}

fn address_word(address: H160) -> U256 {
	U256::from_big_endian(H256::from(address).as_bytes())
}

fn call(
	state: &mut MemoryState,
	chain: &ChainConfig,
	to: H160,
	input: Vec<u8>,
	gas: u64,
	value: U256,
) -> yvm::CallOutcome {
	let mut engine = EngineBuilder::new(Context::default(), state, chain).build();
	engine.call(sender(), to, input, gas, value)
}

#[test]
fn call_depth_is_bounded() {
	// slot0 += 1, then call self with all gas.
	let counter = H160::repeat_byte(0xc0);
	let body = code(&[
		"600054",
		"600101",
		"600055",
		"6000600060006000",
		"6000",
		"30",
		"5a",
		"f1",
		"00",
	]);
	let mut state = state(vec![(counter, account(0, body))]);
	let chain = ChainConfig::all_forks();

	let outcome = {
		let config = Config {
			call_stack_limit: 4,
			..Default::default()
		};
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain)
			.config(config)
			.build();
		engine.call(sender(), counter, Vec::new(), GAS, U256::zero())
	};

	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(slot(&state, counter, 0), U256::from(5));
}

#[test]
fn call_without_funds_changes_nothing() {
	let receiver = H160::repeat_byte(0x0e);
	let mut accounts = BTreeMap::new();
	accounts.insert(sender(), account(50, Vec::new()));
	accounts.insert(receiver, account(0, Vec::new()));
	let mut state = MemoryState::new(accounts);
	let before = state.accounts().clone();

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		receiver,
		Vec::new(),
		100_000,
		U256::from(100),
	);

	assert_eq!(outcome.reason, ExitError::InsufficientBalance.into());
	assert_eq!(outcome.gas_left, 100_000);
	assert_eq!(state.accounts(), &before);
	assert_eq!(state.get_balance(sender()), U256::from(50));
}

#[test]
fn value_transfer() {
	let receiver = H160::repeat_byte(0x0e);
	let mut state = state(vec![]);

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		receiver,
		Vec::new(),
		21_000,
		U256::from(300),
	);

	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(outcome.gas_left, 21_000);
	assert_eq!(state.get_balance(receiver), U256::from(300));
	assert_eq!(state.get_balance(sender()), U256::from(1_000_000 - 300));
}

// Stores CALLER at slot 0 and CALLVALUE at slot 1.
fn identity_recorder() -> Vec<u8> {
	code(&["33600055", "34600155", "00"])
}

#[test]
fn delegatecall_writes_the_callers_storage() {
	let target = H160::repeat_byte(0x7a);
	let proxy = H160::repeat_byte(0x9a);
	let proxy_code = code(&[
		"6000600060006000",
		&push20(target),
		"5a",
		"f4",
		"600255",
		"00",
	]);
	let mut state = state(vec![
		(target, account(0, identity_recorder())),
		(proxy, account(0, proxy_code)),
	]);

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		proxy,
		Vec::new(),
		GAS,
		U256::from(7),
	);

	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(slot(&state, proxy, 0), address_word(sender()));
	assert_eq!(slot(&state, proxy, 1), U256::from(7));
	assert_eq!(slot(&state, proxy, 2), U256::one());
	assert!(state.account(target).unwrap().storage.is_empty());
}

#[test]
fn callcode_runs_as_the_caller() {
	let target = H160::repeat_byte(0x7a);
	let proxy = H160::repeat_byte(0x9c);
	let proxy_code = code(&[
		"6000600060006000",
		"6000",
		&push20(target),
		"5a",
		"f2",
		"600255",
		"00",
	]);
	let mut state = state(vec![
		(target, account(0, identity_recorder())),
		(proxy, account(0, proxy_code)),
	]);

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		proxy,
		Vec::new(),
		GAS,
		U256::from(7),
	);

	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(slot(&state, proxy, 0), address_word(proxy));
	assert_eq!(slot(&state, proxy, 1), U256::zero());
	assert_eq!(slot(&state, proxy, 2), U256::one());
	assert!(state.account(target).unwrap().storage.is_empty());
}

// SSTORE slot0 = 1.
fn writer() -> Vec<u8> {
	code(&["6001600055", "00"])
}

#[test]
fn static_call_forbids_writes() {
	let target = H160::repeat_byte(0x3a);
	let mut state = state(vec![(target, account(0, writer()))]);
	let before = state.accounts().clone();
	let chain = ChainConfig::all_forks();

	let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain).build();
	let outcome = engine.static_call(sender(), target, Vec::new(), 100_000);
	assert_eq!(outcome.reason, ExitError::WriteProtection.into());
	assert_eq!(outcome.gas_left, 0);
	assert!(!engine.is_read_only());
	drop(engine);

	assert_eq!(state.accounts(), &before);
}

#[test]
fn read_only_reaches_nested_calls() {
	let outer = H160::repeat_byte(0x51);
	let inner = H160::repeat_byte(0x52);
	let target = H160::repeat_byte(0x3a);

	// STATICCALL inner with a 32-byte return buffer, store its status at
	// slot 0 and the returned word at slot 1.
	let outer_code = code(&[
		"6020600060006000",
		&push20(inner),
		"5a",
		"fa",
		"600055",
		"600051",
		"600155",
		"00",
	]);
	// Plain zero-value CALL to the writer, return whether it failed.
	let inner_code = code(&[
		"6000600060006000",
		"6000",
		&push20(target),
		"5a",
		"f1",
		"15",
		"600052",
		"60206000f3",
	]);
	let mut state = state(vec![
		(outer, account(0, outer_code)),
		(inner, account(0, inner_code)),
		(target, account(0, writer())),
	]);

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		outer,
		Vec::new(),
		GAS,
		U256::zero(),
	);

	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(slot(&state, outer, 0), U256::one());
	assert_eq!(slot(&state, outer, 1), U256::one());
	assert!(state.account(target).unwrap().storage.is_empty());
}

#[test]
fn revert_keeps_the_remaining_gas() {
	let target = H160::repeat_byte(0x4e);
	let mut state = state(vec![(target, account(0, code(&["6001600055", "60006000fd"])))]);
	let before = state.accounts().clone();

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		target,
		Vec::new(),
		100_000,
		U256::zero(),
	);

	assert_eq!(outcome.reason, ExitRevert::Reverted.into());
	assert_eq!(outcome.gas_left, 100_000 - 20_012);
	assert!(outcome.output.is_empty());
	assert_eq!(state.accounts(), &before);
}

#[test]
fn fault_forfeits_gas_and_rolls_back() {
	let target = H160::repeat_byte(0x4f);
	let mut state = state(vec![(target, account(0, code(&["6001600055", "fe"])))]);
	let before = state.accounts().clone();

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		target,
		Vec::new(),
		100_000,
		U256::from(10),
	);

	assert!(matches!(
		outcome.reason,
		ExitReason::Error(ExitError::InvalidOpcode(_))
	));
	assert_eq!(outcome.gas_left, 0);
	assert_eq!(state.accounts(), &before);
}

#[test]
fn failed_subcall_is_rolled_back_alone() {
	let caller = H160::repeat_byte(0xca);
	let failing = H160::repeat_byte(0x4f);
	// CALL the failing contract, store its status at slot 0 and 42 at slot 1.
	let caller_code = code(&[
		"6000600060006000",
		"6000",
		&push20(failing),
		"5a",
		"f1",
		"600055",
		"602a600155",
		"00",
	]);
	let mut state = state(vec![
		(caller, account(0, caller_code)),
		(failing, account(0, code(&["6001600055", "fe"]))),
	]);

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		caller,
		Vec::new(),
		GAS,
		U256::zero(),
	);

	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(slot(&state, caller, 0), U256::zero());
	assert_eq!(slot(&state, caller, 1), U256::from(42));
	assert!(state.account(failing).unwrap().storage.is_empty());
}

// Init code returning one zero byte.
fn tiny_init() -> Vec<u8> {
	code(&["60016000f3"])
}

#[test]
fn create2_address_is_independent_of_the_nonce() {
	let salt = H256::repeat_byte(0x11);
	let expected = Engine::create2_address(sender(), salt, &tiny_init());
	let mut state = state(vec![]);
	state.set_nonce(sender(), 9);
	let chain = ChainConfig::all_forks();

	let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain).build();
	let first = engine.create2(sender(), tiny_init(), 100_000, U256::zero(), salt);
	assert_eq!(first.reason, ExitSucceed::Returned.into());
	assert_eq!(first.address, Some(expected));

	let second = engine.create2(sender(), tiny_init(), 100_000, U256::zero(), salt);
	assert_eq!(second.reason, ExitError::ContractAddressCollision.into());
	assert_eq!(second.gas_left, 0);
	drop(engine);

	assert_eq!(state.get_code(expected), vec![0x00]);
	assert_eq!(state.get_nonce(expected), 1);
	assert_eq!(state.get_nonce(sender()), 10);
}

#[test]
fn create_charges_for_the_deployed_code() {
	let mut state = state(vec![]);
	let chain = ChainConfig::all_forks();
	let expected = Engine::create_address(sender(), 0);

	let outcome = {
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain).build();
		engine.create(sender(), tiny_init(), 100_000, U256::from(5))
	};

	assert_eq!(outcome.reason, ExitSucceed::Returned.into());
	assert_eq!(outcome.address, Some(expected));
	assert_eq!(outcome.output, vec![0x00]);
	// Two pushes, one word of memory and 200 for the deployed byte.
	assert_eq!(outcome.gas_left, 100_000 - 3 - 3 - 3 - 200);
	assert_eq!(state.get_balance(expected), U256::from(5));
	assert_eq!(state.get_nonce(sender()), 1);
}

#[test]
fn create_refused_up_front_has_no_address() {
	let mut state = state(vec![]);
	let chain = ChainConfig::all_forks();

	let outcome = {
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain).build();
		engine.create(sender(), tiny_init(), 100_000, U256::from(2_000_000))
	};

	assert_eq!(outcome.reason, ExitError::InsufficientBalance.into());
	assert_eq!(outcome.address, None);
	assert_eq!(outcome.gas_left, 100_000);
	assert_eq!(state.get_nonce(sender()), 0);
}

// Store BLOCKHASH(NUMBER - 1) in slot 0 and mark slot 1.
fn previous_hash_recorder() -> Vec<u8> {
	code(&["43", "6001", "90", "03", "40", "600055", "6001600155", "00"])
}

#[test]
fn blockhash_reads_the_recent_window() {
	let reader = H160::repeat_byte(0xb1);
	let mut state = state(vec![(reader, account(0, previous_hash_recorder()))]);
	let chain = ChainConfig::all_forks();
	let context = Context {
		block_number: U256::from(300),
		get_hash: Arc::new(|number| H256::from_low_u64_be(number + 1)),
		..Default::default()
	};

	let outcome = {
		let mut engine = EngineBuilder::new(context, &mut state, &chain).build();
		engine.call(sender(), reader, Vec::new(), GAS, U256::zero())
	};

	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(slot(&state, reader, 0), U256::from(300));
}

#[test]
fn blockhash_beyond_u64_heights_is_zero() {
	let reader = H160::repeat_byte(0xb2);
	let mut state = state(vec![(reader, account(0, previous_hash_recorder()))]);
	let chain = ChainConfig::all_forks();
	let context = Context {
		block_number: U256::from(u64::MAX) + U256::from(300),
		get_hash: Arc::new(|_| H256::repeat_byte(0x11)),
		..Default::default()
	};

	let outcome = {
		let mut engine = EngineBuilder::new(context, &mut state, &chain).build();
		engine.call(sender(), reader, Vec::new(), GAS, U256::zero())
	};

	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(slot(&state, reader, 0), U256::zero());
	assert_eq!(slot(&state, reader, 1), U256::one());
}

#[test]
fn oversized_code_is_rejected() {
	// RETURN 25000 bytes of zeroed memory.
	let init = code(&["6161a8", "6000", "f3"]);
	let mut state = state(vec![]);
	let before = state.accounts().clone();
	let chain = ChainConfig::all_forks();
	let address = Engine::create_address(sender(), 0);

	let outcome = {
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain).build();
		engine.create(sender(), init, 10_000_000, U256::zero())
	};

	assert_eq!(outcome.reason, ExitError::MaxCodeSizeExceeded.into());
	assert_eq!(outcome.gas_left, 0);
	assert!(!state.exist(address));
	assert_eq!(state.get_nonce(sender()), 0);
	assert_eq!(state.accounts(), &before);
}

fn homestead() -> ChainConfig {
	ChainConfig {
		homestead_block: Some(0),
		..ChainConfig::frontier()
	}
}

#[test]
fn code_store_out_of_gas_depends_on_the_fork() {
	// RETURN 100 bytes, which costs 20000 to deposit.
	let init = code(&["6064", "6000", "f3"]);
	let address = Engine::create_address(sender(), 0);

	let mut state_homestead = state(vec![]);
	let outcome = {
		let chain = homestead();
		let mut engine =
			EngineBuilder::new(Context::default(), &mut state_homestead, &chain).build();
		engine.create(sender(), init.clone(), 10_000, U256::zero())
	};
	assert_eq!(outcome.reason, ExitError::CodeStoreOutOfGas.into());
	assert_eq!(outcome.gas_left, 0);
	assert!(!state_homestead.exist(address));
	assert_eq!(state_homestead.get_nonce(sender()), 0);

	let mut state_frontier = state(vec![]);
	let outcome = {
		let chain = ChainConfig::frontier();
		let mut engine =
			EngineBuilder::new(Context::default(), &mut state_frontier, &chain).build();
		engine.create(sender(), init, 10_000, U256::zero())
	};
	assert_eq!(outcome.reason, ExitError::CodeStoreOutOfGas.into());
	// Two pushes and four words of memory.
	assert_eq!(outcome.gas_left, 10_000 - 18);
	assert!(state_frontier.exist(address));
	assert!(state_frontier.get_code(address).is_empty());
	assert_eq!(state_frontier.get_nonce(sender()), 1);
}

#[test]
fn contract_creates_contract() {
	let factory = H160::repeat_byte(0xfa);
	// Place the tiny init code in memory, CREATE it, store the address.
	let factory_code = code(&[
		"6460016000f3",
		"600052",
		"6005601b6000f0",
		"600055",
		"00",
	]);
	let mut state = state(vec![(factory, account(0, factory_code))]);
	let child = Engine::create_address(factory, 0);

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		factory,
		Vec::new(),
		GAS,
		U256::zero(),
	);

	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(slot(&state, factory, 0), address_word(child));
	assert_eq!(state.get_code(child), vec![0x00]);
	assert_eq!(state.get_nonce(child), 1);
	assert_eq!(state.get_nonce(factory), 1);
}

#[test]
fn precompile_dispatch() {
	let identity = H160::from_low_u64_be(4);
	let mut state = state(vec![]);

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		identity,
		b"hello".to_vec(),
		100,
		U256::zero(),
	);
	assert_eq!(outcome.reason, ExitSucceed::Returned.into());
	assert_eq!(outcome.output, b"hello".to_vec());
	assert_eq!(outcome.gas_left, 100 - 18);

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		identity,
		b"hello".to_vec(),
		10,
		U256::zero(),
	);
	assert_eq!(outcome.reason, ExitError::OutOfGas.into());
	assert_eq!(outcome.gas_left, 0);
}

#[test]
fn precompile_table_follows_byzantium() {
	let modexp = H160::from_low_u64_be(5);
	let mut state = state(vec![]);

	let outcome = call(
		&mut state,
		&homestead(),
		modexp,
		vec![0; 96],
		100_000,
		U256::zero(),
	);
	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert!(outcome.output.is_empty());
	assert_eq!(outcome.gas_left, 100_000);
}

#[test]
fn zero_value_call_to_missing_account() {
	let missing = H160::repeat_byte(0x99);

	let mut state_eip158 = state(vec![]);
	let outcome = call(
		&mut state_eip158,
		&ChainConfig::all_forks(),
		missing,
		Vec::new(),
		5_000,
		U256::zero(),
	);
	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(outcome.gas_left, 5_000);
	assert!(!state_eip158.exist(missing));

	let mut state_frontier = state(vec![]);
	let outcome = call(
		&mut state_frontier,
		&ChainConfig::frontier(),
		missing,
		Vec::new(),
		5_000,
		U256::zero(),
	);
	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert!(state_frontier.exist(missing));
}

// JUMPDEST, PUSH1 0, JUMP.
fn endless_loop() -> Vec<u8> {
	code(&["5b600056"])
}

#[test]
fn cancelled_engine_aborts() {
	let looping = H160::repeat_byte(0x10);
	let mut state = state(vec![(looping, account(0, endless_loop()))]);
	let chain = ChainConfig::all_forks();

	let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain).build();
	engine.cancel();
	let outcome = engine.call(sender(), looping, Vec::new(), GAS, U256::zero());
	assert_eq!(outcome.reason, ExitError::Aborted.into());
	assert_eq!(outcome.gas_left, 0);
}

#[test]
fn abort_from_another_thread() {
	let looping = H160::repeat_byte(0x10);
	let mut state = state(vec![(looping, account(0, endless_loop()))]);
	let chain = ChainConfig::all_forks();

	let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain).build();
	let handle = engine.abort_handle();
	let canceller = std::thread::spawn(move || {
		std::thread::sleep(Duration::from_millis(50));
		handle.abort();
	});

	let outcome = engine.call(sender(), looping, Vec::new(), u64::MAX / 2, U256::zero());
	canceller.join().unwrap();
	assert_eq!(outcome.reason, ExitError::Aborted.into());
}

#[derive(Default)]
struct RecordingTracer {
	starts: Vec<(H160, H160, bool)>,
	ends: Vec<(u64, ExitReason)>,
}

impl Tracer for RecordingTracer {
	fn capture_start(
		&mut self,
		from: H160,
		to: H160,
		create: bool,
		_input: &[u8],
		_gas: u64,
		_value: U256,
	) {
		self.starts.push((from, to, create));
	}

	fn capture_end(&mut self, _output: &[u8], gas_used: u64, _elapsed: Duration, reason: ExitReason) {
		self.ends.push((gas_used, reason));
	}
}

#[test]
fn tracer_sees_only_the_top_level_frame() {
	let target = H160::repeat_byte(0x7a);
	let proxy = H160::repeat_byte(0x9a);
	let faulty = H160::repeat_byte(0xfa);
	let proxy_code = code(&[
		"6000600060006000",
		&push20(target),
		"5a",
		"f4",
		"00",
	]);
	let mut state = state(vec![
		(target, account(0, identity_recorder())),
		(proxy, account(0, proxy_code)),
		(faulty, account(0, code(&["6001600055", "fe"]))),
	]);
	let chain = ChainConfig::all_forks();

	let mut tracer = RecordingTracer::default();
	{
		let config = Config {
			debug: true,
			..Default::default()
		};
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain)
			.config(config)
			.tracer(&mut tracer)
			.build();
		engine.call(sender(), proxy, Vec::new(), GAS, U256::zero());
	}
	assert_eq!(tracer.starts, vec![(sender(), proxy, false)]);
	assert_eq!(tracer.ends.len(), 1);
	assert_eq!(tracer.ends[0].1, ExitSucceed::Stopped.into());

	let mut silent = RecordingTracer::default();
	{
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain)
			.tracer(&mut silent)
			.build();
		engine.call(sender(), proxy, Vec::new(), GAS, U256::zero());
	}
	assert!(silent.starts.is_empty());
	assert!(silent.ends.is_empty());

	// A failed frame is reported with all of its gas used.
	let mut failed = RecordingTracer::default();
	let outcome = {
		let config = Config {
			debug: true,
			..Default::default()
		};
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain)
			.config(config)
			.tracer(&mut failed)
			.build();
		engine.call(sender(), faulty, Vec::new(), 100_000, U256::zero())
	};
	assert_eq!(outcome.gas_left, 0);
	assert_eq!(
		failed.ends,
		vec![(100_000, ExitError::InvalidOpcode(Opcode::INVALID).into())]
	);
}

#[test]
fn logs_carry_the_block_number() {
	let emitter = H160::repeat_byte(0xe1);
	let mut state = state(vec![(emitter, account(0, code(&["60006000a0", "00"])))]);
	let chain = ChainConfig::all_forks();
	let context = Context {
		block_number: U256::from(7),
		..Default::default()
	};

	let outcome = {
		let mut engine = EngineBuilder::new(context, &mut state, &chain).build();
		engine.call(sender(), emitter, Vec::new(), GAS, U256::zero())
	};

	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(state.logs().len(), 1);
	assert_eq!(state.logs()[0].address, emitter);
	assert_eq!(state.logs()[0].block_number, 7);
}

#[test]
fn preimages_are_recorded_on_request() {
	let hasher = H160::repeat_byte(0x5a);
	let mut state = state(vec![(hasher, account(0, code(&["6000600020", "00"])))]);
	let chain = ChainConfig::all_forks();

	{
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain).build();
		engine.call(sender(), hasher, Vec::new(), GAS, U256::zero());
	}
	assert!(state.preimages().is_empty());

	{
		let config = Config {
			enable_preimage_recording: true,
			..Default::default()
		};
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain)
			.config(config)
			.build();
		engine.call(sender(), hasher, Vec::new(), GAS, U256::zero());
	}
	assert_eq!(state.preimages().get(&EMPTY_CODE_HASH), Some(&Vec::new()));
}

#[test]
fn suicide_moves_the_balance() {
	let doomed = H160::repeat_byte(0xdd);
	let heir = H160::repeat_byte(0xee);
	let mut state = state(vec![(doomed, account(500, code(&[&push20(heir), "ff"])))]);

	let outcome = call(
		&mut state,
		&ChainConfig::all_forks(),
		doomed,
		Vec::new(),
		GAS,
		U256::zero(),
	);

	assert_eq!(outcome.reason, ExitSucceed::Suicided.into());
	assert!(state.has_suicided(doomed));
	assert_eq!(state.get_balance(doomed), U256::zero());
	assert_eq!(state.get_balance(heir), U256::from(500));
	assert_eq!(state.get_refund(), 24_000);
}

/// Accepts code starting with 0xef and answers with a fixed payload.
struct Marker;

impl Interpreter for Marker {
	fn can_run(&self, code: &[u8]) -> bool {
		code.first() == Some(&0xef)
	}

	fn run(
		&self,
		_handler: &mut dyn Handler,
		contract: &mut Contract,
		_input: &[u8],
	) -> (ExitReason, Vec<u8>) {
		contract.use_gas(100);
		(ExitSucceed::Returned.into(), b"marker".to_vec())
	}
}

#[test]
fn custom_interpreters_get_the_first_look() {
	let marked = H160::repeat_byte(0xef);
	let plain = H160::repeat_byte(0x0f);
	let mut state = state(vec![
		(marked, account(0, vec![0xef, 0x00])),
		(plain, account(0, code(&["00"]))),
	]);
	let chain = ChainConfig::all_forks();

	let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain)
		.interpreter(Rc::new(Marker))
		.build();
	assert!(engine.interpreter().is_none());

	let outcome = engine.call(sender(), marked, Vec::new(), 1_000, U256::zero());
	assert_eq!(outcome.reason, ExitSucceed::Returned.into());
	assert_eq!(outcome.output, b"marker".to_vec());
	assert_eq!(outcome.gas_left, 900);

	let outcome = engine.call(sender(), plain, Vec::new(), 1_000, U256::zero());
	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(outcome.gas_left, 1_000);
	assert!(engine.interpreter().is_none());
	assert_eq!(engine.depth(), 0);
}

#[test]
fn code_no_interpreter_accepts_forfeits_the_gas() {
	let plain = H160::repeat_byte(0x0f);
	let mut state = state(vec![(plain, account(0, code(&["00"])))]);
	let chain = ChainConfig::all_forks();

	let outcome = {
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain)
			.interpreter(Rc::new(Marker))
			.without_bytecode_interpreter()
			.build();
		engine.call(sender(), plain, Vec::new(), 1_000, U256::from(10))
	};

	assert_eq!(outcome.reason, ExitError::NoCompatibleInterpreter.into());
	assert_eq!(outcome.gas_left, 0);
	assert_eq!(state.get_balance(plain), U256::zero());
	assert_eq!(state.get_balance(sender()), U256::from(1_000_000));
}

/// Accepts code starting with 0xeb and forwards the frame to the address
/// that follows the prefix.
struct Bridge;

impl Interpreter for Bridge {
	fn can_run(&self, code: &[u8]) -> bool {
		code.len() == 21 && code[0] == 0xeb
	}

	fn run(
		&self,
		handler: &mut dyn Handler,
		contract: &mut Contract,
		input: &[u8],
	) -> (ExitReason, Vec<u8>) {
		let target = H160::from_slice(&contract.code[1..]);
		let outcome = handler.call(
			contract.address,
			target,
			input.to_vec(),
			contract.gas,
			U256::zero(),
		);
		contract.gas = outcome.gas_left;
		(outcome.reason, outcome.output)
	}
}

#[test]
fn custom_frames_call_into_bytecode() {
	let bridge = H160::repeat_byte(0xeb);
	let target = H160::repeat_byte(0x3a);
	let mut bridge_code = vec![0xeb];
	bridge_code.extend_from_slice(target.as_bytes());
	let mut state = state(vec![
		(bridge, account(0, bridge_code)),
		(target, account(0, writer())),
	]);
	let chain = ChainConfig::all_forks();

	{
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain)
			.interpreter(Rc::new(Bridge))
			.build();
		let outcome = engine.call(sender(), bridge, Vec::new(), GAS, U256::zero());
		assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
		assert_eq!(outcome.gas_left, GAS - 20_006);
		assert!(engine.interpreter().is_none());
		assert_eq!(engine.depth(), 0);
	}

	assert_eq!(slot(&state, target, 0), U256::one());
}

#[test]
fn no_recursion_skips_nested_frames() {
	let proxy = H160::repeat_byte(0x9a);
	let target = H160::repeat_byte(0x3a);
	let proxy_code = code(&[
		"6000600060006000",
		"6000",
		&push20(target),
		"5a",
		"f1",
		"600055",
		"00",
	]);
	let mut state = state(vec![
		(proxy, account(0, proxy_code)),
		(target, account(0, writer())),
	]);
	let chain = ChainConfig::all_forks();

	{
		let config = Config {
			no_recursion: true,
			..Default::default()
		};
		let mut engine = EngineBuilder::new(Context::default(), &mut state, &chain)
			.config(config)
			.build();
		let outcome = engine.call(sender(), proxy, Vec::new(), GAS, U256::zero());
		assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	}

	assert_eq!(slot(&state, proxy, 0), U256::one());
	assert!(state.account(target).unwrap().storage.is_empty());
}

#[test]
fn noop_state_runs_without_a_store() {
	let mut state = NoopState;
	let chain = ChainConfig::frontier();
	let context = Context {
		can_transfer: noop_can_transfer,
		transfer: noop_transfer,
		..Default::default()
	};
	let mut engine = EngineBuilder::new(context, &mut state, &chain).build();

	let outcome = engine.call(sender(), H160::repeat_byte(0x42), Vec::new(), 1_000, U256::from(5));
	assert_eq!(outcome.reason, ExitSucceed::Stopped.into());
	assert_eq!(outcome.gas_left, 1_000);

	let outcome = engine.create(sender(), tiny_init(), 100_000, U256::from(5));
	assert_eq!(outcome.reason, ExitSucceed::Returned.into());
	assert_eq!(outcome.address, Some(Engine::create_address(sender(), 0)));
	assert_eq!(outcome.gas_left, 100_000 - 3 - 3 - 3 - 200);
}
