use super::AbortHandle;
use crate::backend::{Log, Snapshot, StateDB, EMPTY_CODE_HASH};
use crate::rules::Rules;
use crate::tracing::Tracer;
use crate::{Config, Context};
use log::{debug, trace};
use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};
use std::rc::Rc;
use std::time::Instant;
use yvm_core::{ExitError, ExitReason, ExitSucceed};
use yvm_gasometer::consts::G_CODEDEPOSIT;
use yvm_gasometer::Config as GasConfig;
use yvm_precompile::{precompiles, PrecompileSet};
use yvm_runtime::{CallOutcome, Contract, CreateOutcome, Handler, Interpreter};

/// Executes one transaction against a state.
///
/// Calls and creates are driven through the [`Handler`] implementation, so
/// the top-level entry and every nested frame share the same dispatch. An
/// engine is bound to the context and state of one transaction and is not
/// meant to be reused for the next one.
pub struct Engine<'a> {
	context: Context,
	state: &'a mut dyn StateDB,
	rules: Rules,
	gas_config: GasConfig,
	config: Config,
	tracer: Option<&'a mut dyn Tracer>,
	interpreters: Vec<Rc<dyn Interpreter + 'a>>,
	/// Index of the interpreter running the innermost frame.
	interpreter: Option<usize>,
	abort: AbortHandle,
	depth: usize,
	read_only: bool,
}

fn early_call(reason: ExitReason, gas: u64) -> CallOutcome {
	CallOutcome {
		reason,
		output: Vec::new(),
		gas_left: gas,
	}
}

impl<'a> Engine<'a> {
	pub(super) fn new(
		context: Context,
		state: &'a mut dyn StateDB,
		rules: Rules,
		config: Config,
		tracer: Option<&'a mut dyn Tracer>,
		interpreters: Vec<Rc<dyn Interpreter + 'a>>,
	) -> Self {
		Self {
			context,
			state,
			gas_config: rules.gas_config(),
			rules,
			config,
			tracer,
			interpreters,
			interpreter: None,
			abort: AbortHandle::default(),
			depth: 0,
			read_only: false,
		}
	}

	/// Stop execution at the next opcode of whatever frame is running.
	pub fn cancel(&self) {
		self.abort.abort();
	}

	pub fn abort_handle(&self) -> AbortHandle {
		self.abort.clone()
	}

	/// Number of interpreter frames currently running.
	pub fn depth(&self) -> usize {
		self.depth
	}

	pub fn rules(&self) -> &Rules {
		&self.rules
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn context(&self) -> &Context {
		&self.context
	}

	/// The interpreter running the innermost frame, if any.
	pub fn interpreter(&self) -> Option<Rc<dyn Interpreter + 'a>> {
		self.interpreter.map(|index| self.interpreters[index].clone())
	}

	/// Address of a contract created with CREATE.
	pub fn create_address(caller: H160, nonce: u64) -> H160 {
		let mut stream = rlp::RlpStream::new_list(2);
		stream.append(&caller);
		stream.append(&nonce);
		H256::from_slice(Keccak256::digest(&stream.out()).as_slice()).into()
	}

	/// Address of a contract created with CREATE2.
	pub fn create2_address(caller: H160, salt: H256, code: &[u8]) -> H160 {
		let code_hash = H256::from_slice(Keccak256::digest(code).as_slice());
		let mut hasher = Keccak256::new();
		hasher.update([0xff]);
		hasher.update(&caller[..]);
		hasher.update(&salt[..]);
		hasher.update(&code_hash[..]);
		H256::from_slice(hasher.finalize().as_slice()).into()
	}

	fn precompiles(&self) -> &'static dyn PrecompileSet {
		precompiles(self.rules.is_byzantium)
	}

	/// Run `f` with state changes forbidden, then restore the previous mode.
	fn with_read_only<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
		let prior = self.read_only;
		self.read_only = true;
		let result = f(self);
		self.read_only = prior;
		result
	}

	/// Run `f` with `index` as the current interpreter, then restore the
	/// previous one.
	fn with_interpreter<R>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> R) -> R {
		let prior = self.interpreter.replace(index);
		let result = f(self);
		self.interpreter = prior;
		result
	}

	/// Execute the contract's code: a precompile when the code address has
	/// one, the first interpreter accepting the code otherwise.
	fn run_code(&mut self, contract: &mut Contract, input: &[u8]) -> (ExitReason, Vec<u8>) {
		if let Some(code_address) = contract.code_address {
			if let Some(precompile) = self.precompiles().get(code_address) {
				let cost = precompile.required_gas(input);
				trace!(
					target: "yvm",
					"precompile {:?}: {} bytes of input, cost {}, gas {}",
					code_address,
					input.len(),
					cost,
					contract.gas,
				);
				if !contract.use_gas(cost) {
					return (ExitError::OutOfGas.into(), Vec::new());
				}
				return match precompile.run(input) {
					Ok(output) => (ExitSucceed::Returned.into(), output),
					Err(error) => (error.into(), Vec::new()),
				};
			}
		}

		let index = match self
			.interpreters
			.iter()
			.position(|interpreter| interpreter.can_run(&contract.code))
		{
			Some(index) => index,
			None => return (ExitError::NoCompatibleInterpreter.into(), Vec::new()),
		};
		let interpreter = self.interpreters[index].clone();

		self.with_interpreter(index, |engine| {
			engine.depth += 1;
			let result = interpreter.run(engine, contract, input);
			engine.depth -= 1;
			result
		})
	}

	/// Whether a new frame may start at the current depth.
	fn check_depth(&self) -> Result<(), ExitError> {
		if self.depth > self.config.call_stack_limit {
			debug!(target: "yvm", "call depth {} exceeds the limit", self.depth);
			return Err(ExitError::DepthExceeded);
		}
		Ok(())
	}

	fn check_transfer(&self, from: H160, value: U256) -> Result<(), ExitError> {
		if !(self.context.can_transfer)(&*self.state, from, value) {
			debug!(target: "yvm", "{:?} cannot afford to send {}", from, value);
			return Err(ExitError::InsufficientBalance);
		}
		Ok(())
	}

	/// Roll back a finished frame if it did not succeed. Returns the gas
	/// handed back to the caller.
	fn settle(&mut self, snapshot: Snapshot, reason: ExitReason, gas_left: u64) -> u64 {
		match reason {
			ExitReason::Succeed(_) => gas_left,
			ExitReason::Revert(_) => {
				self.state.revert_to_snapshot(snapshot);
				gas_left
			}
			ExitReason::Error(error) => {
				debug!(target: "yvm", "frame at depth {} failed: {}", self.depth, error);
				self.state.revert_to_snapshot(snapshot);
				0
			}
		}
	}

	fn capture_start(
		&mut self,
		from: H160,
		to: H160,
		create: bool,
		input: &[u8],
		gas: u64,
		value: U256,
	) -> Option<Instant> {
		if !self.config.debug || self.depth != 0 {
			return None;
		}
		let tracer = self.tracer.as_deref_mut()?;
		tracer.capture_start(from, to, create, input, gas, value);
		Some(Instant::now())
	}

	fn capture_end(&mut self, start: Option<Instant>, output: &[u8], gas_used: u64, reason: ExitReason) {
		if let (Some(start), Some(tracer)) = (start, self.tracer.as_deref_mut()) {
			tracer.capture_end(output, gas_used, start.elapsed(), reason);
		}
	}

	/// Load the code of `code_address`, run it as `contract` and settle the
	/// frame.
	fn execute_call(
		&mut self,
		snapshot: Snapshot,
		mut contract: Contract,
		code_address: H160,
		input: &[u8],
		read_only: bool,
	) -> CallOutcome {
		let code = self.state.get_code(code_address);
		let code_hash = self.state.get_code_hash(code_address);
		contract.set_call_code(code_address, code_hash, Rc::new(code));

		let gas = contract.gas;
		let start = self.capture_start(
			contract.caller,
			contract.address,
			false,
			input,
			gas,
			contract.value,
		);
		let (reason, output) = if read_only {
			self.with_read_only(|engine| engine.run_code(&mut contract, input))
		} else {
			self.run_code(&mut contract, input)
		};
		let gas_left = self.settle(snapshot, reason, contract.gas);
		self.capture_end(start, &output, gas.saturating_sub(gas_left), reason);

		CallOutcome {
			reason,
			output,
			gas_left,
		}
	}

	fn create_inner(
		&mut self,
		caller: H160,
		code: Vec<u8>,
		gas: u64,
		value: U256,
		address: H160,
	) -> CreateOutcome {
		let early = |reason: ExitReason, address: Option<H160>, gas_left: u64| CreateOutcome {
			reason,
			address,
			output: Vec::new(),
			gas_left,
		};

		if self.config.no_recursion && self.depth > 0 {
			return early(ExitSucceed::Stopped.into(), Some(address), gas);
		}
		if let Err(error) = self.check_depth() {
			return early(error.into(), None, gas);
		}
		if let Err(error) = self.check_transfer(caller, value) {
			return early(error.into(), None, gas);
		}

		let snapshot = self.state.snapshot();
		let nonce = self.state.get_nonce(caller);
		self.state.set_nonce(caller, nonce.saturating_add(1));

		let existing_hash = self.state.get_code_hash(address);
		if self.state.get_nonce(address) != 0
			|| (!existing_hash.is_zero() && existing_hash != EMPTY_CODE_HASH)
		{
			debug!(target: "yvm", "create collides with {:?}", address);
			self.state.revert_to_snapshot(snapshot);
			return early(ExitError::ContractAddressCollision.into(), Some(address), 0);
		}

		self.state.create_account(address);
		if self.rules.is_eip158 {
			self.state.set_nonce(address, 1);
		}
		(self.context.transfer)(
			&mut *self.state,
			caller,
			address,
			value,
			self.context.block_number,
		);

		let code_hash = H256::from_slice(Keccak256::digest(&code).as_slice());
		let mut contract = Contract::new(caller, address, value, gas);
		contract.set_code(code_hash, Rc::new(code));

		debug!(
			target: "yvm",
			"create {:?} from {:?} at depth {}, value {}, gas {}",
			address,
			caller,
			self.depth,
			value,
			gas,
		);
		let init_code = contract.code.clone();
		let start = self.capture_start(caller, address, true, &init_code, gas, value);
		let (mut reason, output) = self.run_code(&mut contract, &[]);

		let max_code_size_exceeded =
			self.rules.is_eip158 && output.len() > self.config.max_code_size;
		if reason.is_succeed() && !max_code_size_exceeded {
			let deposit = (output.len() as u64).saturating_mul(G_CODEDEPOSIT);
			if contract.use_gas(deposit) {
				self.state.set_code(address, output.clone());
			} else {
				reason = ExitError::CodeStoreOutOfGas.into();
			}
		}

		// Before Homestead a contract that cannot pay for its code is kept,
		// without code.
		let code_store_oog = reason == ExitReason::Error(ExitError::CodeStoreOutOfGas);
		if max_code_size_exceeded
			|| (!reason.is_succeed() && (self.gas_config.code_deposit_oog_fails || !code_store_oog))
		{
			self.state.revert_to_snapshot(snapshot);
			if !reason.is_revert() {
				contract.gas = 0;
			}
		}
		if max_code_size_exceeded && reason.is_succeed() {
			reason = ExitError::MaxCodeSizeExceeded.into();
		}
		self.capture_end(start, &output, gas.saturating_sub(contract.gas), reason);

		if let ExitReason::Error(error) = reason {
			debug!(target: "yvm", "create {:?} failed: {}", address, error);
		}

		CreateOutcome {
			reason,
			address: Some(address),
			output,
			gas_left: contract.gas,
		}
	}
}

impl<'a> Handler for Engine<'a> {
	fn gas_config(&self) -> &GasConfig {
		&self.gas_config
	}

	fn origin(&self) -> H160 {
		self.context.origin
	}

	fn gas_price(&self) -> U256 {
		self.context.gas_price
	}

	fn block_coinbase(&self) -> H160 {
		self.context.coinbase
	}

	fn block_number(&self) -> U256 {
		self.context.block_number
	}

	fn block_timestamp(&self) -> U256 {
		self.context.timestamp
	}

	fn block_difficulty(&self) -> U256 {
		self.context.difficulty
	}

	fn block_gas_limit(&self) -> U256 {
		self.context.gas_limit
	}

	fn block_hash(&self, number: u64) -> H256 {
		(self.context.get_hash)(number)
	}

	fn balance(&self, address: H160) -> U256 {
		self.state.get_balance(address)
	}

	fn code_size(&self, address: H160) -> U256 {
		U256::from(self.state.get_code_size(address))
	}

	fn code_hash(&self, address: H160) -> H256 {
		self.state.get_code_hash(address)
	}

	fn code(&self, address: H160) -> Vec<u8> {
		self.state.get_code(address)
	}

	fn storage(&self, address: H160, index: H256) -> H256 {
		self.state.get_state(address, index)
	}

	fn exists(&self, address: H160) -> bool {
		self.state.exist(address)
	}

	fn is_empty(&self, address: H160) -> bool {
		self.state.empty(address)
	}

	fn has_suicided(&self, address: H160) -> bool {
		self.state.has_suicided(address)
	}

	fn set_storage(&mut self, address: H160, index: H256, value: H256) {
		self.state.set_state(address, index, value);
	}

	fn add_refund(&mut self, gas: u64) {
		self.state.add_refund(gas);
	}

	fn log(&mut self, address: H160, topics: Vec<H256>, data: Vec<u8>) {
		self.state.add_log(Log {
			address,
			topics,
			data,
			block_number: self.context.block_number.low_u64(),
		});
	}

	fn mark_delete(&mut self, address: H160, target: H160) {
		let balance = self.state.get_balance(address);
		self.state.add_balance(target, balance);
		self.state.suicide(address);
	}

	fn record_preimage(&mut self, hash: H256, preimage: &[u8]) {
		if self.config.enable_preimage_recording {
			self.state.add_preimage(hash, preimage.to_vec());
		}
	}

	fn is_aborted(&self) -> bool {
		self.abort.is_aborted()
	}

	fn is_read_only(&self) -> bool {
		self.read_only
	}

	fn call(
		&mut self,
		caller: H160,
		address: H160,
		input: Vec<u8>,
		gas: u64,
		value: U256,
	) -> CallOutcome {
		if self.config.no_recursion && self.depth > 0 {
			return early_call(ExitSucceed::Stopped.into(), gas);
		}
		if let Err(error) = self.check_depth() {
			return early_call(error.into(), gas);
		}
		if let Err(error) = self.check_transfer(caller, value) {
			return early_call(error.into(), gas);
		}

		let snapshot = self.state.snapshot();
		if !self.state.exist(address) {
			if !self.precompiles().contains(address)
				&& self.rules.skip_missing_zero_value_call
				&& value.is_zero()
			{
				let start = self.capture_start(caller, address, false, &input, gas, value);
				self.capture_end(start, &[], 0, ExitSucceed::Stopped.into());
				return early_call(ExitSucceed::Stopped.into(), gas);
			}
			self.state.create_account(address);
		}
		(self.context.transfer)(
			&mut *self.state,
			caller,
			address,
			value,
			self.context.block_number,
		);

		debug!(
			target: "yvm",
			"call {:?} from {:?} at depth {}, value {}, gas {}",
			address,
			caller,
			self.depth,
			value,
			gas,
		);
		let contract = Contract::new(caller, address, value, gas);
		self.execute_call(snapshot, contract, address, &input, false)
	}

	fn call_code(
		&mut self,
		caller: H160,
		address: H160,
		input: Vec<u8>,
		gas: u64,
		value: U256,
	) -> CallOutcome {
		if self.config.no_recursion && self.depth > 0 {
			return early_call(ExitSucceed::Stopped.into(), gas);
		}
		if let Err(error) = self.check_depth() {
			return early_call(error.into(), gas);
		}
		if let Err(error) = self.check_transfer(caller, value) {
			return early_call(error.into(), gas);
		}

		let snapshot = self.state.snapshot();
		debug!(
			target: "yvm",
			"callcode {:?} as {:?} at depth {}, gas {}",
			address,
			caller,
			self.depth,
			gas,
		);
		let contract = Contract::new(caller, caller, value, gas);
		self.execute_call(snapshot, contract, address, &input, false)
	}

	fn delegate_call(
		&mut self,
		parent: &Contract,
		address: H160,
		input: Vec<u8>,
		gas: u64,
	) -> CallOutcome {
		if self.config.no_recursion && self.depth > 0 {
			return early_call(ExitSucceed::Stopped.into(), gas);
		}
		if let Err(error) = self.check_depth() {
			return early_call(error.into(), gas);
		}

		let snapshot = self.state.snapshot();
		debug!(
			target: "yvm",
			"delegatecall {:?} as {:?} at depth {}, gas {}",
			address,
			parent.address,
			self.depth,
			gas,
		);
		let contract =
			Contract::new(parent.address, parent.address, U256::zero(), gas).as_delegate(parent);
		self.execute_call(snapshot, contract, address, &input, false)
	}

	fn static_call(&mut self, caller: H160, address: H160, input: Vec<u8>, gas: u64) -> CallOutcome {
		if self.config.no_recursion && self.depth > 0 {
			return early_call(ExitSucceed::Stopped.into(), gas);
		}
		if let Err(error) = self.check_depth() {
			return early_call(error.into(), gas);
		}

		let snapshot = self.state.snapshot();
		// Touch the callee the way a zero-value transfer would.
		self.state.add_balance(address, U256::zero());

		debug!(
			target: "yvm",
			"staticcall {:?} from {:?} at depth {}, gas {}",
			address,
			caller,
			self.depth,
			gas,
		);
		let contract = Contract::new(caller, address, U256::zero(), gas);
		self.execute_call(snapshot, contract, address, &input, true)
	}

	fn create(&mut self, caller: H160, code: Vec<u8>, gas: u64, value: U256) -> CreateOutcome {
		let address = Self::create_address(caller, self.state.get_nonce(caller));
		self.create_inner(caller, code, gas, value, address)
	}

	fn create2(
		&mut self,
		caller: H160,
		code: Vec<u8>,
		gas: u64,
		value: U256,
		salt: H256,
	) -> CreateOutcome {
		let address = Self::create2_address(caller, salt, &code);
		self.create_inner(caller, code, gas, value, address)
	}
}
