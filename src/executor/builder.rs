use super::Engine;
use crate::backend::StateDB;
use crate::rules::ChainRules;
use crate::tracing::Tracer;
use crate::{Config, Context};
use std::rc::Rc;
use yvm_runtime::{BytecodeInterpreter, Interpreter};

/// Assembles the [`Engine`] of one transaction. Unless left out, the bytecode
/// interpreter is installed after the custom ones, so they get the first look
/// at any code.
pub struct EngineBuilder<'a> {
	context: Context,
	state: &'a mut dyn StateDB,
	chain: &'a dyn ChainRules,
	config: Config,
	tracer: Option<&'a mut dyn Tracer>,
	interpreters: Vec<Rc<dyn Interpreter + 'a>>,
	bytecode: bool,
}

impl<'a> EngineBuilder<'a> {
	pub fn new(context: Context, state: &'a mut dyn StateDB, chain: &'a dyn ChainRules) -> Self {
		Self {
			context,
			state,
			chain,
			config: Config::default(),
			tracer: None,
			interpreters: Vec::new(),
			bytecode: true,
		}
	}

	pub fn config(mut self, config: Config) -> Self {
		self.config = config;
		self
	}

	/// Tracer for the top-level frame. Only called when `config.debug` is set.
	pub fn tracer(mut self, tracer: &'a mut dyn Tracer) -> Self {
		self.tracer = Some(tracer);
		self
	}

	/// Install an interpreter ahead of the bytecode one.
	pub fn interpreter(mut self, interpreter: Rc<dyn Interpreter + 'a>) -> Self {
		self.interpreters.push(interpreter);
		self
	}

	/// Leave out the bytecode interpreter. Code no installed interpreter
	/// accepts then fails with `NoCompatibleInterpreter`.
	pub fn without_bytecode_interpreter(mut self) -> Self {
		self.bytecode = false;
		self
	}

	pub fn build(self) -> Engine<'a> {
		let rules = self.chain.rules(self.context.block_number.low_u64());
		let mut interpreters = self.interpreters;
		if self.bytecode {
			interpreters.push(Rc::new(BytecodeInterpreter::new(
				self.config.stack_limit,
				self.config.memory_limit,
			)));
		}

		log::debug!(
			target: "yvm",
			"engine for block {} on chain {}, {} interpreters",
			self.context.block_number,
			rules.chain_id,
			interpreters.len(),
		);

		Engine::new(
			self.context,
			self.state,
			rules,
			self.config,
			self.tracer,
			interpreters,
		)
	}
}
