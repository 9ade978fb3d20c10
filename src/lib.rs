//! YVM, the contract execution core of a proof-of-work Ethereum fork.
//!
//! One [`Engine`] runs one transaction: it dispatches calls and creates,
//! enforces the call depth and value transfer rules, and wraps every nested
//! frame in a state snapshot. Bytecode runs on the interpreter of
//! `yvm-runtime`, built-in contracts come from `yvm-precompile`.

#![forbid(unsafe_code)]

pub mod backend;
mod config;
mod context;
pub mod executor;
mod rules;
mod tracing;

pub use yvm_core::*;
pub use yvm_gasometer as gasometer;
pub use yvm_precompile as precompile;
pub use yvm_runtime::{
	BytecodeInterpreter, CallOutcome, Contract, CreateOutcome, Handler, Interpreter,
};

pub use crate::backend::{Log, MemoryAccount, MemoryState, NoopState, Snapshot, StateDB};
pub use crate::config::Config;
pub use crate::context::{
	can_transfer, noop_can_transfer, noop_transfer, transfer, CanTransferFn, Context, GetHashFn,
	TransferFn,
};
pub use crate::executor::{AbortHandle, Engine, EngineBuilder};
pub use crate::rules::{ChainConfig, ChainRules, Rules};
pub use crate::tracing::Tracer;
