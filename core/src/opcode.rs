use core::fmt;

/// Opcode enum. One-to-one corresponding to an `u8` value.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Opcode(pub u8);

// Core opcodes.
impl Opcode {
	pub const STOP: Opcode = Opcode(0x00);
	pub const ADD: Opcode = Opcode(0x01);
	pub const MUL: Opcode = Opcode(0x02);
	pub const SUB: Opcode = Opcode(0x03);
	pub const DIV: Opcode = Opcode(0x04);
	pub const SDIV: Opcode = Opcode(0x05);
	pub const MOD: Opcode = Opcode(0x06);
	pub const SMOD: Opcode = Opcode(0x07);
	pub const ADDMOD: Opcode = Opcode(0x08);
	pub const MULMOD: Opcode = Opcode(0x09);
	pub const EXP: Opcode = Opcode(0x0a);
	pub const SIGNEXTEND: Opcode = Opcode(0x0b);

	pub const LT: Opcode = Opcode(0x10);
	pub const GT: Opcode = Opcode(0x11);
	pub const SLT: Opcode = Opcode(0x12);
	pub const SGT: Opcode = Opcode(0x13);
	pub const EQ: Opcode = Opcode(0x14);
	pub const ISZERO: Opcode = Opcode(0x15);
	pub const AND: Opcode = Opcode(0x16);
	pub const OR: Opcode = Opcode(0x17);
	pub const XOR: Opcode = Opcode(0x18);
	pub const NOT: Opcode = Opcode(0x19);
	pub const BYTE: Opcode = Opcode(0x1a);
	pub const SHL: Opcode = Opcode(0x1b);
	pub const SHR: Opcode = Opcode(0x1c);
	pub const SAR: Opcode = Opcode(0x1d);

	pub const CALLDATALOAD: Opcode = Opcode(0x35);
	pub const CALLDATASIZE: Opcode = Opcode(0x36);
	pub const CALLDATACOPY: Opcode = Opcode(0x37);
	pub const CODESIZE: Opcode = Opcode(0x38);
	pub const CODECOPY: Opcode = Opcode(0x39);

	pub const POP: Opcode = Opcode(0x50);
	pub const MLOAD: Opcode = Opcode(0x51);
	pub const MSTORE: Opcode = Opcode(0x52);
	pub const MSTORE8: Opcode = Opcode(0x53);
	pub const JUMP: Opcode = Opcode(0x56);
	pub const JUMPI: Opcode = Opcode(0x57);
	pub const PC: Opcode = Opcode(0x58);
	pub const MSIZE: Opcode = Opcode(0x59);
	pub const JUMPDEST: Opcode = Opcode(0x5b);

	pub const PUSH1: Opcode = Opcode(0x60);
	pub const PUSH32: Opcode = Opcode(0x7f);
	pub const DUP1: Opcode = Opcode(0x80);
	pub const DUP16: Opcode = Opcode(0x8f);
	pub const SWAP1: Opcode = Opcode(0x90);
	pub const SWAP16: Opcode = Opcode(0x9f);

	pub const RETURN: Opcode = Opcode(0xf3);
	pub const REVERT: Opcode = Opcode(0xfd);
	pub const INVALID: Opcode = Opcode(0xfe);
}

// External opcodes, resolved by the runtime against the outside world.
impl Opcode {
	pub const SHA3: Opcode = Opcode(0x20);
	pub const ADDRESS: Opcode = Opcode(0x30);
	pub const BALANCE: Opcode = Opcode(0x31);
	pub const ORIGIN: Opcode = Opcode(0x32);
	pub const CALLER: Opcode = Opcode(0x33);
	pub const CALLVALUE: Opcode = Opcode(0x34);
	pub const GASPRICE: Opcode = Opcode(0x3a);
	pub const EXTCODESIZE: Opcode = Opcode(0x3b);
	pub const EXTCODECOPY: Opcode = Opcode(0x3c);
	pub const RETURNDATASIZE: Opcode = Opcode(0x3d);
	pub const RETURNDATACOPY: Opcode = Opcode(0x3e);
	pub const EXTCODEHASH: Opcode = Opcode(0x3f);
	pub const BLOCKHASH: Opcode = Opcode(0x40);
	pub const COINBASE: Opcode = Opcode(0x41);
	pub const TIMESTAMP: Opcode = Opcode(0x42);
	pub const NUMBER: Opcode = Opcode(0x43);
	pub const DIFFICULTY: Opcode = Opcode(0x44);
	pub const GASLIMIT: Opcode = Opcode(0x45);
	pub const SLOAD: Opcode = Opcode(0x54);
	pub const SSTORE: Opcode = Opcode(0x55);
	pub const GAS: Opcode = Opcode(0x5a);
	pub const LOG0: Opcode = Opcode(0xa0);
	pub const LOG1: Opcode = Opcode(0xa1);
	pub const LOG2: Opcode = Opcode(0xa2);
	pub const LOG3: Opcode = Opcode(0xa3);
	pub const LOG4: Opcode = Opcode(0xa4);
	pub const CREATE: Opcode = Opcode(0xf0);
	pub const CALL: Opcode = Opcode(0xf1);
	pub const CALLCODE: Opcode = Opcode(0xf2);
	pub const DELEGATECALL: Opcode = Opcode(0xf4);
	pub const CREATE2: Opcode = Opcode(0xf5);
	pub const STATICCALL: Opcode = Opcode(0xfa);
	pub const SUICIDE: Opcode = Opcode(0xff);
}

impl Opcode {
	/// Whether the opcode is a push opcode, and if so, the number of
	/// immediate bytes following it.
	pub fn is_push(&self) -> Option<u8> {
		let value = self.0;
		if (0x60..=0x7f).contains(&value) {
			Some(value - 0x60 + 1)
		} else {
			None
		}
	}

	#[inline]
	pub const fn as_u8(&self) -> u8 {
		self.0
	}

	#[inline]
	pub const fn as_usize(&self) -> usize {
		self.0 as usize
	}

	/// Mnemonic of opcodes that are not part of a numbered family.
	fn mnemonic(&self) -> Option<&'static str> {
		let name = match *self {
			Opcode::STOP => "STOP",
			Opcode::ADD => "ADD",
			Opcode::MUL => "MUL",
			Opcode::SUB => "SUB",
			Opcode::DIV => "DIV",
			Opcode::SDIV => "SDIV",
			Opcode::MOD => "MOD",
			Opcode::SMOD => "SMOD",
			Opcode::ADDMOD => "ADDMOD",
			Opcode::MULMOD => "MULMOD",
			Opcode::EXP => "EXP",
			Opcode::SIGNEXTEND => "SIGNEXTEND",

			Opcode::LT => "LT",
			Opcode::GT => "GT",
			Opcode::SLT => "SLT",
			Opcode::SGT => "SGT",
			Opcode::EQ => "EQ",
			Opcode::ISZERO => "ISZERO",
			Opcode::AND => "AND",
			Opcode::OR => "OR",
			Opcode::XOR => "XOR",
			Opcode::NOT => "NOT",
			Opcode::BYTE => "BYTE",
			Opcode::SHL => "SHL",
			Opcode::SHR => "SHR",
			Opcode::SAR => "SAR",

			Opcode::SHA3 => "SHA3",

			Opcode::ADDRESS => "ADDRESS",
			Opcode::BALANCE => "BALANCE",
			Opcode::ORIGIN => "ORIGIN",
			Opcode::CALLER => "CALLER",
			Opcode::CALLVALUE => "CALLVALUE",
			Opcode::CALLDATALOAD => "CALLDATALOAD",
			Opcode::CALLDATASIZE => "CALLDATASIZE",
			Opcode::CALLDATACOPY => "CALLDATACOPY",
			Opcode::CODESIZE => "CODESIZE",
			Opcode::CODECOPY => "CODECOPY",
			Opcode::GASPRICE => "GASPRICE",
			Opcode::EXTCODESIZE => "EXTCODESIZE",
			Opcode::EXTCODECOPY => "EXTCODECOPY",
			Opcode::RETURNDATASIZE => "RETURNDATASIZE",
			Opcode::RETURNDATACOPY => "RETURNDATACOPY",
			Opcode::EXTCODEHASH => "EXTCODEHASH",

			Opcode::BLOCKHASH => "BLOCKHASH",
			Opcode::COINBASE => "COINBASE",
			Opcode::TIMESTAMP => "TIMESTAMP",
			Opcode::NUMBER => "NUMBER",
			Opcode::DIFFICULTY => "DIFFICULTY",
			Opcode::GASLIMIT => "GASLIMIT",

			Opcode::POP => "POP",
			Opcode::MLOAD => "MLOAD",
			Opcode::MSTORE => "MSTORE",
			Opcode::MSTORE8 => "MSTORE8",
			Opcode::SLOAD => "SLOAD",
			Opcode::SSTORE => "SSTORE",
			Opcode::JUMP => "JUMP",
			Opcode::JUMPI => "JUMPI",
			Opcode::PC => "PC",
			Opcode::MSIZE => "MSIZE",
			Opcode::GAS => "GAS",
			Opcode::JUMPDEST => "JUMPDEST",

			Opcode::CREATE => "CREATE",
			Opcode::CALL => "CALL",
			Opcode::CALLCODE => "CALLCODE",
			Opcode::RETURN => "RETURN",
			Opcode::DELEGATECALL => "DELEGATECALL",
			Opcode::CREATE2 => "CREATE2",
			Opcode::STATICCALL => "STATICCALL",
			Opcode::REVERT => "REVERT",
			Opcode::INVALID => "INVALID",
			Opcode::SUICIDE => "SUICIDE",
			_ => return None,
		};

		Some(name)
	}
}

impl fmt::Debug for Opcode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} (0x{:02x})", self, self.0)
	}
}

impl fmt::Display for Opcode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0 {
			0x60..=0x7f => write!(f, "PUSH{}", self.0 - 0x5f),
			0x80..=0x8f => write!(f, "DUP{}", self.0 - 0x7f),
			0x90..=0x9f => write!(f, "SWAP{}", self.0 - 0x8f),
			0xa0..=0xa4 => write!(f, "LOG{}", self.0 - 0xa0),
			_ => match self.mnemonic() {
				Some(name) => f.write_str(name),
				None => write!(f, "UNDEFINED"),
			},
		}
	}
}
