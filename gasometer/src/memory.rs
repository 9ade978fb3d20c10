use crate::consts;
use primitive_types::U256;
use yvm_core::ExitError;

/// Fee for a memory of `words` 32-byte words, linear part plus quadratic part.
pub fn memory_gas(words: u64) -> Result<u64, ExitError> {
	consts::G_MEMORY
		.checked_mul(words)
		.ok_or(ExitError::OutOfGas)?
		.checked_add(words.checked_mul(words).ok_or(ExitError::OutOfGas)? / consts::G_QUADCOEFFDIV)
		.ok_or(ExitError::OutOfGas)
}

/// Words required to cover `offset..offset + len`. `None` when the range is
/// empty, since empty ranges never touch memory whatever their offset.
pub fn required_words(offset: U256, len: U256) -> Result<Option<u64>, ExitError> {
	if len.is_zero() {
		return Ok(None);
	}

	let end = offset.checked_add(len).ok_or(ExitError::OutOfGas)?;
	if end > U256::from(consts::MAX_MEMORY_SIZE) {
		return Err(ExitError::OutOfGas);
	}

	Ok(Some(to_word_size(end.as_u64())))
}

#[inline]
pub fn to_word_size(len: u64) -> u64 {
	len / 32 + u64::from(len % 32 != 0)
}
