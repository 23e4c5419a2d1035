// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

use lightning::ln::msgs::DecodeError;
use lightning::util::ser::Readable;

/// Reads a `T` from `bytes`, failing if any bytes are left over afterwards.
pub(crate) fn decode_exact<T: Readable>(bytes: &[u8]) -> Result<T, DecodeError> {
	let mut reader = bytes;
	let value = T::read(&mut reader)?;
	if !reader.is_empty() {
		return Err(DecodeError::InvalidValue);
	}
	Ok(value)
}

/// Sums up the given amounts, returning `None` on overflow.
pub(crate) fn checked_sum<I: IntoIterator<Item = u64>>(amounts: I) -> Option<u64> {
	amounts.into_iter().try_fold(0u64, |acc, amount| acc.checked_add(amount))
}
