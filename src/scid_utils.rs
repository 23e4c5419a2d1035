// This file is Copyright its original authors, visible in version control
// history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Helpers for the `short_channel_id` form of quote identifiers.

use std::fmt;

/// Maximum transaction index that can be used in a `short_channel_id`.
/// This value is based on the 3-bytes available for tx index.
pub const MAX_SCID_TX_INDEX: u64 = 0x00ffffff;

/// Maximum vout index that can be used in a `short_channel_id`. This
/// value is based on the 2-bytes available for the vout index.
pub const MAX_SCID_VOUT_INDEX: u64 = 0xffff;

/// Derives the `short_channel_id` alias of a 32-byte quote identifier, i.e., the big-endian
/// integer formed by its last 8 bytes.
pub fn scid_from_id(id: &[u8; 32]) -> u64 {
	let mut scid_bytes = [0u8; 8];
	scid_bytes.copy_from_slice(&id[24..]);
	u64::from_be_bytes(scid_bytes)
}

/// Extracts the block height (most significant 3-bytes) from the `short_channel_id`
pub fn block_from_scid(short_channel_id: u64) -> u32 {
	(short_channel_id >> 40) as u32
}

/// Extracts the tx index (bytes [2..4]) from the `short_channel_id`
pub fn tx_index_from_scid(short_channel_id: u64) -> u32 {
	((short_channel_id >> 16) & MAX_SCID_TX_INDEX) as u32
}

/// Extracts the vout (bytes [0..2]) from the `short_channel_id`
pub fn vout_from_scid(short_channel_id: u64) -> u16 {
	(short_channel_id & MAX_SCID_VOUT_INDEX) as u16
}

/// Displays a `short_channel_id` as `<integer> (<block>x<tx index>x<vout>)` in log lines.
pub(crate) struct DisplayScid(pub u64);

impl fmt::Display for DisplayScid {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"{} ({}x{}x{})",
			self.0,
			block_from_scid(self.0),
			tx_index_from_scid(self.0),
			vout_from_scid(self.0)
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scid_is_derived_from_trailing_bytes() {
		let mut id = [0xffu8; 32];
		id[24..].copy_from_slice(&[0x00, 0x0b, 0x8a, 0x16, 0x00, 0x00, 0x07, 0x01]);

		let scid = scid_from_id(&id);
		assert_eq!(scid, 0x000b_8a16_0000_0701);
		assert_eq!(block_from_scid(scid), 0x0b8a);
		assert_eq!(tx_index_from_scid(scid), 0x160000);
		assert_eq!(vout_from_scid(scid), 0x0701);
		assert_eq!(DisplayScid(scid).to_string(), format!("{} (2954x1441792x1793)", scid));
	}
}
