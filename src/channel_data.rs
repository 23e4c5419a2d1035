// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

//! Records attached to asset channels at funding time and on every commitment update.

use crate::types::AssetId;
use crate::util::{checked_sum, decode_exact};

use lightning::impl_writeable_tlv_based;
use lightning::ln::msgs::DecodeError;

/// An amount of a single asset held in a channel output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetOutput {
	/// The asset held in this output.
	pub asset_id: AssetId,
	/// The amount in asset units.
	pub amount: u64,
}

impl AssetOutput {
	/// Creates a new output holding `amount` units of `asset_id`.
	pub fn new(asset_id: AssetId, amount: u64) -> Self {
		Self { asset_id, amount }
	}
}

impl_writeable_tlv_based!(AssetOutput, {
	(0, asset_id, required),
	(2, amount, required),
});

/// The funding blob of an asset channel, describing the assets committed when it was opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenChannel {
	/// The assets the channel was funded with.
	pub funded_assets: Vec<AssetOutput>,
}

impl_writeable_tlv_based!(OpenChannel, {
	(0, funded_assets, required_vec),
});

/// The asset state of a single commitment transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commitment {
	/// Asset outputs paying to us.
	pub local_assets: Vec<AssetOutput>,
	/// Asset outputs paying to our counterparty.
	pub remote_assets: Vec<AssetOutput>,
}

impl Commitment {
	/// The outputs that make up our side of the channel.
	pub fn local_outputs(&self) -> &[AssetOutput] {
		&self.local_assets
	}

	/// Our balance in asset units, or `None` if it can't be represented in a `u64`.
	pub fn local_balance(&self) -> Option<u64> {
		output_sum(self.local_outputs())
	}
}

impl_writeable_tlv_based!(Commitment, {
	(0, local_assets, required_vec),
	(2, remote_assets, required_vec),
});

/// Sums up the asset units held by the given outputs.
pub fn output_sum(outputs: &[AssetOutput]) -> Option<u64> {
	checked_sum(outputs.iter().map(|o| o.amount))
}

/// Decodes a channel funding blob. A well-formed record without any funded asset is accepted.
pub fn decode_open_channel(bytes: &[u8]) -> Result<OpenChannel, DecodeError> {
	decode_exact(bytes)
}

/// Decodes a commitment blob.
pub fn decode_commitment(bytes: &[u8]) -> Result<Commitment, DecodeError> {
	decode_exact(bytes)
}
