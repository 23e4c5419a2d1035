// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

//! The asset-related custom records carried in an HTLC's `update_add_htlc` message.

use crate::types::{AssetId, RfqId};
use crate::util::{checked_sum, decode_exact};

use lightning::impl_writeable_tlv_based;
use lightning::io;
use lightning::ln::msgs::DecodeError;
use lightning::util::ser::{BigSize, Readable, Writeable, Writer};

use std::collections::BTreeMap;

/// The lowest TLV type that may be used for HTLC custom records.
pub const MIN_CUSTOM_RECORD_TYPE: u64 = 65536;

/// The custom record type holding the asset amounts of an HTLC.
pub const HTLC_AMOUNTS_TYPE: u64 = 65536;

/// The custom record type holding the RFQ ID an HTLC refers to.
pub const HTLC_RFQ_ID_TYPE: u64 = 65538;

/// An amount of a single asset carried by an HTLC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetBalance {
	/// The asset being sent.
	pub asset_id: AssetId,
	/// The amount in asset units.
	pub amount: u64,
}

impl AssetBalance {
	/// Creates a new balance of `amount` units of `asset_id`.
	pub fn new(asset_id: AssetId, amount: u64) -> Self {
		Self { asset_id, amount }
	}
}

impl_writeable_tlv_based!(AssetBalance, {
	(0, asset_id, required),
	(2, amount, required),
});

// Encoded as a `BigSize` count followed by that many balances.
struct AssetBalances(Vec<AssetBalance>);

impl Writeable for AssetBalances {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), io::Error> {
		BigSize(self.0.len() as u64).write(writer)?;
		for balance in &self.0 {
			balance.write(writer)?;
		}
		Ok(())
	}
}

impl Readable for AssetBalances {
	fn read<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
		let count: BigSize = Readable::read(reader)?;
		// Every balance takes at least one byte, so a bogus count fails with a short read long
		// before we'd have to worry about its size.
		let mut balances = Vec::new();
		for _ in 0..count.0 {
			balances.push(Readable::read(reader)?);
		}
		Ok(Self(balances))
	}
}

/// The custom records of an HTLC, keyed by their TLV type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomRecords(BTreeMap<u64, Vec<u8>>);

impl CustomRecords {
	/// Creates an empty set of custom records.
	pub fn new() -> Self {
		Self(BTreeMap::new())
	}

	/// Sets the value of the record with the given type, returning the previous value if any.
	pub fn insert(&mut self, record_type: u64, value: Vec<u8>) -> Option<Vec<u8>> {
		self.0.insert(record_type, value)
	}

	/// Returns the value of the record with the given type.
	pub fn get(&self, record_type: u64) -> Option<&[u8]> {
		self.0.get(&record_type).map(|v| v.as_slice())
	}

	/// Returns the number of records.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns whether there are no records at all.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over the records in ascending type order.
	pub fn iter(&self) -> impl Iterator<Item = (u64, &[u8])> {
		self.0.iter().map(|(t, v)| (*t, v.as_slice()))
	}

	/// Serializes the records into a TLV stream.
	///
	/// Fails if any record uses a type below [`MIN_CUSTOM_RECORD_TYPE`].
	pub fn serialize(&self) -> Result<Vec<u8>, crate::Error> {
		if self.0.keys().any(|t| *t < MIN_CUSTOM_RECORD_TYPE) {
			return Err(crate::Error::InvalidCustomRecords);
		}

		let mut bytes = Vec::new();
		for (record_type, value) in self.iter() {
			write_record(&mut bytes, record_type, value);
		}
		Ok(bytes)
	}

	/// Parses a TLV stream of custom records.
	///
	/// Types must be strictly increasing and within the custom range.
	pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
		let mut reader = bytes;
		let mut records = BTreeMap::new();
		let mut last_type: Option<u64> = None;

		while !reader.is_empty() {
			let record_type: BigSize = Readable::read(&mut reader)?;
			let length: BigSize = Readable::read(&mut reader)?;

			if record_type.0 < MIN_CUSTOM_RECORD_TYPE {
				return Err(DecodeError::InvalidValue);
			}
			if last_type.map_or(false, |last| record_type.0 <= last) {
				return Err(DecodeError::InvalidValue);
			}
			last_type = Some(record_type.0);

			if length.0 > reader.len() as u64 {
				return Err(DecodeError::ShortRead);
			}
			let (value, rest) = reader.split_at(length.0 as usize);
			records.insert(record_type.0, value.to_vec());
			reader = rest;
		}

		Ok(Self(records))
	}
}

impl FromIterator<(u64, Vec<u8>)> for CustomRecords {
	fn from_iter<I: IntoIterator<Item = (u64, Vec<u8>)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

fn write_record(bytes: &mut Vec<u8>, record_type: u64, value: &[u8]) {
	bytes.extend_from_slice(&BigSize(record_type).encode());
	bytes.extend_from_slice(&BigSize(value.len() as u64).encode());
	bytes.extend_from_slice(value);
}

/// The asset-related information of an HTLC.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Htlc {
	/// The asset amounts carried by the HTLC. Empty if the HTLC has not been priced yet.
	pub amounts: Vec<AssetBalance>,
	/// The quote this HTLC refers to, if any.
	pub rfq_id: Option<RfqId>,
}

impl Htlc {
	/// Creates a new HTLC record.
	pub fn new(amounts: Vec<AssetBalance>, rfq_id: Option<RfqId>) -> Self {
		Self { amounts, rfq_id }
	}

	/// The total number of asset units carried by the HTLC.
	///
	/// Decoded records are guaranteed not to overflow, records built by hand saturate.
	pub fn amount_sum(&self) -> u64 {
		self.amounts.iter().fold(0u64, |acc, b| acc.saturating_add(b.amount))
	}

	/// Extracts the asset fields from the given custom records.
	///
	/// Unknown odd record types are ignored, unknown even ones are rejected.
	pub fn from_custom_records(records: &CustomRecords) -> Result<Self, DecodeError> {
		let mut htlc = Htlc::default();
		for (record_type, value) in records.iter() {
			match record_type {
				HTLC_AMOUNTS_TYPE => {
					let balances: AssetBalances = decode_exact(value)?;
					if checked_sum(balances.0.iter().map(|b| b.amount)).is_none() {
						return Err(DecodeError::InvalidValue);
					}
					htlc.amounts = balances.0;
				},
				HTLC_RFQ_ID_TYPE => {
					htlc.rfq_id = Some(decode_exact(value)?);
				},
				t if t % 2 == 0 => return Err(DecodeError::UnknownRequiredFeature),
				_ => {},
			}
		}
		Ok(htlc)
	}

	/// Converts the record into HTLC custom records.
	pub fn to_custom_records(&self) -> CustomRecords {
		let mut records = CustomRecords::new();
		records.insert(HTLC_AMOUNTS_TYPE, AssetBalances(self.amounts.clone()).encode());
		if let Some(rfq_id) = self.rfq_id {
			records.insert(HTLC_RFQ_ID_TYPE, rfq_id.encode());
		}
		records
	}

	/// Serializes the record into the same TLV stream [`CustomRecords::serialize`] produces.
	pub fn encode(&self) -> Vec<u8> {
		let mut bytes = Vec::new();
		for (record_type, value) in self.to_custom_records().iter() {
			write_record(&mut bytes, record_type, value);
		}
		bytes
	}
}

/// Decodes an HTLC blob.
pub fn decode_htlc(bytes: &[u8]) -> Result<Htlc, DecodeError> {
	let records = CustomRecords::decode(bytes)?;
	Htlc::from_custom_records(&records)
}
