// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

//! Identifiers of assets and quotes.

use crate::scid_utils::scid_from_id;

use lightning::io;
use lightning::ln::msgs::DecodeError;
use lightning::util::ser::{Readable, Writeable, Writer};

use bitcoin::hex::DisplayHex;

use std::fmt;

/// The identifier of an asset carried over an asset channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetId(pub [u8; 32]);

impl Writeable for AssetId {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), io::Error> {
		self.0.write(writer)
	}
}

impl Readable for AssetId {
	fn read<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
		Ok(Self(Readable::read(reader)?))
	}
}

impl fmt::Display for AssetId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0[..].as_hex())
	}
}

/// The identifier of a negotiated price quote an HTLC refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RfqId(pub [u8; 32]);

impl RfqId {
	/// The `short_channel_id` alias under which the accepted quote is tracked.
	pub fn scid(&self) -> u64 {
		scid_from_id(&self.0)
	}
}

impl Writeable for RfqId {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), io::Error> {
		self.0.write(writer)
	}
}

impl Readable for RfqId {
	fn read<R: io::Read>(reader: &mut R) -> Result<Self, DecodeError> {
		Ok(Self(Readable::read(reader)?))
	}
}

impl fmt::Display for RfqId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0[..].as_hex())
	}
}
