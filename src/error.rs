// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// An error that possibly needs to be handled by the forwarding switch.
pub enum Error {
	/// Returned when the traffic shaper is not running anymore, i.e., shutdown has begun.
	NotRunning,
	/// A commitment or HTLC blob was required but not given.
	MissingShaperInputs,
	/// The given funding blob could not be decoded as an open-channel record.
	InvalidFundingBlob,
	/// The given commitment blob could not be decoded.
	InvalidCommitmentBlob,
	/// The given HTLC blob could not be decoded.
	InvalidHtlcBlob,
	/// The given HTLC custom records are invalid, e.g., use a type below the custom range.
	InvalidCustomRecords,
	/// An unpriced asset HTLC did not reference a quote.
	MissingRfqId,
	/// No accepted quote was found for the referenced quote identifier.
	QuoteNotFound,
	/// A computed amount could not be represented.
	AmountOverflow,
	/// The accepted quote carries an unusable price.
	InvalidQuotePrice,
	/// The accepted quote does not specify an asset identifier.
	QuoteMissingAssetId,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Self::NotRunning => write!(f, "Traffic shaper is shutting down or stopped."),
			Self::MissingShaperInputs => {
				write!(f, "No commitment or HTLC blob available for bandwidth estimation.")
			},
			Self::InvalidFundingBlob => write!(f, "Failed to decode the channel funding blob."),
			Self::InvalidCommitmentBlob => write!(f, "Failed to decode the commitment blob."),
			Self::InvalidHtlcBlob => write!(f, "Failed to decode the HTLC blob."),
			Self::InvalidCustomRecords => write!(f, "The given HTLC custom records are invalid."),
			Self::MissingRfqId => write!(f, "No RFQ ID present in HTLC blob."),
			Self::QuoteNotFound => write!(f, "No accepted quote found for the given RFQ ID."),
			Self::AmountOverflow => write!(f, "The computed amount overflowed."),
			Self::InvalidQuotePrice => write!(f, "The accepted quote has an invalid bid price."),
			Self::QuoteMissingAssetId => write!(f, "The accepted quote has no asset ID."),
		}
	}
}

impl std::error::Error for Error {}
