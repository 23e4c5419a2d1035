// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

//! Access to the price quotes our peers accepted to sell us assets at.

use crate::types::{AssetId, RfqId};

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A price quote a peer accepted for selling assets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptedQuote {
	/// The identifier HTLCs use to refer to this quote.
	pub id: RfqId,
	/// The asset the quote covers.
	pub asset_id: Option<AssetId>,
	/// The price in millisatoshis per asset unit.
	pub bid_price_msat: u64,
	/// The time, in seconds since start of the UNIX epoch, at which the quote expires.
	pub expiry: u64,
}

impl AcceptedQuote {
	/// The `short_channel_id` alias under which this quote is looked up.
	pub fn scid(&self) -> u64 {
		self.id.scid()
	}

	/// Returns whether the quote has expired at the given UNIX timestamp.
	pub fn is_expired_at(&self, unix_time_secs: u64) -> bool {
		unix_time_secs >= self.expiry
	}
}

/// A read-only view on the accepted quotes, keyed by the quotes' `short_channel_id` alias.
///
/// Implementations must be cheap to query and safe to use from multiple threads concurrently.
pub trait QuoteLookup: Send + Sync {
	/// Returns the quote accepted for the given `short_channel_id`, if any.
	fn accepted_sell_quote(&self, scid: u64) -> Option<AcceptedQuote>;
}

/// An in-memory [`QuoteLookup`] that quote negotiation fills in as peers accept quotes.
///
/// Expired quotes are never returned.
pub struct AcceptedQuoteStore {
	quotes: RwLock<HashMap<u64, AcceptedQuote>>,
}

impl AcceptedQuoteStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self { quotes: RwLock::new(HashMap::new()) }
	}

	/// Adds a quote, returning the quote previously stored under the same `short_channel_id`.
	pub fn insert(&self, quote: AcceptedQuote) -> Option<AcceptedQuote> {
		let mut locked_quotes = self.quotes.write().unwrap_or_else(|e| e.into_inner());
		locked_quotes.insert(quote.scid(), quote)
	}

	/// Removes the quote stored under the given `short_channel_id`.
	pub fn remove(&self, scid: u64) -> Option<AcceptedQuote> {
		self.quotes.write().unwrap_or_else(|e| e.into_inner()).remove(&scid)
	}

	/// Drops all quotes that expired at the given UNIX timestamp, returning how many were
	/// dropped.
	pub fn prune_expired(&self, unix_time_secs: u64) -> usize {
		let mut locked_quotes = self.quotes.write().unwrap_or_else(|e| e.into_inner());
		let num_quotes = locked_quotes.len();
		locked_quotes.retain(|_, quote| !quote.is_expired_at(unix_time_secs));
		num_quotes - locked_quotes.len()
	}

	/// Returns the number of stored quotes, including expired ones not pruned yet.
	pub fn len(&self) -> usize {
		self.quotes.read().unwrap_or_else(|e| e.into_inner()).len()
	}

	/// Returns whether the store holds no quotes.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for AcceptedQuoteStore {
	fn default() -> Self {
		Self::new()
	}
}

impl QuoteLookup for AcceptedQuoteStore {
	fn accepted_sell_quote(&self, scid: u64) -> Option<AcceptedQuote> {
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.unwrap_or(Duration::from_secs(0))
			.as_secs();
		let locked_quotes = self.quotes.read().unwrap_or_else(|e| e.into_inner());
		locked_quotes.get(&scid).filter(|quote| !quote.is_expired_at(now)).cloned()
	}
}
