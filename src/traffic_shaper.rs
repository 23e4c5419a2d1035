// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

//! Routing decisions for asset channels.

use crate::channel_data::{decode_commitment, decode_open_channel};
use crate::config::{Config, UNLIMITED_BANDWIDTH_MSAT};
use crate::htlc::{decode_htlc, AssetBalance, CustomRecords};
use crate::lifecycle::{LifecycleGuard, LifecycleState, WorkToken};
use crate::logger::{log_debug, log_error, log_info, log_trace, log_warn, LdkLogger, Logger};
use crate::rfq::{AcceptedQuote, QuoteLookup};
use crate::scid_utils::DisplayScid;
use crate::types::RfqId;
use crate::Error;

use tokio::sync::watch;

use std::sync::Arc;

/// The decisions the HTLC forwarding switch delegates for channels that carry more than just
/// bitcoin.
///
/// [`TrafficShaper::handle_traffic`] is to be called first. Only channels it claims may be
/// passed to the other methods.
pub trait TrafficShaper: Send + Sync {
	/// Returns whether the channel with the given funding blob is handled by this shaper, in
	/// which case the bandwidth returned by [`TrafficShaper::payment_bandwidth`] is to be used
	/// instead of the regular bandwidth calculation.
	///
	/// A channel without funding blob is an ordinary channel. A funding blob that can't be
	/// decoded results in an error rather than in the channel being treated as ordinary.
	fn handle_traffic(&self, funding_blob: Option<&[u8]>) -> Result<bool, Error>;

	/// Returns the bandwidth, in millisatoshis, the channel with the given commitment blob has
	/// available for the HTLC with the given HTLC blob. A return value of 0 means there is no
	/// bandwidth available.
	fn payment_bandwidth(
		&self, htlc_blob: Option<&[u8]>, commitment_blob: Option<&[u8]>,
	) -> Result<u64, Error>;

	/// Based on the custom records of an outgoing HTLC, may produce a new HTLC blob and change
	/// the amount of millisatoshis the HTLC carries.
	///
	/// Returns the amount to send and the new blob, if any.
	fn produce_htlc_extra_data(
		&self, total_amount_msat: u64, htlc_custom_records: &CustomRecords,
	) -> Result<(u64, Option<Vec<u8>>), Error>;
}

/// A [`TrafficShaper`] for nodes without asset support: every channel is an ordinary one.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTrafficShaper;

impl TrafficShaper for NoopTrafficShaper {
	fn handle_traffic(&self, _funding_blob: Option<&[u8]>) -> Result<bool, Error> {
		Ok(false)
	}

	fn payment_bandwidth(
		&self, _htlc_blob: Option<&[u8]>, _commitment_blob: Option<&[u8]>,
	) -> Result<u64, Error> {
		Ok(0)
	}

	fn produce_htlc_extra_data(
		&self, total_amount_msat: u64, _htlc_custom_records: &CustomRecords,
	) -> Result<(u64, Option<Vec<u8>>), Error> {
		Ok((total_amount_msat, None))
	}
}

/// Converts a millisatoshi amount into asset units at the given price.
///
/// Rounds to the nearest tenth of a unit before truncating to whole units. Returns `None` for a
/// zero price.
pub(crate) fn asset_units_for_msat(amount_msat: u64, msat_per_asset_unit: u64) -> Option<u64> {
	if msat_per_asset_unit == 0 {
		return None;
	}
	let tenths = u128::from(amount_msat) * 10 / u128::from(msat_per_asset_unit);
	u64::try_from(tenths / 10).ok()
}

/// A [`TrafficShaper`] making routing decisions for asset channels based on the quotes our
/// peers accepted.
///
/// Takes decisions from the moment it is built until [`AuxTrafficShaper::stop`] is called.
pub struct AuxTrafficShaper {
	config: Arc<Config>,
	quote_lookup: Arc<dyn QuoteLookup>,
	lifecycle: Arc<LifecycleGuard>,
	logger: Arc<Logger>,
}

impl AuxTrafficShaper {
	pub(crate) fn new(
		config: Arc<Config>, quote_lookup: Arc<dyn QuoteLookup>, logger: Arc<Logger>,
	) -> Self {
		let lifecycle = Arc::new(LifecycleGuard::new());
		Self { config, quote_lookup, lifecycle, logger }
	}

	/// Starts the traffic shaper. Calling it again, or after [`AuxTrafficShaper::stop`], has no
	/// effect.
	pub fn start(&self) -> Result<(), Error> {
		if self.lifecycle.start() {
			log_info!(self.logger, "Starting aux traffic shaper on {}", self.config.network);
		}
		Ok(())
	}

	/// Stops the traffic shaper.
	///
	/// Signals shutdown to everyone listening on [`AuxTrafficShaper::stop_signal`] and blocks
	/// until all outstanding work finished. Calling it again only waits for the shutdown to
	/// complete.
	pub fn stop(&self) -> Result<(), Error> {
		let began_shutdown = self.lifecycle.begin_shutdown();
		if began_shutdown {
			log_info!(self.logger, "Stopping aux traffic shaper");
		}

		self.lifecycle.wait_for_shutdown();

		if began_shutdown {
			log_info!(self.logger, "Aux traffic shaper stopped");
		}
		Ok(())
	}

	/// Returns the current lifecycle state.
	pub fn state(&self) -> LifecycleState {
		self.lifecycle.state()
	}

	/// Registers a unit of outstanding work that [`AuxTrafficShaper::stop`] waits for until the
	/// returned token is dropped.
	///
	/// Fails with [`Error::NotRunning`] once shutdown has begun.
	pub fn begin_work(&self) -> Result<WorkToken, Error> {
		self.lifecycle.enter()
	}

	/// Returns a receiver whose value turns `true` once shutdown has begun.
	pub fn stop_signal(&self) -> watch::Receiver<bool> {
		self.lifecycle.stop_signal()
	}

	fn accepted_quote(&self, rfq_id: &RfqId) -> Result<AcceptedQuote, Error> {
		let scid = rfq_id.scid();
		self.quote_lookup.accepted_sell_quote(scid).ok_or_else(|| {
			log_error!(
				self.logger,
				"No accepted quote found for RFQ ID {} (SCID {})",
				rfq_id,
				DisplayScid(scid)
			);
			Error::QuoteNotFound
		})
	}
}

impl TrafficShaper for AuxTrafficShaper {
	fn handle_traffic(&self, funding_blob: Option<&[u8]>) -> Result<bool, Error> {
		let _work = self.lifecycle.enter()?;

		// No auxiliary blob means an ordinary channel we don't need to handle.
		let funding_bytes = match funding_blob {
			Some(bytes) => bytes,
			None => return Ok(false),
		};

		// Only a blob that decodes as open-channel record makes this an asset channel.
		decode_open_channel(funding_bytes).map_err(|e| {
			log_error!(self.logger, "Failed to decode channel funding blob: {:?}", e);
			Error::InvalidFundingBlob
		})?;

		Ok(true)
	}

	fn payment_bandwidth(
		&self, htlc_blob: Option<&[u8]>, commitment_blob: Option<&[u8]>,
	) -> Result<u64, Error> {
		let _work = self.lifecycle.enter()?;

		// We're only to be called for asset channels, which always come with both blobs.
		let (htlc_bytes, commitment_bytes) = match (htlc_blob, commitment_blob) {
			(Some(htlc_bytes), Some(commitment_bytes)) => (htlc_bytes, commitment_bytes),
			_ => {
				log_error!(
					self.logger,
					"No commitment or HTLC blob available for custom channel bandwidth estimation"
				);
				return Err(Error::MissingShaperInputs);
			},
		};

		let commitment = decode_commitment(commitment_bytes).map_err(|e| {
			log_error!(self.logger, "Failed to decode commitment blob: {:?}", e);
			Error::InvalidCommitmentBlob
		})?;

		let htlc = decode_htlc(htlc_bytes).map_err(|e| {
			log_error!(self.logger, "Failed to decode HTLC blob: {:?}", e);
			Error::InvalidHtlcBlob
		})?;

		let local_balance = commitment.local_balance().ok_or_else(|| {
			log_error!(self.logger, "Local asset balance of commitment overflows");
			Error::AmountOverflow
		})?;

		// An amount set in the HTLC means a direct keysend that doesn't need any conversion, so
		// comparing it to our balance is all there is to do. We can't express the asset amount in
		// millisatoshis without a quote, so all we can do is signal that there is bandwidth.
		let htlc_asset_amount = htlc.amount_sum();
		if htlc_asset_amount != 0 && htlc_asset_amount <= local_balance {
			log_trace!(
				self.logger,
				"HTLC asset amount {} covered by local balance {}",
				htlc_asset_amount,
				local_balance
			);
			return Ok(UNLIMITED_BANDWIDTH_MSAT);
		}

		// Without asset amount and RFQ ID the HTLC is incomplete and we can't tell whether this
		// channel is usable.
		let rfq_id = match htlc.rfq_id {
			Some(rfq_id) => rfq_id,
			None => return Ok(0),
		};

		let quote = self.accepted_quote(&rfq_id)?;

		// The bandwidth is our local asset balance expressed in millisatoshis.
		local_balance.checked_mul(quote.bid_price_msat).ok_or_else(|| {
			log_error!(
				self.logger,
				"Bandwidth of local balance {} at {} msat per asset unit overflows",
				local_balance,
				quote.bid_price_msat
			);
			Error::AmountOverflow
		})
	}

	fn produce_htlc_extra_data(
		&self, total_amount_msat: u64, htlc_custom_records: &CustomRecords,
	) -> Result<(u64, Option<Vec<u8>>), Error> {
		let _work = self.lifecycle.enter()?;

		if htlc_custom_records.is_empty() {
			return Ok((total_amount_msat, None));
		}

		let htlc_blob = htlc_custom_records.serialize().map_err(|e| {
			log_error!(self.logger, "Failed to serialize HTLC custom records: {}", e);
			e
		})?;

		let mut htlc = decode_htlc(&htlc_blob).map_err(|e| {
			log_error!(self.logger, "Failed to decode HTLC blob: {:?}", e);
			Error::InvalidHtlcBlob
		})?;

		// An asset amount already being set means a keysend payment we must not re-price, so we
		// leave the on-chain amount untouched, too.
		if htlc.amount_sum() > 0 {
			return Ok((total_amount_msat, Some(htlc_blob)));
		}

		let rfq_id = htlc.rfq_id.ok_or_else(|| {
			log_error!(self.logger, "No RFQ ID present in HTLC blob");
			Error::MissingRfqId
		})?;

		let quote = self.accepted_quote(&rfq_id)?;

		let num_asset_units = asset_units_for_msat(total_amount_msat, quote.bid_price_msat)
			.ok_or_else(|| {
				log_error!(
					self.logger,
					"Accepted quote for RFQ ID {} has invalid bid price {}",
					rfq_id,
					quote.bid_price_msat
				);
				Error::InvalidQuotePrice
			})?;

		// The recipient matches the asset ID back to the quote.
		let asset_id = quote.asset_id.ok_or_else(|| {
			log_error!(self.logger, "Accepted quote for RFQ ID {} has no asset ID", rfq_id);
			Error::QuoteMissingAssetId
		})?;

		if num_asset_units == 0 {
			log_warn!(
				self.logger,
				"HTLC amount of {} msat is worth less than one unit of asset {}",
				total_amount_msat,
				asset_id
			);
		}

		log_debug!(
			self.logger,
			"Producing HTLC extra data for RFQ ID {} (SCID {}): asset ID {}, asset amount {}",
			rfq_id,
			DisplayScid(rfq_id.scid()),
			asset_id,
			num_asset_units
		);

		// The value now travels in asset units, on-chain we only carry what keeps the HTLC output
		// above dust.
		let on_chain_amount_msat = self.config.on_chain_htlc_amount_msat().ok_or_else(|| {
			log_error!(
				self.logger,
				"On-chain HTLC amount of {} sat overflows",
				self.config.on_chain_htlc_amount_sat
			);
			Error::AmountOverflow
		})?;

		htlc.amounts = vec![AssetBalance::new(asset_id, num_asset_units)];
		Ok((on_chain_amount_msat, Some(htlc.encode())))
	}
}
