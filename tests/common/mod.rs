// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

#![cfg(test)]
#![allow(dead_code)]

pub(crate) mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use bitcoin::Network;
use ldk_asset_shaper::channel_data::{AssetOutput, Commitment, OpenChannel};
use ldk_asset_shaper::htlc::{AssetBalance, Htlc};
use ldk_asset_shaper::rfq::{AcceptedQuote, AcceptedQuoteStore};
use ldk_asset_shaper::types::{AssetId, RfqId};
use ldk_asset_shaper::{AuxTrafficShaper, Builder};
use lightning::util::ser::Writeable;
use rand::distr::Alphanumeric;
use rand::{rng, Rng};

use logging::CapturingLogWriter;

pub(crate) const ASSET: AssetId = AssetId([0xaa; 32]);

pub(crate) fn random_storage_path() -> PathBuf {
	let mut temp_path = std::env::temp_dir();
	let mut rng = rng();
	let rand_dir: String = (0..7).map(|_| rng.sample(Alphanumeric) as char).collect();
	temp_path.push(rand_dir);
	temp_path
}

/// Builds an RFQ ID whose `short_channel_id` alias is `scid`.
pub(crate) fn rfq_id_for_scid(scid: u64) -> RfqId {
	let mut id = [0u8; 32];
	rng().fill(&mut id[..24]);
	id[24..].copy_from_slice(&scid.to_be_bytes());
	RfqId(id)
}

pub(crate) fn accepted_quote(rfq_id: RfqId, bid_price_msat: u64) -> AcceptedQuote {
	AcceptedQuote { id: rfq_id, asset_id: Some(ASSET), bid_price_msat, expiry: u64::MAX }
}

pub(crate) fn funding_blob(funded_amount: u64) -> Vec<u8> {
	OpenChannel { funded_assets: vec![AssetOutput::new(ASSET, funded_amount)] }.encode()
}

pub(crate) fn commitment_blob(local_balance: u64) -> Vec<u8> {
	Commitment {
		local_assets: vec![AssetOutput::new(ASSET, local_balance)],
		remote_assets: vec![AssetOutput::new(ASSET, 1_000)],
	}
	.encode()
}

pub(crate) fn htlc_blob(asset_amount: Option<u64>, rfq_id: Option<RfqId>) -> Vec<u8> {
	let amounts =
		asset_amount.map(|amount| vec![AssetBalance::new(ASSET, amount)]).unwrap_or_default();
	Htlc::new(amounts, rfq_id).encode()
}

pub(crate) struct TestShaper {
	pub shaper: Arc<AuxTrafficShaper>,
	pub quotes: Arc<AcceptedQuoteStore>,
	pub logs: Arc<CapturingLogWriter>,
}

/// Builds and starts a shaper on regtest that logs to a [`CapturingLogWriter`].
pub(crate) fn setup_shaper(quotes: Vec<AcceptedQuote>) -> TestShaper {
	let store = Arc::new(AcceptedQuoteStore::new());
	for quote in quotes {
		store.insert(quote);
	}
	let logs = CapturingLogWriter::new();

	let mut builder = Builder::new();
	builder.set_network(Network::Regtest);
	builder.set_custom_logger(logs.clone());
	let shaper = Arc::new(builder.build(store.clone()).unwrap());
	shaper.start().unwrap();

	TestShaper { shaper, quotes: store, logs }
}
