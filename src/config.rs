// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

//! Objects for configuring the traffic shaper.

use crate::logger::LogLevel;

use bitcoin::opcodes::all::OP_PUSHNUM_1;
use bitcoin::{Amount, Network, ScriptBuf};

// Config defaults
const DEFAULT_NETWORK: Network = Network::Bitcoin;

/// The log level used by the filesystem logger if none is given.
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Debug;

/// The number of millisatoshis in the total bitcoin supply of 21M BTC. Reported as bandwidth of
/// channels whose HTLC already carries an asset amount the local balance can cover.
pub const UNLIMITED_BANDWIDTH_MSAT: u64 = 21_000_000 * 100_000_000 * 1000;

// The largest witness program allowed, used when the script of an output isn't known yet.
const MAX_WITNESS_PROGRAM_LEN: usize = 40;

/// The dust limit of an output whose script is not known in advance, i.e., of the largest
/// possible witness program (`OP_1` followed by a 40-byte push), at the default dust relay fee
/// rate.
///
/// HTLCs sent over asset channels carry at least this amount on-chain.
pub fn htlc_dust_limit() -> Amount {
	let mut script = vec![OP_PUSHNUM_1.to_u8(), MAX_WITNESS_PROGRAM_LEN as u8];
	script.extend_from_slice(&[0u8; MAX_WITNESS_PROGRAM_LEN]);
	ScriptBuf::from_bytes(script).minimal_non_dust()
}

#[derive(Debug, Clone)]
/// Represents the configuration of an [`AuxTrafficShaper`] instance.
///
/// ### Defaults
///
/// | Parameter                    | Value               |
/// |------------------------------|---------------------|
/// | `network`                    | Bitcoin             |
/// | `on_chain_htlc_amount_sat`   | [`htlc_dust_limit`] |
///
/// [`AuxTrafficShaper`]: crate::AuxTrafficShaper
pub struct Config {
	/// The used Bitcoin network.
	pub network: Network,
	/// The amount of satoshis an HTLC sent over an asset channel carries on-chain once its value
	/// has been converted to asset units.
	///
	/// **Note:** Needs to be at least [`htlc_dust_limit`], as the HTLC output would otherwise
	/// be dust, and at most [`Amount::MAX_MONEY`].
	pub on_chain_htlc_amount_sat: u64,
}

impl Config {
	/// [`Config::on_chain_htlc_amount_sat`] in millisatoshis, or `None` if it can't be
	/// represented.
	pub fn on_chain_htlc_amount_msat(&self) -> Option<u64> {
		self.on_chain_htlc_amount_sat.checked_mul(1000)
	}
}

impl Default for Config {
	fn default() -> Self {
		Self { network: DEFAULT_NETWORK, on_chain_htlc_amount_sat: htlc_dust_limit().to_sat() }
	}
}

/// Returns a [`Config`] object populated with default values.
///
/// See the documentation of [`Config`] for more information on the used defaults.
pub fn default_config() -> Config {
	Config::default()
}
