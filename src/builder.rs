// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

use crate::config::{htlc_dust_limit, Config, DEFAULT_LOG_LEVEL};
use crate::logger::{log_debug, log_error, LdkLogger, LogLevel, LogWriter, Logger};
use crate::rfq::QuoteLookup;
use crate::traffic_shaper::AuxTrafficShaper;

use bitcoin::{Amount, Network};

use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
enum LogWriterConfig {
	File { log_file_path: String, max_log_level: Option<LogLevel> },
	Log,
	Custom(Arc<dyn LogWriter>),
}

impl std::fmt::Debug for LogWriterConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LogWriterConfig::File { max_log_level, log_file_path } => f
				.debug_struct("LogWriterConfig")
				.field("max_log_level", max_log_level)
				.field("log_file_path", log_file_path)
				.finish(),
			LogWriterConfig::Log => write!(f, "LogWriterConfig::Log"),
			LogWriterConfig::Custom(_) => {
				f.debug_tuple("Custom").field(&"<config internal to custom log writer>").finish()
			},
		}
	}
}

/// An error encountered during building an [`AuxTrafficShaper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
	/// The configured on-chain HTLC amount is below the dust limit or above the bitcoin supply.
	InvalidOnChainHtlcAmount,
	/// We failed to setup the logger.
	LoggerSetupFailed,
}

impl fmt::Display for BuildError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Self::InvalidOnChainHtlcAmount => {
				write!(f, "Given on-chain HTLC amount is outside the allowed range.")
			},
			Self::LoggerSetupFailed => write!(f, "Failed to setup the logger."),
		}
	}
}

impl std::error::Error for BuildError {}

/// A builder for an [`AuxTrafficShaper`] instance, allowing to set some configuration and module
/// choices from the getgo.
///
/// ### Defaults
/// - Logs are written to the [`log`](https://crates.io/crates/log) facade
/// - HTLCs converted to asset units carry [`htlc_dust_limit`] on-chain
#[derive(Debug)]
pub struct ShaperBuilder {
	config: Config,
	log_writer_config: Option<LogWriterConfig>,
}

impl ShaperBuilder {
	/// Creates a new builder instance with the default configuration.
	pub fn new() -> Self {
		let config = Config::default();
		Self::from_config(config)
	}

	/// Creates a new builder instance from an [`Config`].
	pub fn from_config(config: Config) -> Self {
		let log_writer_config = None;
		Self { config, log_writer_config }
	}

	/// Sets the Bitcoin network used.
	pub fn set_network(&mut self, network: Network) -> &mut Self {
		self.config.network = network;
		self
	}

	/// Sets the amount of satoshis HTLCs carry on-chain once converted to asset units.
	///
	/// Needs to be at least [`htlc_dust_limit`] and at most [`Amount::MAX_MONEY`], otherwise
	/// building fails.
	pub fn set_on_chain_htlc_amount_sat(&mut self, on_chain_htlc_amount_sat: u64) -> &mut Self {
		self.config.on_chain_htlc_amount_sat = on_chain_htlc_amount_sat;
		self
	}

	/// Configures the [`AuxTrafficShaper`] instance to write logs to the filesystem.
	///
	/// If set, the `max_log_level` sets the maximum log level. Otherwise, the latter defaults to
	/// [`DEFAULT_LOG_LEVEL`].
	///
	/// [`DEFAULT_LOG_LEVEL`]: crate::config::DEFAULT_LOG_LEVEL
	pub fn set_filesystem_logger(
		&mut self, log_file_path: String, max_log_level: Option<LogLevel>,
	) -> &mut Self {
		self.log_writer_config = Some(LogWriterConfig::File { log_file_path, max_log_level });
		self
	}

	/// Configures the [`AuxTrafficShaper`] instance to write logs to the [`log`](https://crates.io/crates/log) facade.
	pub fn set_log_facade_logger(&mut self) -> &mut Self {
		self.log_writer_config = Some(LogWriterConfig::Log);
		self
	}

	/// Configures the [`AuxTrafficShaper`] instance to write logs to the provided custom
	/// [`LogWriter`].
	pub fn set_custom_logger(&mut self, log_writer: Arc<dyn LogWriter>) -> &mut Self {
		self.log_writer_config = Some(LogWriterConfig::Custom(log_writer));
		self
	}

	/// Builds an [`AuxTrafficShaper`] instance that looks up quotes via the given
	/// [`QuoteLookup`].
	///
	/// The returned instance takes decisions right away; [`AuxTrafficShaper::start`] marks it
	/// running.
	pub fn build(
		&self, quote_lookup: Arc<dyn QuoteLookup>,
	) -> Result<AuxTrafficShaper, BuildError> {
		let logger = setup_logger(&self.log_writer_config)?;

		let dust_limit_sat = htlc_dust_limit().to_sat();
		if self.config.on_chain_htlc_amount_sat < dust_limit_sat {
			log_error!(
				logger,
				"On-chain HTLC amount of {} sat is below the dust limit of {} sat",
				self.config.on_chain_htlc_amount_sat,
				dust_limit_sat
			);
			return Err(BuildError::InvalidOnChainHtlcAmount);
		}
		if self.config.on_chain_htlc_amount_sat > Amount::MAX_MONEY.to_sat() {
			log_error!(
				logger,
				"On-chain HTLC amount of {} sat exceeds the total supply of {} sat",
				self.config.on_chain_htlc_amount_sat,
				Amount::MAX_MONEY.to_sat()
			);
			return Err(BuildError::InvalidOnChainHtlcAmount);
		}

		log_debug!(
			logger,
			"Building aux traffic shaper with on-chain HTLC amount of {} sat",
			self.config.on_chain_htlc_amount_sat
		);
		Ok(AuxTrafficShaper::new(Arc::new(self.config.clone()), quote_lookup, logger))
	}
}

impl Default for ShaperBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Sets up the shaper logger.
fn setup_logger(log_writer_config: &Option<LogWriterConfig>) -> Result<Arc<Logger>, BuildError> {
	let logger = match log_writer_config {
		Some(LogWriterConfig::File { log_file_path, max_log_level }) => {
			let max_log_level = max_log_level.unwrap_or(DEFAULT_LOG_LEVEL);

			Logger::new_fs_writer(log_file_path.clone(), max_log_level)
				.map_err(|_| BuildError::LoggerSetupFailed)?
		},
		Some(LogWriterConfig::Custom(custom_log_writer)) => {
			Logger::new_custom_writer(Arc::clone(custom_log_writer))
		},
		// Default to use `LogFacadeWriter`
		Some(LogWriterConfig::Log) | None => Logger::new_log_facade(),
	};

	Ok(Arc::new(logger))
}
