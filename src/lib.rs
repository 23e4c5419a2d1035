// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

#![crate_name = "ldk_asset_shaper"]

//! # LDK Asset Shaper
//! A library letting channels that carry assets in addition to bitcoin take part in HTLC
//! forwarding. The HTLC switch of a Lightning node delegates three decisions for such channels to
//! a [`TrafficShaper`]:
//! - whether a channel is an asset channel at all ([`TrafficShaper::handle_traffic`]),
//! - how much an asset channel can forward for a given HTLC
//!   ([`TrafficShaper::payment_bandwidth`]), and
//! - how an outgoing HTLC paid with assets is denominated on the wire
//!   ([`TrafficShaper::produce_htlc_extra_data`]).
//!
//! [`AuxTrafficShaper`] takes these decisions based on the channel's auxiliary data blobs and on
//! the price quotes our peers accepted, which it looks up through a [`QuoteLookup`].
//!
//! ## Getting Started
//!
//! The primary abstraction of the library is the [`AuxTrafficShaper`], which can be retrieved by
//! setting up and configuring a [`ShaperBuilder`] to your liking and calling [`build`]. The
//! shaper can then be controlled via commands such as [`start`] and [`stop`].
//!
//! ```
//! use ldk_asset_shaper::rfq::AcceptedQuoteStore;
//! use ldk_asset_shaper::{ShaperBuilder, TrafficShaper};
//!
//! use std::sync::Arc;
//!
//! fn main() {
//! 	let quotes = Arc::new(AcceptedQuoteStore::new());
//! 	let shaper = ShaperBuilder::new().build(quotes).unwrap();
//!
//! 	shaper.start().unwrap();
//!
//! 	// Channels without auxiliary funding data are ordinary bitcoin channels.
//! 	assert_eq!(shaper.handle_traffic(None), Ok(false));
//!
//! 	shaper.stop().unwrap();
//! }
//! ```
//!
//! [`build`]: ShaperBuilder::build
//! [`start`]: AuxTrafficShaper::start
//! [`stop`]: AuxTrafficShaper::stop
//! [`QuoteLookup`]: rfq::QuoteLookup

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![allow(bare_trait_objects)]
#![allow(ellipsis_inclusive_range_patterns)]

mod builder;
pub mod channel_data;
pub mod config;
mod error;
pub mod htlc;
mod lifecycle;
pub mod logger;
pub mod rfq;
pub mod scid_utils;
mod traffic_shaper;
pub mod types;
mod util;

pub use bitcoin;
pub use lightning;

pub use builder::BuildError;
pub use builder::ShaperBuilder as Builder;
pub use builder::ShaperBuilder;
pub use error::Error as ShaperError;
pub use lifecycle::{LifecycleState, WorkToken};
pub use traffic_shaper::{AuxTrafficShaper, NoopTrafficShaper, TrafficShaper};

use error::Error;
