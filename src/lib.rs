//! OAuth 1.0a request signing and verification: RFC 3986 encoding, base-string construction,
//! HMAC-SHA1 signatures, and a nonce/timestamp replay guard over pluggable credential stores.
//!
//! The [`signature`] module is pure and shared by both sides of the protocol:
//! [`client::RequestSigner`] produces signed requests, [`verifier::Verifier`] checks them.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod encoding;
pub mod error;
pub mod guard;
pub mod obs;
pub mod request;
pub mod signature;
pub mod store;
pub mod verifier;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use color_eyre as _;
