//! Core components for signing Aliyun OSS requests.
//!
//! This crate provides the service independent building blocks shared by
//! the OSS signers: error types, hashing helpers, time formatting and a
//! small environment abstraction used while loading configuration.
//!
//! ## Overview
//!
//! - **Error**: [`Error`] with an [`ErrorKind`] that callers can match on.
//! - **Hash**: HMAC-SHA1 and HMAC-SHA256 helpers in [`hash`].
//! - **Time**: UTC time type and the date formats used on the wire in [`time`].
//! - **Context**: a container for the [`Env`] implementation used by config loaders.
//!
//! ## Example
//!
//! ```
//! use ossign_core::hash::base64_hmac_sha1;
//! use ossign_core::time::{format_http_date, from_unix_seconds};
//!
//! let date = format_http_date(from_unix_seconds(1672223261).unwrap());
//! assert_eq!(date, "Wed, 28 Dec 2022 10:27:41 GMT");
//!
//! let signature = base64_hmac_sha1(b"secret", date.as_bytes());
//! assert!(!signature.is_empty());
//! ```
//!
//! ## Traits
//!
//! - [`Env`]: For environment variable access
//! - [`SigningCredential`]: For validating credentials
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod context;
pub use context::Context;
mod env;
pub use env::{Env, OsEnv, StaticEnv};
mod api;
pub use api::SigningCredential;
