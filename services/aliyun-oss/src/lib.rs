//! Aliyun OSS request signing.
//!
//! This crate signs HTTP requests for Alibaba Cloud Object Storage Service
//! (OSS), including vector buckets, with either signature scheme:
//!
//! - **V1**: HMAC-SHA1 over a newline joined string to sign, base64 encoded.
//! - **V4**: `OSS4-HMAC-SHA256` with a scoped, date derived signing key.
//!
//! Both schemes can sign into the `Authorization` header or into the query
//! string to build a presigned url.
//!
//! ## Quick Start
//!
//! ```
//! use ossign_aliyun_oss::{Credential, Sign, SignerV4, SigningContext};
//! use ossign_core::time::from_unix_seconds;
//!
//! # fn main() -> ossign_core::Result<()> {
//! let cred = Credential::new("access_key_id", "access_key_secret");
//! let mut req = http::Request::get("https://bucket.oss-cn-hangzhou.aliyuncs.com/object.txt")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//!
//! let mut ctx = SigningContext::new()
//!     .with_scope("oss", "cn-hangzhou")
//!     .with_bucket("bucket")
//!     .with_key("object.txt")
//!     .with_time(from_unix_seconds(1702743657).unwrap())
//!     .with_credentials(&cred)
//!     .with_request(&mut req);
//! SignerV4::new().sign(Some(&mut ctx))?;
//! drop(ctx);
//!
//! assert!(req.headers.contains_key(http::header::AUTHORIZATION));
//! # Ok(())
//! # }
//! ```
//!
//! ## Presigned urls
//!
//! Call [`SigningContext::with_auth_method_query`] and set `time` to the
//! expiry instant. V4 reads the issuance time from `sign_time` and falls
//! back to now, V1 and V4 both default the expiry to 15 minutes later.
//!
//! ## Vector buckets
//!
//! [`SignerV1::vector`] and [`SignerV4::vector`] address the resource as
//! `acs:<product>vector:<region>:<account>:<bucket>/<key>`. Signing fails
//! with [`ErrorKind::ResourceIdentifierMissing`](ossign_core::ErrorKind::ResourceIdentifierMissing)
//! when no account id is set.
//!
//! ## Configuration
//!
//! [`Config`] loads region, signature version, account id and additional
//! headers from env and hands out matching signers and contexts.

mod constants;

pub mod canonical;

mod config;
pub use config::Config;

mod context;
pub use context::SigningContext;

mod credential;
pub use credential::Credential;

mod resource;
pub use resource::ResourceAddressing;

mod sign;
pub use sign::{Sign, SignatureVersion};

mod v1;
pub use v1::SignerV1;

mod v4;
pub use v4::SignerV4;
