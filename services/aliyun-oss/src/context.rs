use crate::Credential;
use http::request::Parts;
use ossign_core::time::{DateTime, TimeDelta};

/// SigningContext carries everything one signing call reads and writes.
///
/// A context lives for exactly one [`Sign::sign`](crate::Sign::sign) call.
///
/// ## Caller supplied
///
/// `product`, `region`, `bucket`, `key`, `sub_resource`,
/// `additional_headers`, `auth_method_query`, `time`, `sign_time`,
/// `clock_offset`, `credentials` and `request`.
///
/// ## Signer populated
///
/// - `time` when it was left unset and the signer picked a default.
/// - `string_to_sign` and `signed_headers` for diagnostics.
/// - the headers or query of `request`.
#[derive(Debug, Default)]
pub struct SigningContext<'a> {
    /// Product used in the V4 scope, `oss` for example.
    pub product: String,
    /// Region used in the V4 scope, `cn-hangzhou` for example.
    pub region: String,
    /// Bucket being accessed, `None` for service level operations.
    pub bucket: Option<String>,
    /// Object key being accessed.
    pub key: Option<String>,
    /// Extra query parameter names V1 must treat as sub-resources.
    pub sub_resource: Vec<String>,
    /// Extra header names V4 must sign.
    pub additional_headers: Vec<String>,
    /// Sign into the query string instead of the `Authorization` header.
    pub auth_method_query: bool,
    /// Signing time in header mode, expiry instant in query mode.
    pub time: Option<DateTime>,
    /// Issuance time for V4 query mode, defaults to now.
    pub sign_time: Option<DateTime>,
    /// Offset added to the system clock when `time` is unset in header mode.
    pub clock_offset: TimeDelta,
    /// Credentials used to sign.
    pub credentials: Option<&'a Credential>,
    /// Request to sign in place.
    pub request: Option<&'a mut Parts>,

    /// The string to sign computed by the last signing call.
    pub string_to_sign: String,
    /// Sorted lower-case names of the headers covered by the signature.
    pub signed_headers: Vec<String>,
}

impl<'a> SigningContext<'a> {
    /// Create an empty signing context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the credentials used to sign.
    pub fn with_credentials(mut self, credentials: &'a Credential) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the request to sign.
    pub fn with_request(mut self, request: &'a mut Parts) -> Self {
        self.request = Some(request);
        self
    }

    /// Set product and region of the V4 scope.
    pub fn with_scope(mut self, product: &str, region: &str) -> Self {
        self.product = product.to_string();
        self.region = region.to_string();
        self
    }

    /// Set the bucket being accessed.
    pub fn with_bucket(mut self, bucket: &str) -> Self {
        self.bucket = Some(bucket.to_string());
        self
    }

    /// Set the object key being accessed.
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Set the signing time (header mode) or the expiry instant (query mode).
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign into the query string.
    pub fn with_auth_method_query(mut self) -> Self {
        self.auth_method_query = true;
        self
    }
}
