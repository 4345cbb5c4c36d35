//! OSS signature V4.
//!
//! - Scope: `<date>/<region>/<product>/aliyun_v4_request`
//! - Signing key: HMAC-SHA256 chain over date, region, product and request type,
//!   seeded with `aliyun_v4` + secret.
//! - Signature: hex encoded HMAC-SHA256 of the string to sign.

use crate::canonical::{
    additional_headers, canonical_headers, canonical_query, encode_query, header_value,
    is_default_signed_header, parse_query, set_query,
};
use crate::constants::{
    DEFAULT_EXPIRES_SECONDS, QUERY_V4_ADDITIONAL_HEADERS, QUERY_V4_CREDENTIAL, QUERY_V4_DATE,
    QUERY_V4_EXPIRES, QUERY_V4_PRESIGN_PARAMS, QUERY_V4_SECURITY_TOKEN, QUERY_V4_SIGNATURE,
    QUERY_V4_SIGNATURE_VERSION, SIGNING_ALGORITHM_V4, UNSIGNED_PAYLOAD, V4_REQUEST_TYPE, V4_SECRET_PREFIX,
    X_OSS_CONTENT_SHA256, X_OSS_DATE, X_OSS_SECURITY_TOKEN,
};
use crate::resource::ResourceAddressing;
use crate::sign::{signing_time, with_validated};
use crate::{Credential, Sign, SignatureVersion, SigningContext};
use http::header::{AUTHORIZATION, DATE};
use http::request::Parts;
use http::HeaderValue;
use log::debug;
use ossign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use ossign_core::time::{format_date, format_http_date, format_iso8601, now, TimeDelta};
use ossign_core::Result;
use std::fmt::Write;

/// SignerV4 implements the OSS4-HMAC-SHA256 signature.
#[derive(Debug, Clone, Default)]
pub struct SignerV4 {
    addressing: ResourceAddressing,
}

impl SignerV4 {
    /// Create a V4 signer using `/bucket/key` addressing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a V4 signer for vector buckets using ARN addressing.
    ///
    /// Signing fails with `uid is null` if `account_id` is `None`.
    pub fn vector(account_id: Option<String>) -> Self {
        Self {
            addressing: ResourceAddressing::Arn { account_id },
        }
    }

    fn auth_header(
        &self,
        ctx: &mut SigningContext<'_>,
        cred: &Credential,
        req: &mut Parts,
    ) -> Result<()> {
        let time = signing_time(ctx)?;
        let datetime = format_iso8601(time);
        let date = format_date(time);

        req.headers.insert(X_OSS_DATE, datetime.parse()?);
        req.headers.insert(DATE, format_http_date(time).parse()?);
        if let Some(token) = cred.token() {
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            req.headers.insert(X_OSS_SECURITY_TOKEN, value);
        }
        if !req.headers.contains_key(X_OSS_CONTENT_SHA256) {
            req.headers.insert(
                X_OSS_CONTENT_SHA256,
                HeaderValue::from_static(UNSIGNED_PAYLOAD),
            );
        }

        let scope = build_scope(&date, &ctx.region, &ctx.product);
        let additional = additional_headers(&req.headers, &ctx.additional_headers);

        let signature = self.calculate(ctx, cred, req, &additional, &datetime, &date, &scope)?;

        let mut authorization = format!(
            "{} Credential={}/{}",
            SIGNING_ALGORITHM_V4, cred.access_key_id, scope
        );
        if !additional.is_empty() {
            write!(authorization, ",AdditionalHeaders={}", additional.join(";"))?;
        }
        write!(authorization, ",Signature={signature}")?;

        let mut value = HeaderValue::from_str(&authorization)?;
        value.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, value);

        Ok(())
    }

    fn auth_query(
        &self,
        ctx: &mut SigningContext<'_>,
        cred: &Credential,
        req: &mut Parts,
    ) -> Result<()> {
        let issued = ctx.sign_time.unwrap_or_else(now);
        let expiry = *ctx
            .time
            .get_or_insert_with(|| issued + TimeDelta::seconds(DEFAULT_EXPIRES_SECONDS));
        // Zero or negative when expiry is before issuance, left to the server to reject.
        let expires = expiry.timestamp() - issued.timestamp();
        let datetime = format_iso8601(issued);
        let date = format_date(issued);

        let scope = build_scope(&date, &ctx.region, &ctx.product);
        let additional = additional_headers(&req.headers, &ctx.additional_headers);

        let mut query = parse_query(req.uri.query());
        // Parameters left by an earlier signing must not enter the canonical query.
        query.retain(|(k, _)| !QUERY_V4_PRESIGN_PARAMS.contains(&k.as_str()));
        if let Some(token) = cred.token() {
            query.push((QUERY_V4_SECURITY_TOKEN.to_string(), token.to_string()));
        }
        query.push((
            QUERY_V4_SIGNATURE_VERSION.to_string(),
            SIGNING_ALGORITHM_V4.to_string(),
        ));
        query.push((QUERY_V4_DATE.to_string(), datetime.clone()));
        query.push((QUERY_V4_EXPIRES.to_string(), expires.to_string()));
        query.push((
            QUERY_V4_CREDENTIAL.to_string(),
            format!("{}/{}", cred.access_key_id, scope),
        ));
        if !additional.is_empty() {
            query.push((QUERY_V4_ADDITIONAL_HEADERS.to_string(), additional.join(";")));
        }
        // The canonical query must already carry the parameters above.
        set_query(req, &encode_query(&query))?;

        let signature = self.calculate(ctx, cred, req, &additional, &datetime, &date, &scope)?;

        query.push((QUERY_V4_SIGNATURE.to_string(), signature));
        set_query(req, &encode_query(&query))
    }

    /// Compute the signature and record the diagnostics on `ctx`.
    #[allow(clippy::too_many_arguments)]
    fn calculate(
        &self,
        ctx: &mut SigningContext<'_>,
        cred: &Credential,
        req: &Parts,
        additional: &[String],
        datetime: &str,
        date: &str,
        scope: &str,
    ) -> Result<String> {
        let (creq, signed_headers) = self.canonical_request(ctx, req, additional)?;
        debug!("calculated canonical request: {creq}");

        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            SIGNING_ALGORITHM_V4,
            datetime,
            scope,
            hex_sha256(creq.as_bytes())
        );
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.access_key_secret, date, &ctx.region, &ctx.product);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        ctx.string_to_sign = string_to_sign;
        ctx.signed_headers = signed_headers;

        Ok(signature)
    }

    /// Build the canonical request.
    ///
    /// ```text
    /// Method
    /// CanonicalURI
    /// CanonicalQuery
    /// CanonicalHeaders
    /// AdditionalHeaders
    /// HashedPayload
    /// ```
    fn canonical_request(
        &self,
        ctx: &SigningContext<'_>,
        req: &Parts,
        additional: &[String],
    ) -> Result<(String, Vec<String>)> {
        // 256 is specially chosen to avoid reallocation for most requests.
        let mut f = String::with_capacity(256);

        writeln!(f, "{}", req.method)?;
        writeln!(f, "{}", self.addressing.canonical_uri(ctx))?;
        writeln!(f, "{}", canonical_query(req.uri.query().unwrap_or_default()))?;

        let requested: Vec<String> = ctx
            .additional_headers
            .iter()
            .map(|k| k.trim().to_lowercase())
            .collect();
        let (headers, signed_headers) = canonical_headers(&req.headers, |k| {
            is_default_signed_header(k, SignatureVersion::V4) || requested.iter().any(|v| v == k)
        });
        writeln!(f, "{headers}")?;
        writeln!(f, "{}", additional.join(";"))?;

        let payload = header_value(&req.headers, X_OSS_CONTENT_SHA256);
        if payload.is_empty() {
            write!(f, "{UNSIGNED_PAYLOAD}")?;
        } else {
            write!(f, "{payload}")?;
        }

        Ok((f, signed_headers))
    }
}

impl Sign for SignerV4 {
    fn sign(&self, ctx: Option<&mut SigningContext<'_>>) -> Result<()> {
        with_validated(ctx, Some(&self.addressing), |ctx, cred, req| {
            if ctx.auth_method_query {
                self.auth_query(ctx, cred, req)
            } else {
                self.auth_header(ctx, cred, req)
            }
        })
    }
}

/// Scope: "20231216/<region>/<product>/aliyun_v4_request"
fn build_scope(date: &str, region: &str, product: &str) -> String {
    let scope = format!("{date}/{region}/{product}/{V4_REQUEST_TYPE}");
    debug!("calculated scope: {scope}");
    scope
}

fn generate_signing_key(secret: &str, date: &str, region: &str, product: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("{V4_SECRET_PREFIX}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign product
    let sign_product = hmac_sha256(sign_region.as_slice(), product.as_bytes());
    // Sign request
    hmac_sha256(sign_product.as_slice(), V4_REQUEST_TYPE.as_bytes())
}
