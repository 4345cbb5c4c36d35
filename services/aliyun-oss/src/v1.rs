//! OSS signature V1.
//!
//! ```text
//! StringToSign = VERB + "\n"
//!              + Content-MD5 + "\n"
//!              + Content-Type + "\n"
//!              + Date + "\n"
//!              + CanonicalizedOSSHeaders
//!              + CanonicalizedResource
//! Signature    = base64(hmac-sha1(AccessKeySecret, StringToSign))
//! ```

use crate::canonical::{
    canonical_headers, canonical_sub_resource, encode_query, header_value,
    is_default_signed_header, parse_query, set_query,
};
use crate::constants::{
    CONTENT_MD5, DEFAULT_EXPIRES_SECONDS, OSS_HEADER_PREFIX, QUERY_V1_ACCESS_KEY_ID,
    QUERY_V1_EXPIRES, QUERY_V1_PRESIGN_PARAMS, QUERY_V1_SECURITY_TOKEN, QUERY_V1_SIGNATURE,
    X_OSS_SECURITY_TOKEN,
};
use crate::resource::ResourceAddressing;
use crate::sign::{signing_time, with_validated};
use crate::{Credential, Sign, SignatureVersion, SigningContext};
use http::header::{AUTHORIZATION, CONTENT_TYPE, DATE};
use http::request::Parts;
use http::HeaderValue;
use log::debug;
use ossign_core::hash::base64_hmac_sha1;
use ossign_core::time::{format_http_date, now, TimeDelta};
use ossign_core::Result;

/// SignerV1 implements the legacy OSS HMAC-SHA1 signature.
#[derive(Debug, Clone, Default)]
pub struct SignerV1 {
    addressing: ResourceAddressing,
}

impl SignerV1 {
    /// Create a V1 signer using `/bucket/key` addressing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a V1 signer for vector buckets using ARN addressing.
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
        let date = format_http_date(time);
        req.headers.insert(DATE, date.parse()?);

        if let Some(token) = cred.token() {
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            req.headers.insert(X_OSS_SECURITY_TOKEN, value);
        }

        let string_to_sign = self.build_string_to_sign(ctx, req, &date);
        let signature =
            base64_hmac_sha1(cred.access_key_secret.as_bytes(), string_to_sign.as_bytes());

        let mut authorization =
            HeaderValue::from_str(&format!("OSS {}:{}", cred.access_key_id, signature))?;
        authorization.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, authorization);

        Ok(())
    }

    fn auth_query(
        &self,
        ctx: &mut SigningContext<'_>,
        cred: &Credential,
        req: &mut Parts,
    ) -> Result<()> {
        let time = *ctx
            .time
            .get_or_insert_with(|| now() + TimeDelta::seconds(DEFAULT_EXPIRES_SECONDS));
        // Query signing puts the expiry as unix seconds where header signing puts the date.
        let expires = time.timestamp().to_string();

        let mut query = parse_query(req.uri.query());
        query.retain(|(k, _)| !QUERY_V1_PRESIGN_PARAMS.contains(&k.as_str()));
        if let Some(token) = cred.token() {
            query.push((QUERY_V1_SECURITY_TOKEN.to_string(), token.to_string()));
        }
        set_query(req, &encode_query(&query))?;

        let string_to_sign = self.build_string_to_sign(ctx, req, &expires);
        let signature =
            base64_hmac_sha1(cred.access_key_secret.as_bytes(), string_to_sign.as_bytes());

        query.push((QUERY_V1_ACCESS_KEY_ID.to_string(), cred.access_key_id.clone()));
        query.push((QUERY_V1_EXPIRES.to_string(), expires));
        query.push((QUERY_V1_SIGNATURE.to_string(), signature));
        set_query(req, &encode_query(&query))
    }

    fn build_string_to_sign(
        &self,
        ctx: &mut SigningContext<'_>,
        req: &Parts,
        date: &str,
    ) -> String {
        let (oss_headers, _) =
            canonical_headers(&req.headers, |k| k.starts_with(OSS_HEADER_PREFIX));

        let mut resource = self.addressing.canonical_resource(ctx);
        let sub_resource = canonical_sub_resource(req.uri.query(), &ctx.sub_resource);
        if !sub_resource.is_empty() {
            resource.push('?');
            resource.push_str(&sub_resource);
        }

        let string_to_sign = format!(
            "{}\n{}\n{}\n{}\n{}{}",
            req.method,
            header_value(&req.headers, CONTENT_MD5),
            header_value(&req.headers, CONTENT_TYPE.as_str()),
            date,
            oss_headers,
            resource
        );
        debug!("calculated string to sign: {string_to_sign}");

        let (_, signed_headers) = canonical_headers(&req.headers, |k| {
            is_default_signed_header(k, SignatureVersion::V1)
        });
        ctx.signed_headers = signed_headers;
        ctx.string_to_sign = string_to_sign.clone();

        string_to_sign
    }
}

impl Sign for SignerV1 {
    fn sign(&self, ctx: Option<&mut SigningContext<'_>>) -> Result<()> {
        with_validated(ctx, None, |ctx, cred, req| {
            if ctx.auth_method_query {
                self.auth_query(ctx, cred, req)
            } else {
                self.auth_header(ctx, cred, req)
            }
        })
    }
}
