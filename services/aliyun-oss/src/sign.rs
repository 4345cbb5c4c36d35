use crate::resource::ResourceAddressing;
use crate::{Credential, SigningContext};
use http::request::Parts;
use log::warn;
use ossign_core::time::{now, DateTime};
use ossign_core::{Error, Result, SigningCredential};
use std::fmt::Debug;
use std::str::FromStr;

/// Sign is the capability shared by every OSS signer.
///
/// Implementations validate the context first and only then canonicalize,
/// sign and mutate the request in place. A failed validation leaves the
/// request untouched.
pub trait Sign: Debug + Send + Sync {
    /// Sign the request carried by `ctx`.
    ///
    /// Passing `None` fails with [`ErrorKind::ContextMissing`](ossign_core::ErrorKind::ContextMissing).
    fn sign(&self, ctx: Option<&mut SigningContext<'_>>) -> Result<()>;
}

/// Signature scheme version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureVersion {
    /// HMAC-SHA1 legacy scheme.
    V1,
    /// Scoped HMAC-SHA256 scheme.
    #[default]
    V4,
}

impl FromStr for SignatureVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(SignatureVersion::V1),
            "v4" => Ok(SignatureVersion::V4),
            v => Err(Error::config_invalid(format!(
                "signature version '{v}' is not supported, expect v1 or v4"
            ))),
        }
    }
}

/// Validate `ctx` and run `f` with the request borrowed out of it.
///
/// Checks run in order: context, resource identifier (when `addressing` is
/// given), credentials, request. The request is put back into the context
/// once `f` returns, whatever the outcome.
pub(crate) fn with_validated<'a, F>(
    ctx: Option<&mut SigningContext<'a>>,
    addressing: Option<&ResourceAddressing>,
    f: F,
) -> Result<()>
where
    F: FnOnce(&mut SigningContext<'a>, &'a Credential, &mut Parts) -> Result<()>,
{
    let ctx = ctx.ok_or_else(|| Error::context_missing("SigningContext is null."))?;

    if let Some(addressing) = addressing {
        addressing.ensure_identifier()?;
    }

    let cred = ctx
        .credentials
        .filter(|cred| cred.has_keys())
        .ok_or_else(|| Error::credential_invalid("SigningContext.Credentials is null or empty."))?;
    if !cred.is_valid() {
        warn!("signing with a credential that is expired or about to expire");
    }

    let req = ctx
        .request
        .take()
        .ok_or_else(|| Error::request_missing("SigningContext.Request is null."))?;

    let result = f(ctx, cred, &mut *req);
    ctx.request = Some(req);
    result
}

/// Signing time for header mode: `ctx.time`, or now shifted by the clock
/// offset, written back to `ctx.time`.
pub(crate) fn signing_time(ctx: &mut SigningContext<'_>) -> Result<DateTime> {
    if let Some(time) = ctx.time {
        return Ok(time);
    }

    let time = now().checked_add_signed(ctx.clock_offset).ok_or_else(|| {
        Error::unexpected(format!(
            "clock offset {} is out of the representable time range",
            ctx.clock_offset
        ))
    })?;
    ctx.time = Some(time);
    Ok(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ossign_core::ErrorKind;

    #[test]
    fn test_signature_version_from_str() {
        assert_eq!(
            "v1".parse::<SignatureVersion>().expect("must be valid"),
            SignatureVersion::V1
        );
        assert_eq!(
            " V4 ".parse::<SignatureVersion>().expect("must be valid"),
            SignatureVersion::V4
        );
        let err = "v2".parse::<SignatureVersion>().expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_with_validated_restores_request() {
        let cred = Credential::new("ak", "sk");
        let (mut parts, _) = http::Request::new(()).into_parts();
        let mut ctx = SigningContext::new()
            .with_credentials(&cred)
            .with_request(&mut parts);

        let err = with_validated(Some(&mut ctx), None, |_, _, req| {
            req.headers.insert("x-oss-test", "1".parse().expect("must be valid"));
            Err(Error::unexpected("boom"))
        })
        .expect_err("must fail");

        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(ctx.request.is_some());
        drop(ctx);
        assert!(parts.headers.contains_key("x-oss-test"));
    }

    #[test]
    fn test_signing_time_with_clock_offset_overflow() {
        let mut ctx = SigningContext::new();
        ctx.clock_offset = ossign_core::time::TimeDelta::MAX;

        let err = signing_time(&mut ctx).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(ctx.time.is_none());
    }

    #[test]
    fn test_expired_credential_still_signs() {
        let mut cred = Credential::new("ak", "sk");
        cred.expires_in = ossign_core::time::from_unix_seconds(0);
        let (mut parts, _) = http::Request::new(()).into_parts();
        let mut ctx = SigningContext::new()
            .with_credentials(&cred)
            .with_request(&mut parts);

        assert!(with_validated(Some(&mut ctx), None, |_, _, _| Ok(())).is_ok());
    }

    #[test]
    fn test_identifier_checked_before_credentials() {
        let mut ctx = SigningContext::new();
        let addressing = ResourceAddressing::Arn { account_id: None };

        let err = with_validated(Some(&mut ctx), Some(&addressing), |_, _, _| Ok(()))
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ResourceIdentifierMissing);
    }
}
