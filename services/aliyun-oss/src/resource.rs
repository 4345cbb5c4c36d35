use crate::canonical::escape_path;
use crate::SigningContext;
use ossign_core::{Error, Result};

/// How a signer expresses the resource being accessed.
///
/// - `PathStyle` addresses classic objects as `/bucket/key`.
/// - `Arn` addresses vector buckets as
///   `/acs:<product>vector:<region>:<account>:<bucket>/<key>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResourceAddressing {
    /// `/bucket/key` addressing.
    #[default]
    PathStyle,
    /// ARN addressing used by vector buckets.
    Arn {
        /// The account (uid) owning the vector bucket.
        account_id: Option<String>,
    },
}

impl ResourceAddressing {
    /// Make sure ARN addressing carries an account id.
    pub(crate) fn ensure_identifier(&self) -> Result<()> {
        match self {
            ResourceAddressing::Arn { account_id: None } => {
                Err(Error::resource_identifier_missing("uid is null"))
            }
            _ => Ok(()),
        }
    }

    /// Canonical URI used by V4, escaped.
    pub(crate) fn canonical_uri(&self, ctx: &SigningContext<'_>) -> String {
        let mut uri = String::from("/");
        if let Some(bucket) = &ctx.bucket {
            match self {
                ResourceAddressing::PathStyle => {
                    uri.push_str(&escape_path(bucket));
                }
                ResourceAddressing::Arn { account_id } => {
                    uri.push_str(&arn_prefix(ctx, account_id.as_deref()));
                    uri.push_str(&escape_path(bucket));
                }
            }
            uri.push('/');
        }
        if let Some(key) = &ctx.key {
            uri.push_str(&escape_path(key));
        }

        uri
    }

    /// Resource part of the V1 canonicalized resource, not escaped.
    pub(crate) fn canonical_resource(&self, ctx: &SigningContext<'_>) -> String {
        let mut resource = String::from("/");
        if let Some(bucket) = &ctx.bucket {
            if let ResourceAddressing::Arn { account_id } = self {
                resource.push_str(&arn_prefix(ctx, account_id.as_deref()));
            }
            resource.push_str(bucket);
            resource.push('/');
        }
        if let Some(key) = &ctx.key {
            resource.push_str(key);
        }

        resource
    }
}

fn arn_prefix(ctx: &SigningContext<'_>, account_id: Option<&str>) -> String {
    format!(
        "acs:{}vector:{}:{}:",
        ctx.product,
        ctx.region,
        account_id.unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn context(bucket: Option<&str>, key: Option<&str>) -> SigningContext<'static> {
        let mut ctx = SigningContext::new();
        ctx.product = "oss".to_string();
        ctx.region = "cn-hangzhou".to_string();
        ctx.bucket = bucket.map(String::from);
        ctx.key = key.map(String::from);
        ctx
    }

    #[test_case(Some("bucket"), Some("1234+-/123/1.txt"), "/bucket/1234%2B-/123/1.txt"; "object")]
    #[test_case(Some("bucket"), None, "/bucket/"; "bucket only")]
    #[test_case(None, None, "/"; "service")]
    #[test_case(Some("bucket"), Some("a b/中.txt"), "/bucket/a%20b/%E4%B8%AD.txt"; "escaped")]
    fn test_path_style_uri(bucket: Option<&str>, key: Option<&str>, expected: &str) {
        let ctx = context(bucket, key);
        assert_eq!(ResourceAddressing::PathStyle.canonical_uri(&ctx), expected);
    }

    #[test]
    fn test_path_style_resource_is_raw() {
        let ctx = context(Some("bucket"), Some("a b+c"));
        assert_eq!(
            ResourceAddressing::PathStyle.canonical_resource(&ctx),
            "/bucket/a b+c"
        );
    }

    #[test]
    fn test_arn_uri() {
        let ctx = context(Some("vb"), Some("index 1"));
        let arn = ResourceAddressing::Arn {
            account_id: Some("123".to_string()),
        };
        assert_eq!(
            arn.canonical_uri(&ctx),
            "/acs:ossvector:cn-hangzhou:123:vb/index%201"
        );
        assert_eq!(
            arn.canonical_resource(&ctx),
            "/acs:ossvector:cn-hangzhou:123:vb/index 1"
        );
    }

    #[test]
    fn test_arn_requires_identifier() {
        let err = ResourceAddressing::Arn { account_id: None }
            .ensure_identifier()
            .expect_err("must fail");
        assert_eq!(err.kind(), ossign_core::ErrorKind::ResourceIdentifierMissing);
        assert_eq!(err.message(), "uid is null");

        assert!(ResourceAddressing::PathStyle.ensure_identifier().is_ok());
    }
}
