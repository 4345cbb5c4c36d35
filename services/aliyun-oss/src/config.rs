use crate::constants::*;
use crate::{Credential, Sign, SignatureVersion, SignerV1, SignerV4, SigningContext};
use http::request::Parts;
use ossign_core::time::TimeDelta;
use ossign_core::{Context, Result};

/// Config carries the signing parameters for OSS.
#[derive(Clone, Debug)]
pub struct Config {
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_OSS_REGION`]
    pub region: Option<String>,
    /// `product` used in the V4 scope.
    ///
    /// - default to `oss`
    pub product: String,
    /// `signature_version` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_OSS_SIGNATURE_VERSION`]
    /// - default to [`SignatureVersion::V4`]
    pub signature_version: Option<SignatureVersion>,
    /// `account_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ACCOUNT_ID`]
    pub account_id: Option<String>,
    /// `additional_headers` will be loaded from
    ///
    /// - this field if it's not empty
    /// - env value: [`ALIBABA_CLOUD_OSS_ADDITIONAL_HEADERS`], comma separated
    pub additional_headers: Vec<String>,
    /// Offset added to the local clock when the signing time is not given.
    pub clock_offset: TimeDelta,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: None,
            product: "oss".to_string(),
            signature_version: None,
            account_id: None,
            additional_headers: Vec::new(),
            clock_offset: TimeDelta::zero(),
        }
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Returns an error if the signature version in env is not supported.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_OSS_REGION) {
            self.region.get_or_insert(v);
        }
        if self.signature_version.is_none() {
            if let Some(v) = ctx.env_var(ALIBABA_CLOUD_OSS_SIGNATURE_VERSION) {
                self.signature_version = Some(v.parse()?);
            }
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_ACCOUNT_ID) {
            self.account_id.get_or_insert(v);
        }
        if self.additional_headers.is_empty() {
            if let Some(v) = ctx.env_var(ALIBABA_CLOUD_OSS_ADDITIONAL_HEADERS) {
                self.additional_headers = v
                    .split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(String::from)
                    .collect();
            }
        }

        Ok(self)
    }

    /// The signature version in effect.
    pub fn version(&self) -> SignatureVersion {
        self.signature_version.unwrap_or_default()
    }

    /// Build a `/bucket/key` signer for the configured version.
    pub fn signer(&self) -> Box<dyn Sign> {
        match self.version() {
            SignatureVersion::V1 => Box::new(SignerV1::new()),
            SignatureVersion::V4 => Box::new(SignerV4::new()),
        }
    }

    /// Build an ARN signer for vector buckets owned by `account_id`.
    pub fn vector_signer(&self) -> Box<dyn Sign> {
        let account_id = self.account_id.clone();
        match self.version() {
            SignatureVersion::V1 => Box::new(SignerV1::vector(account_id)),
            SignatureVersion::V4 => Box::new(SignerV4::vector(account_id)),
        }
    }

    /// Build a signing context with product, region, additional headers
    /// and clock offset taken from this config.
    pub fn signing_context<'a>(
        &self,
        credential: &'a Credential,
        request: &'a mut Parts,
    ) -> SigningContext<'a> {
        let mut ctx = SigningContext::new()
            .with_scope(&self.product, self.region.as_deref().unwrap_or_default())
            .with_credentials(credential)
            .with_request(request);
        ctx.additional_headers = self.additional_headers.clone();
        ctx.clock_offset = self.clock_offset;
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ossign_core::{ErrorKind, StaticEnv};
    use pretty_assertions::assert_eq;

    fn context(pairs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_from_env() -> Result<()> {
        let ctx = context(&[
            (ALIBABA_CLOUD_OSS_REGION, "cn-hangzhou"),
            (ALIBABA_CLOUD_OSS_SIGNATURE_VERSION, "V1"),
            (ALIBABA_CLOUD_ACCOUNT_ID, "123"),
            (ALIBABA_CLOUD_OSS_ADDITIONAL_HEADERS, "host, x-custom,,"),
        ]);

        let cfg = Config::default().from_env(&ctx)?;

        assert_eq!(cfg.region.as_deref(), Some("cn-hangzhou"));
        assert_eq!(cfg.version(), SignatureVersion::V1);
        assert_eq!(cfg.account_id.as_deref(), Some("123"));
        assert_eq!(cfg.additional_headers, vec!["host", "x-custom"]);
        assert_eq!(cfg.product, "oss");
        Ok(())
    }

    #[test]
    fn test_explicit_value_wins() -> Result<()> {
        let ctx = context(&[
            (ALIBABA_CLOUD_OSS_REGION, "cn-hangzhou"),
            (ALIBABA_CLOUD_OSS_SIGNATURE_VERSION, "not-a-version"),
        ]);

        let cfg = Config {
            region: Some("cn-beijing".to_string()),
            signature_version: Some(SignatureVersion::V4),
            ..Default::default()
        }
        .from_env(&ctx)?;

        assert_eq!(cfg.region.as_deref(), Some("cn-beijing"));
        assert_eq!(cfg.version(), SignatureVersion::V4);
        Ok(())
    }

    #[test]
    fn test_invalid_signature_version() {
        let ctx = context(&[(ALIBABA_CLOUD_OSS_SIGNATURE_VERSION, "v2")]);

        let err = Config::default().from_env(&ctx).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_signing_context() {
        let cfg = Config {
            region: Some("cn-hangzhou".to_string()),
            additional_headers: vec!["host".to_string()],
            clock_offset: TimeDelta::seconds(30),
            ..Default::default()
        };
        let cred = Credential::new("ak", "sk");
        let (mut parts, _) = http::Request::new(()).into_parts();

        let ctx = cfg.signing_context(&cred, &mut parts);

        assert_eq!(ctx.product, "oss");
        assert_eq!(ctx.region, "cn-hangzhou");
        assert_eq!(ctx.additional_headers, vec!["host"]);
        assert_eq!(ctx.clock_offset, TimeDelta::seconds(30));
        assert!(ctx.credentials.is_some());
        assert!(ctx.request.is_some());
    }

    #[test]
    fn test_vector_signer_without_account() {
        let cred = Credential::new("ak", "sk");
        let (mut parts, _) = http::Request::new(()).into_parts();
        let cfg = Config::default();
        let mut ctx = cfg.signing_context(&cred, &mut parts);

        let err = cfg
            .vector_signer()
            .sign(Some(&mut ctx))
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ResourceIdentifierMissing);
    }
}
