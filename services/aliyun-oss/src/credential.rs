use ossign_core::time::{now, DateTime, TimeDelta};
use ossign_core::utils::Redact;
use ossign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access_key and secret_key.
///
/// Signers only ever read a credential, so one value can be shared by many
/// concurrent signing calls.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for aliyun services.
    pub access_key_id: String,
    /// Access key secret for aliyun services.
    pub access_key_secret: String,
    /// Security token for aliyun services.
    pub security_token: Option<String>,
    /// Expiration time for this credential.
    pub expires_in: Option<DateTime>,
}

impl Credential {
    /// Create a credential from an access key pair.
    pub fn new(access_key_id: &str, access_key_secret: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            access_key_secret: access_key_secret.to_string(),
            ..Default::default()
        }
    }

    /// Attach a security token issued by STS.
    pub fn with_security_token(mut self, token: &str) -> Self {
        self.security_token = Some(token.to_string());
        self
    }

    /// Check that both access key id and secret are present.
    pub fn has_keys(&self) -> bool {
        !self.access_key_id.is_empty() && !self.access_key_secret.is_empty()
    }

    /// Security token if one is set and non-empty.
    pub(crate) fn token(&self) -> Option<&str> {
        self.security_token.as_deref().filter(|v| !v.is_empty())
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("access_key_secret", &Redact::from(&self.access_key_secret))
            .field("security_token", &Redact::from(&self.security_token))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        if !self.has_keys() {
            return false;
        }
        // Take 120s as buffer to avoid edge cases.
        if let Some(valid) = self
            .expires_in
            .map(|v| v > now() + TimeDelta::try_minutes(2).expect("in bounds"))
        {
            return valid;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_keys() {
        assert!(Credential::new("ak", "sk").has_keys());
        assert!(!Credential::new("", "sk").has_keys());
        assert!(!Credential::new("ak", "").has_keys());
        assert!(!Credential::default().has_keys());
    }

    #[test]
    fn test_is_valid_respects_expiry() {
        let mut cred = Credential::new("ak", "sk");
        assert!(cred.is_valid());

        cred.expires_in = Some(now() + TimeDelta::try_minutes(1).expect("in bounds"));
        assert!(!cred.is_valid());

        cred.expires_in = Some(now() + TimeDelta::try_hours(1).expect("in bounds"));
        assert!(cred.is_valid());
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let cred = Credential::new("ak", "sk").with_security_token("");
        assert_eq!(cred.token(), None);
        let cred = Credential::new("ak", "sk").with_security_token("token");
        assert_eq!(cred.token(), Some("token"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let cred = Credential::new("LTAI5tExampleKeyId", "super-secret-value")
            .with_security_token("token");
        let out = format!("{cred:?}");
        assert!(!out.contains("super-secret-value"));
        assert!(out.contains("LTA***yId"));
        assert!(out.contains("sup***lue"));
    }
}
