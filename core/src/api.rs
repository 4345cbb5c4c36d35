use std::fmt::Debug;

/// SigningCredential is the trait implemented by credentials a signer consumes.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is usable for signing right now.
    fn is_valid(&self) -> bool;
}

