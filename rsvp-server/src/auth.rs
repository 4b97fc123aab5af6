use sha2::{Digest, Sha256};

/// Shared-secret gate in front of the admin operations.
///
/// The configured secret is kept only as a SHA-256 digest and every
/// check compares full digests, so verification time does not depend on
/// how long a matching prefix the caller guessed.
#[derive(Clone)]
pub struct AdminAuth {
    digest: [u8; 32],
    disabled: bool,
}

impl AdminAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            digest: Sha256::digest(secret.as_bytes()).into(),
            disabled: secret.is_empty(),
        }
    }

    /// True only when both the configured and the supplied secret are
    /// non-empty and equal.
    pub fn verify(&self, supplied: &str) -> bool {
        if self.disabled || supplied.is_empty() {
            return false;
        }
        let supplied: [u8; 32] = Sha256::digest(supplied.as_bytes()).into();
        supplied == self.digest
    }
}
