//! Reference transaction signer.
//!
//! HMAC-SHA256 over the canonical payload, gated by an injected local
//! authentication challenge. The keyed MAC gives tamper evidence for
//! records sitting in the queue; deployments wanting asymmetric
//! non-repudiation swap this adapter behind the same port.

use crate::ports::outbound::{AuthChallenge, TransactionSigner};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use pay_types::QueueError;
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Auth challenge that always succeeds. For trusted contexts and tests.
pub struct AlwaysConfirm;

#[async_trait]
impl AuthChallenge for AlwaysConfirm {
    async fn confirm(&self) -> Result<(), QueueError> {
        Ok(())
    }
}

/// Auth challenge that always fails, as when the user dismisses the
/// biometric prompt.
pub struct DenyAll;

#[async_trait]
impl AuthChallenge for DenyAll {
    async fn confirm(&self) -> Result<(), QueueError> {
        Err(QueueError::AuthenticationFailed {
            reason: "challenge rejected".to_string(),
        })
    }
}

/// HMAC-SHA256 signer bound to a device-local key.
pub struct HmacSigner {
    key: Vec<u8>,
    auth: Arc<dyn AuthChallenge>,
}

impl HmacSigner {
    /// Creates a signer over a device-local key, gated by `auth`.
    #[must_use]
    pub fn new(key: Vec<u8>, auth: Arc<dyn AuthChallenge>) -> Self {
        Self { key, auth }
    }

    fn mac(&self, payload: &[u8]) -> Result<Vec<u8>, QueueError> {
        // HMAC accepts keys of any length; the error arm is unreachable
        // but propagated rather than unwrapped
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| QueueError::Internal(e.to_string()))?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[async_trait]
impl TransactionSigner for HmacSigner {
    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, QueueError> {
        self.auth.confirm().await?;
        self.mac(payload)
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> bool {
        let mut mac = match HmacSha256::new_from_slice(&self.key) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(payload);
        mac.verify_slice(signature).is_ok()
    }
}
