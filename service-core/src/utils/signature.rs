//! Request signing for the payment gateway's transaction-status API.
//!
//! Format: hex(SHA-512(merchant_id || reference_number || timestamp || nonce || secret))

use rand::Rng;
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

/// Exclusive upper bound of the random nonce.
pub const NONCE_UPPER_BOUND: u64 = 1_000_000_000_000_000_000;

/// Signature material attached to a gateway request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Milliseconds since the Unix epoch.
    pub timestamp: String,
    pub nonce: String,
    pub signature: String,
}

/// Compute the gateway signature for fixed inputs.
pub fn compute_signature(
    merchant_id: &str,
    reference_number: &str,
    timestamp: &str,
    nonce: &str,
    secret: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(merchant_id.as_bytes());
    hasher.update(reference_number.as_bytes());
    hasher.update(timestamp.as_bytes());
    hasher.update(nonce.as_bytes());
    hasher.update(secret.as_bytes());

    hex::encode(hasher.finalize())
}

/// Sign a status check using the current clock and a fresh nonce.
pub fn sign_request(merchant_id: &str, reference_number: &str, secret: &str) -> SignedRequest {
    let timestamp = chrono::Utc::now().timestamp_millis().to_string();
    let nonce = rand::thread_rng()
        .gen_range(0..NONCE_UPPER_BOUND)
        .to_string();
    let signature = compute_signature(merchant_id, reference_number, &timestamp, &nonce, secret);

    SignedRequest {
        timestamp,
        nonce,
        signature,
    }
}

/// Verify a gateway signature using constant-time comparison
pub fn verify_signature(
    merchant_id: &str,
    reference_number: &str,
    timestamp: &str,
    nonce: &str,
    secret: &str,
    signature: &str,
) -> bool {
    let expected = compute_signature(merchant_id, reference_number, timestamp, nonce, secret);

    let expected_bytes = expected.as_bytes();
    let signature_bytes = signature.as_bytes();

    if expected_bytes.len() != signature_bytes.len() {
        return false;
    }

    expected_bytes.ct_eq(signature_bytes).into()
}
