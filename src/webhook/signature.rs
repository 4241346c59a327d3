//! GitHub webhook signature verification (`X-Hub-Signature-256`).

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the HMAC-SHA256 signature of the raw body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("X-Hub-Signature-256 header is missing")]
    Missing,

    #[error("X-Hub-Signature-256 header is malformed")]
    Malformed,

    #[error("signature validation failed")]
    Mismatch,

    #[error("webhook secret is not a usable HMAC key")]
    InvalidKey,
}

fn keyed(secret: &str) -> Result<HmacSha256, SignatureError> {
    <HmacSha256 as KeyInit>::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)
}

/// Verify `header` (`sha256=<hex>`) against the payload. Constant-time.
pub fn verify_signature(payload: &[u8], secret: &str, header: &str) -> Result<(), SignatureError> {
    let digest = header
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or(SignatureError::Malformed)?;
    let expected = hex::decode(digest).map_err(|_| SignatureError::Malformed)?;

    let mut mac = keyed(secret)?;
    mac.update(payload);
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Compute the `X-Hub-Signature-256` header value for a payload.
pub fn sign_payload(payload: &[u8], secret: &str) -> Result<String, SignatureError> {
    let mut mac = keyed(secret)?;
    mac.update(payload);
    Ok(format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes())))
}
