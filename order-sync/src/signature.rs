//! Storefront webhook signatures (HMAC-SHA256)
//!
//! Header format: `t=<unix seconds>,v1=<hex hmac>` where the MAC covers
//! `"{t}.{raw body}"`. Signatures older than five minutes are rejected.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

pub const SIGNATURE_HEADER: &str = "x-storefront-signature";

const REPLAY_WINDOW_SECS: u64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing x-storefront-signature header")]
    Missing,
    #[error("malformed x-storefront-signature header")]
    Malformed,
    #[error("webhook signature mismatch")]
    Mismatch,
    #[error("webhook timestamp outside replay window")]
    Expired,
    #[error("webhook secret is not a valid HMAC key")]
    InvalidKey,
}

fn mac(secret: &str, timestamp: &str, payload: &[u8]) -> Result<Hmac<Sha256>, SignatureError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::InvalidKey)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Build a signature header value for `payload`
pub fn sign(payload: &[u8], secret: &str, timestamp: i64) -> Result<String, SignatureError> {
    let digest = mac(secret, &timestamp.to_string(), payload)?
        .finalize()
        .into_bytes();
    Ok(format!("t={timestamp},v1={}", hex::encode(digest)))
}

/// Verify a signature header against the current time
pub fn verify(payload: &[u8], header: Option<&str>, secret: &str) -> Result<(), SignatureError> {
    verify_at(payload, header, secret, chrono::Utc::now().timestamp())
}

pub fn verify_at(
    payload: &[u8],
    header: Option<&str>,
    secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?;

    let mut timestamp = "";
    let mut signature = "";
    for part in header.split(',') {
        let part = part.trim();
        if let Some(t) = part.strip_prefix("t=") {
            timestamp = t;
        } else if let Some(v) = part.strip_prefix("v1=") {
            signature = v;
        }
    }
    if timestamp.is_empty() || signature.is_empty() {
        return Err(SignatureError::Malformed);
    }

    let sig_bytes = hex::decode(signature).map_err(|_| SignatureError::Malformed)?;
    mac(secret, timestamp, payload)?
        .verify_slice(&sig_bytes)
        .map_err(|_| SignatureError::Mismatch)?;

    let ts: i64 = timestamp.parse().map_err(|_| SignatureError::Malformed)?;
    match now.checked_sub(ts).map(i64::unsigned_abs) {
        Some(age) if age <= REPLAY_WINDOW_SECS => Ok(()),
        _ => Err(SignatureError::Expired),
    }?;
    Ok(())
}
