//! Request signing for the Tauros private API.
//!
//! Every authenticated request carries a nonce and a signature over
//! `nonce || METHOD || path || body`. The body string signed here must be
//! byte-identical to the body transmitted; the client serializes once and
//! reuses the same string for both.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

use crate::error::SigningError;

type HmacSha512 = Hmac<Sha512>;

/// Signs private API requests with the account's API secret.
#[derive(Clone)]
pub struct Signer {
    /// Base64-decoded API secret.
    key: Vec<u8>,
}

impl Signer {
    /// Create a signer from the base64-encoded API secret.
    pub fn new(secret: &str) -> Result<Self, SigningError> {
        let key = BASE64.decode(secret.trim())?;
        Ok(Self { key })
    }

    /// Compute the signature for one request.
    ///
    /// `body` is the exact JSON string that will be sent; for bodyless (GET)
    /// requests the caller passes `"{}"`. Deterministic: identical inputs
    /// always produce the same signature.
    pub fn sign(
        &self,
        path: &str,
        body: &str,
        nonce: u64,
        method: &str,
    ) -> Result<String, SigningError> {
        let message = format!("{}{}{}{}", nonce, method.to_uppercase(), path, body);
        let digest = Sha256::digest(message.as_bytes());

        let mut mac =
            HmacSha512::new_from_slice(&self.key).map_err(|_| SigningError::KeyRejected)?;
        mac.update(&digest);

        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").field("key", &"<redacted>").finish()
    }
}

/// Strictly increasing nonce derived from the millisecond clock.
///
/// The exchange rejects a reused nonce for a credential pair, so two calls
/// within the same millisecond must still yield distinct, increasing values.
#[derive(Debug, Default)]
pub struct NonceSource {
    last: AtomicU64,
}

impl NonceSource {
    /// Create a nonce source starting from the current time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next nonce.
    pub fn next(&self) -> u64 {
        let now = Utc::now().timestamp_millis() as u64;
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last.compare_exchange(
                last,
                candidate,
                Ordering::SeqCst,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "dGhpcy1pcy1hLXRlc3Qtc2VjcmV0"; // "this-is-a-test-secret"

    #[test]
    fn rejects_malformed_secret() {
        let result = Signer::new("not*valid*base64!");
        assert!(matches!(result, Err(SigningError::InvalidSecret(_))));
    }

    #[test]
    fn signature_is_deterministic() {
        let signer = Signer::new(SECRET).unwrap();
        let a = signer
            .sign("/api/v1/trading/placeorder/", r#"{"id":123}"#, 1700000000000, "post")
            .unwrap();
        let b = signer
            .sign("/api/v1/trading/placeorder/", r#"{"id":123}"#, 1700000000000, "post")
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn signature_changes_with_any_input() {
        let signer = Signer::new(SECRET).unwrap();
        let base = signer.sign("/path/", "{}", 1000, "post").unwrap();

        assert_ne!(base, signer.sign("/other/", "{}", 1000, "post").unwrap());
        assert_ne!(base, signer.sign("/path/", r#"{"a":1}"#, 1000, "post").unwrap());
        assert_ne!(base, signer.sign("/path/", "{}", 1001, "post").unwrap());
        assert_ne!(base, signer.sign("/path/", "{}", 1000, "get").unwrap());
    }

    #[test]
    fn signature_changes_with_secret() {
        let a = Signer::new(SECRET).unwrap();
        let b = Signer::new("b3RoZXItc2VjcmV0").unwrap(); // "other-secret"
        assert_ne!(
            a.sign("/path/", "{}", 1000, "post").unwrap(),
            b.sign("/path/", "{}", 1000, "post").unwrap()
        );
    }

    #[test]
    fn method_is_uppercased_before_signing() {
        let signer = Signer::new(SECRET).unwrap();
        assert_eq!(
            signer.sign("/path/", "{}", 1000, "post").unwrap(),
            signer.sign("/path/", "{}", 1000, "POST").unwrap()
        );
    }

    #[test]
    fn nonces_strictly_increase() {
        let source = NonceSource::new();
        let mut previous = 0u64;
        for _ in 0..1000 {
            let nonce = source.next();
            assert!(nonce > previous, "nonce {} not above {}", nonce, previous);
            previous = nonce;
        }
    }
}
