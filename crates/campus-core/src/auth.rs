//! Identity gate: password hashing and bearer token issue/verify.
//!
//! Provides:
//! - Salted SHA-256 password digests with constant-time verification
//! - Opaque signed bearer tokens embedding the user id, expiring 24 hours
//!   after issue
//!
//! Token expiry and signature validity are solely this module's concern;
//! callers only ever see the resolved user id or `Unauthenticated`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Token lifetime in hours
const TOKEN_TTL_HOURS: i64 = 24;

/// Salt length in bytes for password hashing
const SALT_LEN: usize = 16;

// ============================================================================
// Passwords
// ============================================================================

/// Hash a password with a fresh random salt.
///
/// Format: `<salt hex>$<sha256(salt || password) hex>`. The raw password is
/// never stored.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);

    let digest = salted_digest(&salt, password);
    format!("{}${}", to_hex(&salt), to_hex(&digest))
}

/// Verify a password against a stored hash in constant time.
///
/// Returns `false` for malformed stored hashes rather than erroring; a
/// corrupted credential row must never let a login through.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let (Some(salt), Some(expected)) = (from_hex(salt_hex), from_hex(digest_hex)) else {
        return false;
    };

    let actual = salted_digest(&salt, password);
    actual.as_slice().ct_eq(expected.as_slice()).into()
}

fn salted_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}

// ============================================================================
// Tokens
// ============================================================================

/// Claims embedded in a bearer token
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    /// Subject: the user id
    sub: Uuid,
    /// Expiry, seconds since the Unix epoch
    exp: i64,
}

/// Issues and verifies signed bearer tokens.
///
/// Token format: `<base64url claims>.<base64url sha256(secret || claims)>`.
/// The signature is compared in constant time; expiry is checked against the
/// embedded `exp` claim.
#[derive(Debug, Clone)]
pub struct TokenSigner {
    secret: [u8; 32],
    ttl: Duration,
}

impl TokenSigner {
    /// Create a signer from a 32-byte secret
    #[must_use]
    pub fn new(secret: [u8; 32]) -> Self {
        Self {
            secret,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Derive the signing secret from a passphrase
    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(phrase.as_bytes());
        let result = hasher.finalize();
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&result);
        Self::new(secret)
    }

    /// Create a signer with a random secret.
    ///
    /// Tokens signed with it do not survive a process restart.
    #[must_use]
    pub fn random() -> Self {
        let mut secret = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self::new(secret)
    }

    /// Override the token lifetime (tests use this to force expiry)
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issue a token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let claims = TokenClaims {
            sub: user_id,
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(payload.as_bytes()));
        Ok(format!("{}.{}", payload, signature))
    }

    /// Verify a token and return the embedded user id.
    ///
    /// Fails `Unauthenticated` for any malformed, tampered, or expired token.
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        let (payload, signature) = token.split_once('.').ok_or(Error::Unauthenticated)?;

        let provided = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| Error::Unauthenticated)?;
        let expected = self.sign(payload.as_bytes());
        let signatures_match: bool = expected.as_slice().ct_eq(provided.as_slice()).into();
        if !signatures_match {
            return Err(Error::Unauthenticated);
        }

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| Error::Unauthenticated)?;
        let claims: TokenClaims =
            serde_json::from_slice(&claims_bytes).map_err(|_| Error::Unauthenticated)?;

        if claims.exp < Utc::now().timestamp() {
            return Err(Error::Unauthenticated);
        }

        Ok(claims.sub)
    }

    fn sign(&self, payload: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.secret);
        hasher.update(payload);
        let result = hasher.finalize();
        let mut signature = [0u8; 32];
        signature.copy_from_slice(&result);
        signature
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn test_malformed_stored_hash_rejected() {
        assert!(!verify_password("anything", "not-a-hash"));
        assert!(!verify_password("anything", "zz$zz"));
    }

    #[test]
    fn test_token_round_trip() {
        let signer = TokenSigner::random();
        let user_id = Uuid::new_v4();
        let token = signer.issue(user_id).unwrap();
        assert_eq!(signer.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let signer = TokenSigner::random();
        let token = signer.issue(Uuid::new_v4()).unwrap();
        let mut tampered = token.clone();
        tampered.truncate(token.len() - 2);
        assert!(matches!(
            signer.verify(&tampered),
            Err(Error::Unauthenticated)
        ));
    }

    #[test]
    fn test_foreign_signer_rejected() {
        let signer = TokenSigner::random();
        let other = TokenSigner::random();
        let token = signer.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(other.verify(&token), Err(Error::Unauthenticated)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = TokenSigner::random().with_ttl(Duration::hours(-1));
        let token = signer.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(signer.verify(&token), Err(Error::Unauthenticated)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let signer = TokenSigner::random();
        assert!(signer.verify("").is_err());
        assert!(signer.verify("no-dot-here").is_err());
        assert!(signer.verify("a.b.c").is_err());
    }

    #[test]
    fn test_same_phrase_same_secret() {
        let a = TokenSigner::from_phrase("campus-secret");
        let b = TokenSigner::from_phrase("campus-secret");
        let token = a.issue(Uuid::new_v4()).unwrap();
        assert!(b.verify(&token).is_ok());
    }
}
