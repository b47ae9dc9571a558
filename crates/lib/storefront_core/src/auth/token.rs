//! Signed identity tokens (HS256 JWT).
//!
//! Tokens carry an [`IdentityClaim`] plus `iat`/`exp`. A token is valid iff
//! its signature matches the server secret and its expiry has not elapsed.
//! Verification checks the signature before the expiry, so a tampered token
//! is reported as [`TokenError::SignatureInvalid`] even when it is also stale.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::models::auth::{IdentityClaim, TokenClaims};

/// Default token lifetime: 1 hour.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Token issuance and verification failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature does not match the secret, or the token was altered.
    #[error("invalid signature")]
    SignatureInvalid,

    /// Signature is good but `exp` has been reached.
    #[error("token expired")]
    Expired,

    /// Not a decodable token: wrong segment count, bad base64/JSON,
    /// unexpected algorithm or missing claims.
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token encode: {0}")]
    Encode(String),
}

/// Issue a token for `claim`, signed with `secret`, expiring `ttl` from now.
pub fn issue(claim: &IdentityClaim, secret: &[u8], ttl: Duration) -> Result<String, TokenError> {
    issue_at(claim, &EncodingKey::from_secret(secret), ttl, Utc::now())
}

/// Verify `token` against `secret` and return the claim it carries.
pub fn verify(token: &str, secret: &[u8]) -> Result<IdentityClaim, TokenError> {
    verify_at(token, &DecodingKey::from_secret(secret), Utc::now())
}

fn issue_at(
    claim: &IdentityClaim,
    key: &EncodingKey,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let exp = now
        .checked_add_signed(ttl)
        .ok_or_else(|| TokenError::Encode(format!("token lifetime {ttl} out of range")))?;
    let claims = TokenClaims {
        sub: claim.subject_id.clone(),
        email: claim.email.clone(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };
    encode(&Header::new(ALGORITHM), &claims, key).map_err(|e| TokenError::Encode(e.to_string()))
}

fn verify_at(token: &str, key: &DecodingKey, now: DateTime<Utc>) -> Result<IdentityClaim, TokenError> {
    // Expiry is checked below against `now` with no leeway; the library only
    // enforces signature, algorithm and claim presence.
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<TokenClaims>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(e.to_string()),
        })?;

    if now.timestamp() >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(claims.into())
}

/// Token codec bound to the process signing secret and token lifetime.
///
/// Built once at startup and cloned into request state; it never changes
/// afterwards.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Lifetime applied to issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, claim: &IdentityClaim) -> Result<String, TokenError> {
        issue_at(claim, &self.encoding, self.ttl, Utc::now())
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        verify_at(token, &self.decoding, Utc::now())
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;

    fn claim() -> IdentityClaim {
        IdentityClaim::new("0195f0a4-5c1e-7d3a-9a0b-3f2d6c1e8b77", "ada@example.com")
    }

    fn hour() -> Duration {
        Duration::hours(1)
    }

    #[test]
    fn issue_then_verify_returns_original_claim() {
        let token = issue(&claim(), b"secret-a", hour()).unwrap();
        assert_eq!(verify(&token, b"secret-a").unwrap(), claim());
    }

    #[test]
    fn token_has_three_segments() {
        let token = issue(&claim(), b"secret-a", hour()).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn wrong_secret_is_signature_invalid() {
        let token = issue(&claim(), b"secret-a", hour()).unwrap();
        assert_eq!(verify(&token, b"secret-b"), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn zero_ttl_is_expired_not_invalid() {
        let token = issue(&claim(), b"secret-a", Duration::zero()).unwrap();
        assert_eq!(verify(&token, b"secret-a"), Err(TokenError::Expired));
    }

    #[test]
    fn elapsed_ttl_is_expired() {
        let token = issue(&claim(), b"secret-a", Duration::seconds(-30)).unwrap();
        assert_eq!(verify(&token, b"secret-a"), Err(TokenError::Expired));
    }

    #[test]
    fn expiry_is_checked_against_the_given_clock() {
        let key = EncodingKey::from_secret(b"secret-a");
        let dkey = DecodingKey::from_secret(b"secret-a");
        let issued = Utc::now() - Duration::minutes(90);

        let token = issue_at(&claim(), &key, hour(), issued).unwrap();
        assert_eq!(
            verify_at(&token, &dkey, issued + Duration::minutes(59)).unwrap(),
            claim()
        );
        assert_eq!(
            verify_at(&token, &dkey, issued + Duration::minutes(60)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn expired_token_with_wrong_secret_is_signature_invalid() {
        let token = issue(&claim(), b"secret-a", Duration::seconds(-30)).unwrap();
        assert_eq!(verify(&token, b"secret-b"), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn tampered_payload_is_signature_invalid() {
        let token = issue(&claim(), b"secret-a", hour()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let payload = String::from_utf8(payload)
            .unwrap()
            .replace("ada@example.com", "eve@example.com");
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(payload),
            parts[2]
        );

        assert_eq!(verify(&forged, b"secret-a"), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            verify("not-a-token", b"secret-a"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(verify("", b"secret-a"), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn codec_round_trip_and_ttl() {
        let codec = TokenCodec::new(b"codec-secret", Duration::minutes(5));
        let token = codec.issue(&claim()).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), claim());
        assert_eq!(codec.ttl(), Duration::minutes(5));

        let other = TokenCodec::new(b"other-secret", Duration::minutes(5));
        assert_eq!(other.verify(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn unrepresentable_expiry_is_an_encode_error() {
        let million_years = Duration::days(365 * 1_000_000);
        assert!(matches!(
            issue(&claim(), b"secret-a", million_years),
            Err(TokenError::Encode(_))
        ));

        let codec = TokenCodec::new(b"codec-secret", Duration::seconds(10_000_000_000_000));
        assert!(matches!(codec.issue(&claim()), Err(TokenError::Encode(_))));
    }

    #[test]
    fn codec_debug_redacts_secret() {
        let codec = TokenCodec::new(b"super-secret-value", hour());
        let rendered = format!("{codec:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("<redacted>"));
    }
}
