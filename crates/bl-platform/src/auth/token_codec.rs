//! Token Codec
//!
//! Signs and verifies the HS256 bearer tokens that carry a principal's identity.
//! The signing secret is handed in at construction and never read from the environment here.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::auth::identity::Principal;

/// Claims carried inside an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID as hex ObjectId)
    pub sub: String,

    pub username: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token: {message}")]
    Invalid { message: String },

    #[error("token expired")]
    Expired,

    #[error("failed to sign token: {message}")]
    Signing { message: String },
}

/// Configuration for the token codec
#[derive(Debug, Clone)]
pub struct TokenCodecConfig {
    /// HMAC secret
    pub secret: String,

    pub issuer: String,

    /// Validity window in seconds
    pub token_expiry_secs: i64,
}

impl TokenCodecConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: "bloglist".to_string(),
            token_expiry_secs: 3600,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_expiry_secs(mut self, secs: i64) -> Self {
        self.token_expiry_secs = secs;
        self
    }
}

pub struct TokenCodec {
    config: TokenCodecConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: TokenCodecConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        info!(issuer = %config.issuer, expiry_secs = config.token_expiry_secs, "TokenCodec initialized with HS256");

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Validity window of issued tokens, `None` when out of range
    pub fn token_expiry(&self) -> Option<Duration> {
        Duration::try_seconds(self.config.token_expiry_secs)
    }

    /// Sign a token for `principal`, issued now.
    pub fn sign(&self, principal: &Principal) -> Result<String, TokenError> {
        self.sign_issued_at(principal, Utc::now())
    }

    /// Sign a token with an explicit issuance time. Same inputs give the same token.
    pub fn sign_issued_at(&self, principal: &Principal, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let expires_at = self
            .token_expiry()
            .and_then(|expiry| issued_at.checked_add_signed(expiry))
            .ok_or_else(|| TokenError::Signing {
                message: format!("token expiry of {}s is out of range", self.config.token_expiry_secs),
            })?;

        let claims = TokenClaims {
            sub: principal.user_id.to_hex(),
            username: principal.username.clone(),
            iss: self.config.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing { message: e.to_string() })
    }

    /// Verify a token and return the decoded claims.
    pub fn decode_claims(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid { message: e.to_string() },
            })
    }

    /// Verify a token and return the principal it names.
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let claims = self.decode_claims(token)?;
        let user_id = bson::oid::ObjectId::parse_str(&claims.sub).map_err(|_| TokenError::Invalid {
            message: "subject is not a user id".to_string(),
        })?;

        Ok(Principal {
            user_id,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(TokenCodecConfig::new(secret))
    }

    fn principal() -> Principal {
        Principal::new(ObjectId::new(), "root")
    }

    #[test]
    fn test_sign_and_verify_round_trip() {
        let codec = codec("test-secret");
        let principal = principal();

        let token = codec.sign(&principal).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), principal);
    }

    #[test]
    fn test_signing_is_deterministic_for_fixed_issuance() {
        let codec = codec("test-secret");
        let principal = principal();
        let issued_at = Utc::now();

        let a = codec.sign_issued_at(&principal, issued_at).unwrap();
        let b = codec.sign_issued_at(&principal, issued_at).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_claims_carry_identity_and_window() {
        let codec = TokenCodec::new(TokenCodecConfig::new("test-secret").with_expiry_secs(600));
        let principal = principal();
        let issued_at = Utc::now();

        let token = codec.sign_issued_at(&principal, issued_at).unwrap();
        let claims = codec.decode_claims(&token).unwrap();

        assert_eq!(claims.sub, principal.user_id.to_hex());
        assert_eq!(claims.username, "root");
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let codec = codec("test-secret");
        let issued_at = Utc::now() - Duration::hours(2);

        let token = codec.sign_issued_at(&principal(), issued_at).unwrap();
        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = codec("secret-a").sign(&principal()).unwrap();
        assert!(matches!(codec("secret-b").verify(&token), Err(TokenError::Invalid { .. })));
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let other = TokenCodec::new(TokenCodecConfig::new("test-secret").with_issuer("elsewhere"));
        let token = other.sign(&principal()).unwrap();
        assert!(matches!(codec("test-secret").verify(&token), Err(TokenError::Invalid { .. })));
    }

    #[test]
    fn test_out_of_range_expiry_fails_to_sign() {
        let codec = TokenCodec::new(TokenCodecConfig::new("test-secret").with_expiry_secs(10_000_000_000_000_000));
        assert!(codec.token_expiry().is_none());
        assert!(matches!(codec.sign(&principal()), Err(TokenError::Signing { .. })));

        let codec = TokenCodec::new(TokenCodecConfig::new("test-secret").with_expiry_secs(i64::MAX / 1_000));
        assert!(matches!(codec.sign(&principal()), Err(TokenError::Signing { .. })));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(codec("test-secret").verify("not.a.jwt"), Err(TokenError::Invalid { .. })));
        assert!(matches!(codec("test-secret").verify(""), Err(TokenError::Invalid { .. })));
    }
}
