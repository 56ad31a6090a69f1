//! JWT service for token generation and validation
//!
//! Tokens are signed with HS256 using a process-wide secret. All identity
//! is carried in the token itself; there is no session table and no
//! revocation list, so rotating the secret invalidates every token issued
//! before the rotation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{CoreError, CoreResult};

/// Default token lifetime: 24 hours
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 24 * 60 * 60;

/// JWT configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// Shared secret for HMAC signing
    pub secret: String,
    /// Value of the `iss` claim, checked on validation
    pub issuer: String,
    /// Token lifetime in seconds (default: 24 hours)
    pub ttl_seconds: u64,
}

impl TokenConfig {
    /// Create a config with the default 24 hour lifetime
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated username
    pub username: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Issuer
    pub iss: String,
}

/// JWT service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl_seconds: u64,
}

impl TokenService {
    /// Initialize a new JWT service
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        TokenService {
            encoding_key,
            decoding_key,
            validation,
            issuer: config.issuer,
            ttl_seconds: config.ttl_seconds,
        }
    }

    /// Issue a token for `username`, valid for the configured lifetime
    pub fn issue(&self, username: &str) -> CoreResult<String> {
        self.issue_at(username, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`
    pub fn issue_at(&self, username: &str, issued_at: DateTime<Utc>) -> CoreResult<String> {
        let expires_at = issued_at + Duration::seconds(self.ttl_seconds as i64);

        let claims = Claims {
            username: username.to_string(),
            iat: unix_seconds(issued_at),
            exp: unix_seconds(expires_at),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!("Failed to sign token: {}", e);
            CoreError::Unavailable(format!("token signing failed: {}", e))
        })
    }

    /// Validate a token and return the username it was issued for
    ///
    /// The signature is checked before the expiry, so a tampered token is
    /// always reported as `InvalidToken` even when it is also stale.
    pub fn validate(&self, token: &str) -> CoreResult<String> {
        self.validate_claims(token).map(|claims| claims.username)
    }

    /// Validate a token and return all of its claims
    pub fn validate_claims(&self, token: &str) -> CoreResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CoreError::ExpiredToken,
                _ => {
                    debug!("Rejected token: {}", e);
                    CoreError::InvalidToken
                }
            })
    }

    /// Token lifetime in seconds
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}

fn unix_seconds(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp()).unwrap_or(0)
}
