//! JWT issuance and verification.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::{AppError, AppResult};

/// JWT claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Username at issue time.
    pub username: String,
    /// Expiration time (unix seconds).
    pub exp: i64,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Issue time of the first token in a refresh chain.
    pub orig_iat: i64,
}

impl Claims {
    /// The authenticated user's ID.
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::AuthenticationRequired)
    }
}

/// Signs and verifies HS256 tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenIssuer {
    /// Create an issuer from configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl_secs: config.token_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    /// Issue a fresh token for a user.
    pub fn issue(&self, user_id: i64, username: &str) -> AppResult<String> {
        let now = Utc::now().timestamp();
        self.sign(&Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: now + self.token_ttl_secs,
            iat: now,
            orig_iat: now,
        })
    }

    /// Verify a token's signature and expiry.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AppError::AuthenticationRequired
            })
    }

    /// Exchange a valid token for a new one, keeping the original issue time.
    ///
    /// Fails once the refresh window measured from `orig_iat` has elapsed.
    pub fn refresh(&self, token: &str) -> AppResult<(String, Claims)> {
        let claims = self.verify(token)?;
        let now = Utc::now().timestamp();

        if now > self.refresh_expires_at(&claims) {
            return Err(AppError::AuthenticationRequired);
        }

        let refreshed = Claims {
            exp: now + self.token_ttl_secs,
            iat: now,
            ..claims
        };
        let token = self.sign(&refreshed)?;
        Ok((token, refreshed))
    }

    /// Unix time after which the token chain can no longer be refreshed.
    #[must_use]
    pub const fn refresh_expires_at(&self, claims: &Claims) -> i64 {
        claims.orig_iat + self.refresh_ttl_secs
    }

    fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }
}
