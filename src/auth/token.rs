use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer written into, and required from, every session token.
pub const TOKEN_ISSUER: &str = "tasked-api";

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Represents the claims encoded within a session token.
///
/// Identity is embedded directly so protected handlers need no database
/// lookup per request. A token stays valid until `exp` even if the user is
/// deleted in the meantime.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub username: String,
    pub iss: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expires-at, seconds since the epoch.
    pub exp: i64,
}

/// Issues and validates HS256-signed session tokens.
///
/// Holds the server's symmetric secret and the configured token lifetime.
/// Built once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry_hours: i64,
}

impl TokenManager {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_hours,
        }
    }

    pub fn expiry_hours(&self) -> i64 {
        self.expiry_hours
    }

    /// Generates a token for the given identity, valid for the configured
    /// number of hours from now.
    ///
    /// Returns `AppError::InternalServerError` if signing fails or the expiry
    /// instant is not representable.
    pub fn generate_token(
        &self,
        user_id: i64,
        email: &str,
        username: &str,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(self.expiry_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::InternalServerError(format!(
                    "Failed to generate token: expiry of {} hours is out of range",
                    self.expiry_hours
                ))
            })?;

        let claims = Claims {
            user_id,
            email: email.to_string(),
            username: username.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))?;
        log::debug!("issued token for user {}", user_id);
        Ok(token)
    }

    /// Verifies a token and decodes its claims.
    ///
    /// Checks the signature, that the header names HS256 (tokens signed with any
    /// other algorithm are rejected), the issuer and the expiry instant.
    ///
    /// Returns `AppError::Unauthorized` if the token is malformed, tampered with,
    /// signed with another algorithm or expired.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {:?}", e.kind())))
    }

    /// Validates `old_token` and issues a fresh token for the same identity.
    ///
    /// There is no grace period: an expired token cannot be refreshed.
    pub fn refresh_token(&self, old_token: &str) -> Result<String, AppError> {
        let claims = self.validate_token(old_token)?;
        self.generate_token(claims.user_id, &claims.email, &claims.username)
    }
}
