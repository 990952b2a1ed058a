//! Access and refresh tokens.
//!
//! Access tokens are HS256 JWTs issued by `trinity-api`. They carry the
//! user's id, username and role so role checks never touch the database.
//! Refresh tokens are opaque; the database only ever sees their SHA-256.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use trinity_core::env::{self, EnvError};
use trinity_core::hashing::sha256_hex;
use trinity_core::roles::validate_role;
use trinity_core::types::DbId;
use uuid::Uuid;

/// `iss` of every token this service signs; anything else is rejected.
pub const ISSUER: &str = "trinity-api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: DbId,
    pub username: String,
    /// `admin`, `manager` or `employee`.
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// `JWT_SECRET` (required), `JWT_ACCESS_EXPIRY_MINS` (15) and
    /// `JWT_REFRESH_EXPIRY_DAYS` (7).
    pub fn from_env() -> Result<Self, EnvError> {
        Ok(Self {
            secret: env::required("JWT_SECRET")?,
            access_token_expiry_mins: env::var_or("JWT_ACCESS_EXPIRY_MINS", 15)?,
            refresh_token_expiry_days: env::var_or("JWT_REFRESH_EXPIRY_DAYS", 7)?,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_mins)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_expiry_days)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}

/// Sign an access token for a user.
pub fn issue_access_token(
    user_id: DbId,
    username: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role: role.to_string(),
        iss: ISSUER.to_string(),
        iat: now.timestamp(),
        exp: (now + config.access_ttl()).timestamp(),
        jti: Uuid::new_v4(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Why a presented access token was refused.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token carries unknown role '{0}'")]
    UnknownRole(String),
}

/// Verify signature, expiry and issuer, and that the role is one we know.
pub fn verify_access_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )?
    .claims;
    validate_role(&claims.role).map_err(|_| TokenError::UnknownRole(claims.role.clone()))?;
    Ok(claims)
}

/// A freshly minted refresh token. Hand `token` to the client and store `hash`.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub token: String,
    pub hash: String,
}

impl RefreshToken {
    pub fn generate() -> Self {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let hash = hash_refresh_token(&token);
        Self { token, hash }
    }
}

pub fn hash_refresh_token(token: &str) -> String {
    sha256_hex(token.as_bytes())
}
