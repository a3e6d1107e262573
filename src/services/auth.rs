use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, database::types::Role, errors::AppError};

/// Payload of the signed session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Password hashing and session token issuing.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    bcrypt_cost: u32,
    // Verified against when the e-mail is unknown, so both login failures cost the same
    dummy_hash: String,
}

impl AuthService {
    pub fn new(secret: &str, token_ttl_hours: i64, bcrypt_cost: u32) -> Result<Self, AppError> {
        let dummy_hash = bcrypt::hash("fieldtrack-dummy-password", bcrypt_cost)?;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::hours(token_ttl_hours),
            bcrypt_cost,
            dummy_hash,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            &config.jwt_secret,
            config.effective_token_ttl_hours(),
            config.effective_bcrypt_cost(),
        )
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        Ok(bcrypt::verify(password, hash)?)
    }

    /// Burns the same amount of work as a real verification and always fails.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = bcrypt::verify(password, &self.dummy_hash);
        false
    }

    pub fn issue_token(
        &self,
        user_id: i32,
        email: &str,
        role: Role,
        name: &str,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            name: name.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Validates signature and expiry.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected session token: {}", e);
                AppError::unauthorized()
            })
    }
}
