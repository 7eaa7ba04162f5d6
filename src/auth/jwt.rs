use crate::core::errors::TrackerError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,   // User ID
    pub email: String,
    pub jti: String,   // Token ID, used for revocation on logout
    pub iat: usize,
    pub exp: usize,    // Expiration timestamp
}

impl Claims {
    /// First instant at which the token no longer validates. `exp` is checked
    /// in whole seconds with no leeway, so the token is accepted through the
    /// whole of second `exp`.
    pub fn valid_until(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp(self.exp as i64 + 1, 0).unwrap_or_else(chrono::Utc::now)
    }
}

pub struct JwtService {
    secret: String,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: String, ttl: Duration) -> Self {
        JwtService { secret, ttl }
    }

    pub fn generate_token(&self, user_id: &str, email: &str) -> Result<String, TrackerError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TrackerError::InternalServerError(format!("Time error: {}", e)))?
            .as_secs() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TrackerError::InternalServerError(format!("JWT encoding error: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, TrackerError> {
        let mut validation = Validation::default();
        // revocations are only kept until `valid_until`
        validation.leeway = 0;
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| TrackerError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}
