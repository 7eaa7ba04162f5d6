pub mod in_memory;
pub mod session_keys;

use crate::core::errors::TrackerError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Server-side token state: refresh tokens issued at sign-in and access
/// tokens revoked before their natural expiry.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save_refresh_token(
        &self,
        token: &str,
        user_id: &str,
        ttl: std::time::Duration,
    ) -> Result<(), TrackerError>;
    /// Consumes a refresh token, returning its owner if it was live.
    async fn take_refresh_token(&self, token: &str) -> Result<Option<String>, TrackerError>;
    async fn revoke_user_sessions(&self, user_id: &str) -> Result<(), TrackerError>;
    async fn revoke_access_token(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), TrackerError>;
    async fn is_access_token_revoked(&self, jti: &str) -> Result<bool, TrackerError>;
}
