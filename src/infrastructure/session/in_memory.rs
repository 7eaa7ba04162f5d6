use crate::core::errors::TrackerError;
use crate::infrastructure::session::SessionStore;
use crate::infrastructure::session::session_keys::{refresh_token_key, revoked_access_key};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Key → (owning user id, expiry).
#[derive(Clone, Default)]
pub struct InMemorySessions {
    entries: Arc<RwLock<HashMap<String, (String, DateTime<Utc>)>>>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        InMemorySessions {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessions {
    async fn save_refresh_token(
        &self,
        token: &str,
        user_id: &str,
        ttl: std::time::Duration,
    ) -> Result<(), TrackerError> {
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| TrackerError::SessionError(format!("Failed to convert TTL: {}", e)))?;
        let mut entries = self.entries.write().await;
        let now = Utc::now();
        entries.retain(|_, (_, expiry)| *expiry > now);
        entries.insert(refresh_token_key(token), (user_id.to_string(), expires_at));
        Ok(())
    }

    async fn take_refresh_token(&self, token: &str) -> Result<Option<String>, TrackerError> {
        let mut entries = self.entries.write().await;
        Ok(entries
            .remove(&refresh_token_key(token))
            .filter(|(_, expiry)| *expiry > Utc::now())
            .map(|(user_id, _)| user_id))
    }

    async fn revoke_user_sessions(&self, user_id: &str) -> Result<(), TrackerError> {
        let mut entries = self.entries.write().await;
        let prefix = refresh_token_key("");
        entries.retain(|key, (owner, _)| !(key.starts_with(&prefix) && owner == user_id));
        Ok(())
    }

    async fn revoke_access_token(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), TrackerError> {
        let mut entries = self.entries.write().await;
        let now = Utc::now();
        entries.retain(|_, (_, expiry)| *expiry > now);
        if expires_at > now {
            entries.insert(revoked_access_key(jti), (String::new(), expires_at));
        }
        Ok(())
    }

    async fn is_access_token_revoked(&self, jti: &str) -> Result<bool, TrackerError> {
        let entries = self.entries.read().await;
        Ok(entries.contains_key(&revoked_access_key(jti)))
    }
}
