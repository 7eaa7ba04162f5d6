pub mod in_memory;

use crate::core::errors::TrackerError;
use crate::core::models::AppLog;
use async_trait::async_trait;

/// Audit trail of mutating actions.
#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), TrackerError>;
    /// Entries recorded for `user_id`, newest first.
    async fn get_logs(&self, user_id: &str) -> Result<Vec<AppLog>, TrackerError>;
}
