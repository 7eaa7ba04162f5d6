use chrono::{DateTime, Utc};

/// A registered account. Only ever leaves the service as
/// [`UserResponse`](crate::api::models::UserResponse), never with its hash.
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
