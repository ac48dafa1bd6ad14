use serde::{Deserialize, Serialize};

/// The backend's profile record for a registered user. The `user_id` is
/// the identity provider's uid, not a backend-generated key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    pub email: Option<String>,
    pub profile_pic: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub total_deals: Option<i32>,
    pub total_likes: Option<i32>,
}
