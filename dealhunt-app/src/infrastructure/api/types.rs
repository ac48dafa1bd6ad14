use crate::domain::{UserProfile, VoteDirection, VoteOutcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct VoteRequest {
    pub deal_id: uuid::Uuid,
    pub vote_type: VoteDirection,
}

impl VoteRequest {
    pub fn new(deal_id: uuid::Uuid, vote_type: VoteDirection) -> Self {
        Self { deal_id, vote_type }
    }
}

#[derive(Debug, Deserialize)]
pub struct VoteResponse {
    pub action: VoteOutcome,
}

#[derive(Debug, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// `/user/profile` wraps the record in a `details` envelope.
#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub details: UserProfile,
}

/// Registration record linking an identity-provider account to a backend
/// user row.
#[derive(Debug, Serialize)]
pub struct NewUserRequest {
    pub firebase_user_id: String,
    pub email_verified: bool,
    pub email: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub username: String,
}

/// An image the view layer has already read into memory, queued for a
/// multipart upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_wire_shapes() {
        let request = VoteRequest::new(uuid::Uuid::nil(), VoteDirection::Up);
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["vote_type"], "up");

        let response: VoteResponse = serde_json::from_str(r#"{"action":"removed"}"#).unwrap();
        assert_eq!(response.action, VoteOutcome::Removed);
    }
}
