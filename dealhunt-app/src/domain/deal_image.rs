use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealImage {
    pub image_id: uuid::Uuid,
    pub image_url: String,
}
