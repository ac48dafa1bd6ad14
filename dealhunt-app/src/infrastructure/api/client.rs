use super::types::{ExistsResponse, ImageUpload, NewUserRequest, ProfileResponse, VoteRequest, VoteResponse};
use crate::application::DealVoteApi;
use crate::domain::{
    Category, CategoryWithDeals, Deal, DealDraft, DealImage, DealWithDetails, UserProfile,
    VoteDirection, VoteOutcome,
};
use dealhunt_errors::AppError;
use uuid::Uuid;

/// Client for the deals REST backend. Read endpoints are public; mutations
/// carry the caller's bearer credential.
pub struct DealsApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl DealsApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn fetch_deals(&self) -> Result<Vec<Deal>, AppError> {
        let response = self
            .http_client
            .get(self.endpoint("/deals"))
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        read_json(response, "fetch deals").await
    }

    pub async fn fetch_deal(&self, deal_id: Uuid) -> Result<DealWithDetails, AppError> {
        let response = self
            .http_client
            .get(self.endpoint(&format!("/deals/{deal_id}/full")))
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::DealNotFound);
        }
        read_json(response, "fetch deal").await
    }

    pub async fn fetch_deal_images(&self, deal_id: Uuid) -> Result<Vec<DealImage>, AppError> {
        let response = self
            .http_client
            .get(self.endpoint(&format!("/deals/{deal_id}/images")))
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        read_json(response, "fetch deal images").await
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, AppError> {
        let response = self
            .http_client
            .get(self.endpoint("/categories"))
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        read_json(response, "fetch categories").await
    }

    pub async fn fetch_categories_with_deals(&self) -> Result<Vec<CategoryWithDeals>, AppError> {
        let response = self
            .http_client
            .get(self.endpoint("/categories-with-deals"))
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        read_json(response, "fetch categories with deals").await
    }

    pub async fn fetch_user_deals(
        &self,
        user_id: &str,
        bearer: &str,
    ) -> Result<Vec<Deal>, AppError> {
        let response = self
            .http_client
            .get(self.endpoint(&format!("/deals/user/{user_id}")))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        read_json(response, "fetch user deals").await
    }

    pub async fn create_deal(&self, draft: &DealDraft, bearer: &str) -> Result<Deal, AppError> {
        let response = self
            .http_client
            .post(self.endpoint("/deals"))
            .bearer_auth(bearer)
            .json(draft)
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        read_json(response, "create deal").await
    }

    pub async fn update_deal(
        &self,
        deal_id: Uuid,
        draft: &DealDraft,
        bearer: &str,
    ) -> Result<Deal, AppError> {
        let response = self
            .http_client
            .put(self.endpoint(&format!("/deals/{deal_id}")))
            .bearer_auth(bearer)
            .json(draft)
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        read_json(response, "update deal").await
    }

    /// Soft-deletes; the deal stays fetchable and can be reactivated.
    pub async fn deactivate_deal(&self, deal_id: Uuid, bearer: &str) -> Result<(), AppError> {
        let response = self
            .http_client
            .delete(self.endpoint(&format!("/deals/{deal_id}")))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        expect_success(response, "deactivate deal").await
    }

    pub async fn reactivate_deal(&self, deal_id: Uuid, bearer: &str) -> Result<(), AppError> {
        let response = self
            .http_client
            .put(self.endpoint(&format!("/deals/{deal_id}/reactivate")))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        expect_success(response, "reactivate deal").await
    }

    pub async fn upload_images(
        &self,
        deal_id: Uuid,
        images: Vec<ImageUpload>,
        bearer: &str,
    ) -> Result<(), AppError> {
        let mut form = reqwest::multipart::Form::new();
        for image in images {
            let part = reqwest::multipart::Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)
                .map_err(|e| AppError::InvalidInput(e.to_string()))?;
            form = form.part("images", part);
        }
        let response = self
            .http_client
            .post(self.endpoint(&format!("/deals/{deal_id}/images/multiple")))
            .bearer_auth(bearer)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        expect_success(response, "upload images").await
    }

    pub async fn delete_image(
        &self,
        deal_id: Uuid,
        image_id: Uuid,
        bearer: &str,
    ) -> Result<(), AppError> {
        let response = self
            .http_client
            .delete(self.endpoint(&format!("/deals/{deal_id}/images/{image_id}")))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        expect_success(response, "delete image").await
    }

    pub async fn user_exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        self.user_exists(&[("email", email)]).await
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        self.user_exists(&[("username", username)]).await
    }

    async fn user_exists(&self, query: &[(&str, &str)]) -> Result<bool, AppError> {
        let response = self
            .http_client
            .get(self.endpoint("/user/exists"))
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        let exists: ExistsResponse = read_json(response, "check user exists").await?;
        Ok(exists.exists)
    }

    pub async fn register_user(&self, new_user: &NewUserRequest) -> Result<(), AppError> {
        let response = self
            .http_client
            .post(self.endpoint("/addnewuser"))
            .json(new_user)
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        expect_success(response, "register user").await
    }

    pub async fn fetch_profile(&self, bearer: &str) -> Result<UserProfile, AppError> {
        let response = self
            .http_client
            .get(self.endpoint("/user/profile"))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.to_string()))?;
        let profile: ProfileResponse = read_json(response, "fetch profile").await?;
        Ok(profile.details)
    }
}

impl DealVoteApi for DealsApiClient {
    async fn submit_vote(
        &self,
        deal_id: Uuid,
        direction: VoteDirection,
        bearer: &str,
    ) -> Result<VoteOutcome, AppError> {
        let request = VoteRequest::new(deal_id, direction);
        let response = self
            .http_client
            .put(self.endpoint("/deals/addremove/vote"))
            .bearer_auth(bearer)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::VoteFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("vote endpoint error: {} - {}", status, body);
            return Err(AppError::VoteFailed(format!("vote: {status}")));
        }

        let vote: VoteResponse = response
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse(e.to_string()))?;
        Ok(vote.action)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!("deals API error: {}: {} - {}", what, status, body);
        return Err(AppError::ApiError(format!("{what}: {status}")));
    }
    response
        .json()
        .await
        .map_err(|e| AppError::MalformedResponse(e.to_string()))
}

async fn expect_success(response: reqwest::Response, what: &str) -> Result<(), AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!("deals API error: {}: {} - {}", what, status, body);
        return Err(AppError::ApiError(format!("{what}: {status}")));
    }
    Ok(())
}
