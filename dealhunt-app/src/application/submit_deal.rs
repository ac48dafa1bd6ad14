use crate::domain::{Deal, DealDraft};
use crate::infrastructure::api::{DealsApiClient, ImageUpload};
use crate::infrastructure::auth::FirebaseSession;
use crate::infrastructure::security::InputValidator;
use dealhunt_errors::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Create, edit and retire deals on behalf of the signed-in user.
pub struct SubmitDeal {
    session: Arc<FirebaseSession>,
    api: Arc<DealsApiClient>,
}

impl SubmitDeal {
    pub fn new(session: Arc<FirebaseSession>, api: Arc<DealsApiClient>) -> Self {
        Self { session, api }
    }

    pub async fn post(
        &self,
        draft: DealDraft,
        images: Vec<ImageUpload>,
    ) -> Result<Deal, AppError> {
        InputValidator::validate_draft(&draft)?;
        InputValidator::validate_images(&images)?;

        let token = self.bearer().await?;
        let deal = self.api.create_deal(&draft, &token).await?;
        if !images.is_empty() {
            self.api.upload_images(deal.deal_id, images, &token).await?;
        }
        tracing::info!("posted deal {}", deal.deal_id);
        Ok(deal)
    }

    /// Edit flow: update the record, drop the images the user removed,
    /// then upload any new ones.
    pub async fn update(
        &self,
        deal_id: Uuid,
        draft: DealDraft,
        new_images: Vec<ImageUpload>,
        removed_images: Vec<Uuid>,
    ) -> Result<Deal, AppError> {
        InputValidator::validate_draft(&draft)?;
        InputValidator::validate_images(&new_images)?;

        let token = self.bearer().await?;
        let deal = self.api.update_deal(deal_id, &draft, &token).await?;
        for image_id in removed_images {
            self.api.delete_image(deal_id, image_id, &token).await?;
        }
        if !new_images.is_empty() {
            self.api.upload_images(deal_id, new_images, &token).await?;
        }
        Ok(deal)
    }

    /// Soft removal; the poster can undo it with `reactivate`.
    pub async fn remove(&self, deal_id: Uuid) -> Result<(), AppError> {
        let token = self.bearer().await?;
        self.api.deactivate_deal(deal_id, &token).await
    }

    pub async fn reactivate(&self, deal_id: Uuid) -> Result<(), AppError> {
        let token = self.bearer().await?;
        self.api.reactivate_deal(deal_id, &token).await
    }

    async fn bearer(&self) -> Result<String, AppError> {
        if self.session.current_user().is_none() {
            return Err(AppError::Unauthenticated);
        }
        self.session.id_token().await
    }
}
