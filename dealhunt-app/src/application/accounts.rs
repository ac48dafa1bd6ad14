use crate::domain::{Deal, UserProfile};
use crate::infrastructure::api::{DealsApiClient, NewUserRequest};
use crate::infrastructure::auth::{AuthUser, FirebaseSession, GoogleOAuth};
use crate::infrastructure::security::InputValidator;
use dealhunt_errors::AppError;
use oauth2::{CsrfToken, PkceCodeVerifier};
use std::sync::Arc;

/// Which pane the sign-in dialog shows after the email step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailStep {
    ExistingUser,
    NewUser,
}

/// Sign-in, sign-up and profile flows. Identity lives with the external
/// provider; the deals backend only keeps a registration record per uid.
pub struct Accounts {
    session: Arc<FirebaseSession>,
    api: Arc<DealsApiClient>,
    google: Option<GoogleOAuth>,
}

impl Accounts {
    pub fn new(
        session: Arc<FirebaseSession>,
        api: Arc<DealsApiClient>,
        google: Option<GoogleOAuth>,
    ) -> Self {
        Self {
            session,
            api,
            google,
        }
    }

    /// First dialog step: does this email already have an account?
    pub async fn continue_with_email(&self, email: &str) -> Result<EmailStep, AppError> {
        InputValidator::validate_email(email)?;
        if self.api.user_exists_by_email(email).await? {
            Ok(EmailStep::ExistingUser)
        } else {
            Ok(EmailStep::NewUser)
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        self.session.sign_in(email, password).await
    }

    pub async fn sign_up(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthUser, AppError> {
        InputValidator::validate_email(email)?;
        InputValidator::validate_username(username)?;

        if self.api.username_exists(username).await? {
            return Err(AppError::InvalidInput(format!(
                "The username \"{username}\" is already taken"
            )));
        }

        let user = self.session.sign_up(email, password).await?;
        self.api
            .register_user(&NewUserRequest {
                firebase_user_id: user.uid.clone(),
                email_verified: user.email_verified,
                email: user.email.clone(),
                created_at: chrono::Utc::now(),
                username: username.to_string(),
            })
            .await?;
        Ok(user)
    }

    /// Begin the Google consent flow. The shell opens the URL in a
    /// browser and feeds the captured code to [`Self::sign_in_with_google`].
    pub fn google_authorize_url(
        &self,
    ) -> Result<(String, CsrfToken, PkceCodeVerifier), AppError> {
        Ok(self.google()?.authorize_url())
    }

    pub async fn sign_in_with_google(
        &self,
        code: &str,
        pkce_verifier: PkceCodeVerifier,
    ) -> Result<AuthUser, AppError> {
        let access_token = self.google()?.exchange_code(code, pkce_verifier).await?;
        let user = self.session.sign_in_with_google(&access_token).await?;

        // Best effort: returning users are already registered and the
        // backend treats the duplicate as a no-op.
        let registration = NewUserRequest {
            firebase_user_id: user.uid.clone(),
            email_verified: user.email_verified,
            email: user.email.clone(),
            created_at: chrono::Utc::now(),
            username: user.email.clone().unwrap_or_else(|| user.uid.clone()),
        };
        if let Err(err) = self.api.register_user(&registration).await {
            tracing::warn!("backend registration after Google sign-in failed: {}", err);
        }

        Ok(user)
    }

    pub fn sign_out(&self) {
        self.session.sign_out();
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.session.current_user()
    }

    pub async fn profile(&self) -> Result<UserProfile, AppError> {
        let token = self.bearer().await?;
        self.api.fetch_profile(&token).await
    }

    /// Deals posted by the signed-in user, for the profile page.
    pub async fn my_deals(&self) -> Result<Vec<Deal>, AppError> {
        let Some(user) = self.session.current_user() else {
            return Err(AppError::Unauthenticated);
        };
        let token = self.session.id_token().await?;
        self.api.fetch_user_deals(&user.uid, &token).await
    }

    fn google(&self) -> Result<&GoogleOAuth, AppError> {
        self.google
            .as_ref()
            .ok_or_else(|| AppError::Internal("Google sign-in is not configured".to_string()))
    }

    async fn bearer(&self) -> Result<String, AppError> {
        if self.session.current_user().is_none() {
            return Err(AppError::Unauthenticated);
        }
        self.session.id_token().await
    }
}
