use crate::application::AuthSession;
use chrono::{DateTime, Duration, Utc};
use dealhunt_errors::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";

/// Tokens within this window of expiry are refreshed before use.
const TOKEN_EXPIRY_LEEWAY_SECS: i64 = 60;
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub email_verified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordCredentials {
    email: String,
    password: String,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpCredentials {
    post_body: String,
    request_uri: String,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenGrant {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
    #[serde(default)]
    email_verified: bool,
}

// The token refresh endpoint answers in snake_case, unlike the rest of
// the identity toolkit.
#[derive(Debug, Deserialize)]
struct RefreshGrant {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    error: AuthErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AuthErrorDetail {
    message: String,
}

/// REST client for the hosted identity provider (Google Identity
/// Toolkit). Issues and refreshes the short-lived bearer tokens the deals
/// backend verifies.
pub struct FirebaseAuthClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl FirebaseAuthClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenGrant, AppError> {
        let credentials = PasswordCredentials {
            email: email.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };
        self.grant_request("accounts:signInWithPassword", &credentials)
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<TokenGrant, AppError> {
        let credentials = PasswordCredentials {
            email: email.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };
        self.grant_request("accounts:signUp", &credentials).await
    }

    /// Federated sign-in with an access token obtained from Google's
    /// OAuth consent flow.
    async fn sign_in_with_idp(&self, provider_access_token: &str) -> Result<TokenGrant, AppError> {
        let credentials = IdpCredentials {
            post_body: format!("access_token={provider_access_token}&providerId=google.com"),
            request_uri: "http://localhost".to_string(),
            return_secure_token: true,
        };
        self.grant_request("accounts:signInWithIdp", &credentials)
            .await
    }

    async fn grant_request<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<TokenGrant, AppError> {
        let url = format!(
            "{IDENTITY_TOOLKIT_URL}/{endpoint}?key={}",
            self.api_key
        );
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::AuthFailed(e.to_string()))?;
        Self::read_grant(response).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshGrant, AppError> {
        let url = format!("{SECURE_TOKEN_URL}?key={}", self.api_key);
        let response = self
            .http_client
            .post(url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::AuthFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("token refresh rejected: {}", status);
            return Err(AppError::Unauthenticated);
        }
        response
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse(e.to_string()))
    }

    async fn read_grant(response: reqwest::Response) -> Result<TokenGrant, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<AuthErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.to_string());
            tracing::warn!("identity provider rejected credentials: {}", message);
            return Err(AppError::AuthFailed(message));
        }
        response
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse(e.to_string()))
    }
}

struct SessionTokens {
    user: AuthUser,
    id_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl SessionTokens {
    fn from_grant(grant: TokenGrant, now: DateTime<Utc>) -> Self {
        Self {
            user: AuthUser {
                uid: grant.local_id,
                email: grant.email,
                display_name: grant.display_name,
                email_verified: grant.email_verified,
            },
            id_token: grant.id_token,
            refresh_token: grant.refresh_token,
            expires_at: now + token_lifetime(&grant.expires_in),
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_EXPIRY_LEEWAY_SECS) < self.expires_at
    }
}

fn token_lifetime(expires_in: &str) -> Duration {
    Duration::seconds(
        expires_in
            .parse()
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
    )
}

/// The client's view of "who is signed in". Holds the current grant and
/// transparently refreshes the bearer token when it goes stale. With no
/// grant present every credentialed operation fails closed with
/// `Unauthenticated`.
pub struct FirebaseSession {
    client: FirebaseAuthClient,
    state: Mutex<Option<SessionTokens>>,
}

impl FirebaseSession {
    pub fn new(client: FirebaseAuthClient) -> Self {
        Self {
            client,
            state: Mutex::new(None),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let grant = self.client.sign_in_with_password(email, password).await?;
        Ok(self.store(grant))
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let grant = self.client.sign_up(email, password).await?;
        Ok(self.store(grant))
    }

    pub async fn sign_in_with_google(
        &self,
        provider_access_token: &str,
    ) -> Result<AuthUser, AppError> {
        let grant = self.client.sign_in_with_idp(provider_access_token).await?;
        Ok(self.store(grant))
    }

    pub fn sign_out(&self) {
        *self.state.lock().unwrap() = None;
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.lock().unwrap().as_ref().map(|s| s.user.clone())
    }

    /// A bearer token valid for at least the leeway window, refreshed
    /// through the identity provider when the cached one has gone stale.
    pub async fn id_token(&self) -> Result<String, AppError> {
        let refresh_token = {
            let state = self.state.lock().unwrap();
            let Some(tokens) = state.as_ref() else {
                return Err(AppError::Unauthenticated);
            };
            if tokens.is_fresh(Utc::now()) {
                return Ok(tokens.id_token.clone());
            }
            tokens.refresh_token.clone()
        };

        // Lock released across the network call.
        let grant = self.client.refresh(&refresh_token).await?;

        let mut state = self.state.lock().unwrap();
        match state.as_mut() {
            Some(tokens) => {
                tokens.id_token = grant.id_token.clone();
                tokens.refresh_token = grant.refresh_token;
                tokens.expires_at = Utc::now() + token_lifetime(&grant.expires_in);
                Ok(grant.id_token)
            }
            // Signed out while the refresh was in flight.
            None => Err(AppError::Unauthenticated),
        }
    }

    fn store(&self, grant: TokenGrant) -> AuthUser {
        let tokens = SessionTokens::from_grant(grant, Utc::now());
        let user = tokens.user.clone();
        *self.state.lock().unwrap() = Some(tokens);
        user
    }
}

impl AuthSession for FirebaseSession {
    fn current_user_id(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.user.uid.clone())
    }

    async fn bearer_token(&self) -> Result<String, AppError> {
        self.id_token().await
    }
}
