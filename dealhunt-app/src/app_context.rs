use crate::application::{Accounts, DealFeed, SubmitDeal, VoteReconciler};
use crate::infrastructure::api::DealsApiClient;
use crate::infrastructure::auth::{FirebaseAuthClient, FirebaseSession, GoogleOAuth};
use std::sync::Arc;

/// The reconciler as wired in production: the live session and the REST
/// client behind shared handles.
pub type AppVoteReconciler = VoteReconciler<Arc<FirebaseSession>, Arc<DealsApiClient>>;

#[derive(Clone)]
pub struct AppContext {
    pub session: Arc<FirebaseSession>,
    pub api: Arc<DealsApiClient>,
    pub votes: Arc<AppVoteReconciler>,
    pub feed: Arc<DealFeed>,
    pub deals: Arc<SubmitDeal>,
    pub accounts: Arc<Accounts>,
}

impl AppContext {
    pub fn new(
        api_base_url: &str,
        firebase_api_key: String,
        google: Option<GoogleOAuth>,
    ) -> Self {
        let api = Arc::new(DealsApiClient::new(api_base_url));
        let session = Arc::new(FirebaseSession::new(FirebaseAuthClient::new(
            firebase_api_key,
        )));
        Self {
            votes: Arc::new(VoteReconciler::new(session.clone(), api.clone())),
            feed: Arc::new(DealFeed::new(api.clone())),
            deals: Arc::new(SubmitDeal::new(session.clone(), api.clone())),
            accounts: Arc::new(Accounts::new(session.clone(), api.clone(), google)),
            session,
            api,
        }
    }

    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_base_url = std::env::var("DEALS_API_URL").expect("DEALS_API_URL must be set");
        let firebase_api_key =
            std::env::var("FIREBASE_API_KEY").expect("FIREBASE_API_KEY must be set");

        let google = match (
            std::env::var("GOOGLE_CLIENT_ID"),
            std::env::var("GOOGLE_CLIENT_SECRET"),
            std::env::var("GOOGLE_REDIRECT_URL"),
        ) {
            (Ok(id), Ok(secret), Ok(redirect)) => {
                match GoogleOAuth::new(&id, &secret, &redirect) {
                    Ok(google) => Some(google),
                    Err(e) => {
                        tracing::warn!("Google sign-in disabled: {}", e);
                        None
                    }
                }
            }
            _ => {
                tracing::info!("Google sign-in not configured");
                None
            }
        };

        Self::new(&api_base_url, firebase_api_key, google)
    }
}
