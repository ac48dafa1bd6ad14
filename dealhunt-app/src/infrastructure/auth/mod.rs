mod firebase;
mod google_oauth;

pub use firebase::{AuthUser, FirebaseAuthClient, FirebaseSession};
pub use google_oauth::GoogleOAuth;
