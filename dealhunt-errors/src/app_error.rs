use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Sign-in failed: {0}")]
    AuthFailed(String),

    #[error("Vote failed: {0}")]
    VoteFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Request failed: {0}")]
    ApiError(String),

    #[error("Unexpected response from server: {0}")]
    MalformedResponse(String),

    #[error("Deal not found")]
    DealNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::Unauthenticated => "Please log in to continue.",
            Self::AuthFailed(_) => "Incorrect email or password.",
            Self::VoteFailed(_) => "Voting failed. Please try again.",
            Self::InvalidInput(_) => "Please check your input and try again.",
            Self::ApiError(_) => "Something went wrong. Please try again.",
            Self::MalformedResponse(_) => "Something went wrong. Please try again.",
            Self::DealNotFound => "This deal is no longer available.",
            Self::Internal(_) => "Something went wrong on our side. Please try again later.",
        }
    }

    /// Failures the view may recover from by prompting a sign-in.
    pub fn needs_sign_in(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}
