mod client;
mod types;

pub use client::DealsApiClient;
pub use types::{ImageUpload, NewUserRequest};
