pub mod application;
pub mod domain;
pub mod infrastructure;

mod app_context;

pub use app_context::{AppContext, AppVoteReconciler};

/// Install the default `tracing` subscriber. Call once from the hosting
/// shell before constructing an [`AppContext`].
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}
