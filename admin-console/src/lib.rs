pub mod auth;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod sync;
pub mod views;

use services::{ApiClient, ComposerRegistry};
use std::sync::Arc;

/// Shared application state: the backend client and the per-session composers.
#[derive(Clone)]
pub struct AppState {
    pub api_client: Arc<ApiClient>,
    pub composers: Arc<ComposerRegistry>,
    /// Sessions expire after this much inactivity. Composers follow them.
    pub session_inactivity: time::Duration,
}

impl AppState {
    pub fn new(api_client: Arc<ApiClient>, session_inactivity: time::Duration) -> Self {
        let composers = Arc::new(ComposerRegistry::new(
            api_client.clone(),
            session_inactivity.unsigned_abs(),
        ));
        Self {
            api_client,
            composers,
            session_inactivity,
        }
    }
}
