use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rest;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{AppError, AppResult};

use auth::TokenManager;
use metrics::Metrics;
use service::{AuthService, WishListService};
use store::{CredentialStore, MeteredStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub auth: AuthService,
    pub wishlists: WishListService,
    pub metrics: Metrics,
}

impl AppState {
    /// Every store call made through the returned state is timed.
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenManager) -> AppResult<Self> {
        let metrics = Metrics::new()?;
        let store: Arc<dyn CredentialStore> = Arc::new(MeteredStore::new(store, metrics.clone()));
        Ok(Self {
            auth: AuthService::new(store.clone(), tokens, metrics.clone()),
            wishlists: WishListService::new(store.clone(), metrics.clone()),
            store,
            metrics,
        })
    }
}
