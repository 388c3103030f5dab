//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::shop::ShopService;
use crate::storage::{LocalStore, StorageError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// shop service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    shop: ShopService,
}

impl AppState {
    /// Create a new application state, opening the local store under the
    /// configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self, StorageError> {
        let store = LocalStore::open(&config.data_dir)?;
        let shop = ShopService::new(store);

        Ok(Self {
            inner: Arc::new(AppStateInner { config, shop }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shop service.
    #[must_use]
    pub fn shop(&self) -> &ShopService {
        &self.inner.shop
    }
}
