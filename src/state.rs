use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, ProductService, SeaOrmAuthService, SeaOrmProductService};

/// Application context built once at startup and shared by every request.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub product_service: Arc<dyn ProductService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let product_service =
            Arc::new(SeaOrmProductService::new(store.clone())) as Arc<dyn ProductService>;

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            product_service,
        }
    }
}
