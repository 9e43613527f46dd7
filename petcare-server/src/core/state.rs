//! Application state assembly
//!
//! Everything the service needs is constructed here and passed down by
//! value; nothing in the crate reaches for process-wide state.

use std::sync::Arc;

use crate::core::Config;
use crate::db::DbService;
use crate::orders::store::SurrealOrderStore;
use crate::orders::OrderService;

/// Application state: configuration, database handle, and the order
/// service wired to the SurrealDB-backed store.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbService,
    pub orders: OrderService,
}

impl AppState {
    /// Open the database under the configured working directory, run the
    /// schema bootstrap, and wire up the order service.
    pub async fn init(config: Config) -> anyhow::Result<Self> {
        let db = DbService::open(&config.work_dir, &config.db_namespace, &config.db_name).await?;
        let store = SurrealOrderStore::new(db.handle().clone());
        let orders = OrderService::new(Arc::new(store));
        tracing::info!(environment = %config.environment, "Application state initialized");
        Ok(Self { config, db, orders })
    }
}
