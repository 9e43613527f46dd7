//! Database Module
//!
//! Owns the embedded SurrealDB handle and the schema bootstrap.

pub mod models;
pub mod repository;

use std::path::Path;

use anyhow::Context;
use surrealdb::engine::local::{Db, RocksDb};
use surrealdb::Surreal;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    db: Surreal<Db>,
}

impl DbService {
    /// Open the RocksDB-backed database under `<work_dir>/data`, select the
    /// namespace/database, and run the schema bootstrap.
    pub async fn open(work_dir: &str, namespace: &str, database: &str) -> anyhow::Result<Self> {
        let path = Path::new(work_dir).join("data");
        let db = Surreal::new::<RocksDb>(path)
            .await
            .context("Failed to open database")?;
        db.use_ns(namespace)
            .use_db(database)
            .await
            .context("Failed to select namespace/database")?;
        Self::define_schema(&db).await?;
        tracing::info!(work_dir, "Database connection established (SurrealDB RocksDB)");
        Ok(Self { db })
    }

    /// Wrap an already-opened handle and run the schema bootstrap. Tests use
    /// this with the in-memory engine.
    pub async fn with_handle(db: Surreal<Db>) -> anyhow::Result<Self> {
        Self::define_schema(&db).await?;
        Ok(Self { db })
    }

    pub fn handle(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Idempotent schema bootstrap.
    ///
    /// The UNIQUE index on the order code column is what turns a code
    /// collision into a rejected transaction for the placement workflow.
    pub async fn define_schema(db: &Surreal<Db>) -> anyhow::Result<()> {
        db.query(
            "DEFINE TABLE IF NOT EXISTS item SCHEMALESS;
             DEFINE TABLE IF NOT EXISTS shop_order SCHEMALESS;
             DEFINE INDEX IF NOT EXISTS order_code_idx ON TABLE shop_order COLUMNS code UNIQUE;",
        )
        .await
        .context("Failed to run schema bootstrap")?
        .check()
        .context("Schema bootstrap rejected")?;
        tracing::debug!("Database schema ensured");
        Ok(())
    }
}
