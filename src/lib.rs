use std::path::Path;

use crate::error::AppResult;
use crate::model::{DbConnection, ModelManager};
use sqlx::migrate::Migrator;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod error;
pub mod mail;
pub mod model;
pub mod utils;

static APPLICATION_NAME: &str = "aula";

/// Read the configuration, connect to the database, apply pending migrations
/// and hand back the model manager the application layer works through.
#[tracing::instrument]
pub async fn build_model_manager() -> AppResult<ModelManager> {
    let use_local = cfg!(debug_assertions);
    let config = config::Config::get_or_init(use_local).await;
    let db = DbConnection::connect(config.app().database_uri())?;

    let migrator = Migrator::new(Path::new("./migrations"))
        .await
        .map_err(crate::model::DatabaseError::from)?;
    tracing::debug!("applying migrations...");
    migrator
        .run(db.pool())
        .await
        .map_err(crate::model::DatabaseError::from)?;

    Ok(ModelManager::new(db))
}

/// Build a model manager on top of an already connected pool. Used by the
/// integration tests, which manage their own throwaway databases.
pub fn build_model_manager_with_pool(db: DbConnection) -> ModelManager {
    ModelManager::new(db)
}

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}
