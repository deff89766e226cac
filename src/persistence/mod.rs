use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use db::{get_surreal_db, SurrealDbConfig};

pub mod db;
pub mod person;

/// Generic persistence result type
pub type Result<T> = std::result::Result<T, Error>;

/// Generic persistence error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("SurrealDB connection error {0}")]
    SurrealConnection(#[from] surrealdb::Error),

    #[error("Failed to insert {0}")]
    InsertFailed(String),

    #[error("no such {0} entity {1}")]
    NoSuchEntity(String, String),
}

pub use person::PersonStoreApi;

/// A container for all persistence related dependencies.
#[derive(Clone)]
pub struct DbContext {
    pub person_store: Arc<dyn PersonStoreApi>,
}

/// Creates a new db context, connecting to the configured SurrealDB
/// instance and setting up all stores.
pub async fn get_db_context(conf: &Config) -> Result<DbContext> {
    let surreal_db_config = SurrealDbConfig::new(&conf.surreal_db_connection);
    let db = get_surreal_db(&surreal_db_config).await?;
    let person_store = Arc::new(db::person::SurrealPersonStore::new(db));
    Ok(DbContext { person_store })
}
