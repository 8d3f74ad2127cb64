//! Connection pool management for the grant collection.

use std::str::FromStr;
use std::time::Duration;

use grantstore::TokenStoreConfig;
use sqlx_core::pool::PoolOptions;
use sqlx_postgres::{PgConnectOptions, PgPool, Postgres};
use tracing::{debug, info, instrument};

use crate::{PgStoreError, StorageResult};

/// Type alias for PostgreSQL pool options.
pub type PgPoolOptions = PoolOptions<Postgres>;

/// Creates a connection pool for the configured server and database.
///
/// The database name from the config overrides any database in the
/// connection string.
#[instrument(skip(config), fields(url = %mask_password(&config.connection_string)))]
pub async fn create_pool(config: &TokenStoreConfig) -> StorageResult<PgPool> {
    info!(
        database = %config.database,
        pool_size = config.pool_size,
        connect_timeout_ms = config.connect_timeout_ms,
        "Creating grant store connection pool"
    );

    let connect_options = PgConnectOptions::from_str(&config.connection_string)
        .map_err(|e| PgStoreError::InvalidConfig(format!("invalid connection string: {e}")))?
        .database(&config.database);

    let pool = PgPoolOptions::new()
        .max_connections(config.pool_size)
        .acquire_timeout(Duration::from_millis(config.connect_timeout_ms))
        .connect_with(connect_options)
        .await?;

    debug!("Grant store connection pool created successfully");

    Ok(pool)
}

/// Masks the password in a database URL for logging.
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@')
        && let Some(colon_pos) = url[..at_pos].rfind(':')
    {
        let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
        if colon_pos > scheme_end {
            return format!("{}:****{}", &url[..colon_pos], &url[at_pos..]);
        }
    }
    url.to_string()
}
