//! Grant collection stored as JSONB documents.

use std::sync::Arc;

use async_trait::async_trait;
use grantstore::config::GRANTS_COLLECTION;
use grantstore::{
    GrantCollection, GrantDocument, GrantFilter, GrantStoreResult, ReplaceOptions,
    ReplaceOutcome, TokenStoreConfig,
};
use sqlx_core::query::query;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::sql::{WhereClause, bind_query, bind_scalar};
use crate::{PgStoreError, StorageResult, create_pool};

/// Statements creating the grants table and its lookup indexes.
const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS tokens (
        id UUID PRIMARY KEY,
        resource JSONB NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS tokens_key_idx ON tokens ((resource->>'Key'))",
    "CREATE INDEX IF NOT EXISTS tokens_subject_idx ON tokens ((resource->>'SubjectId'), (resource->>'ClientId'))",
];

// =============================================================================
// Grant Collection
// =============================================================================

/// PostgreSQL-backed [`GrantCollection`].
///
/// Owns an `Arc<PgPool>`, so it can be cloned and shared with other
/// components using the same database.
#[derive(Debug, Clone)]
pub struct PgGrantCollection {
    pool: Arc<PgPool>,
}

impl PgGrantCollection {
    /// Create a collection over an existing connection pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Validates the config and connects to the configured database.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid config, or a storage error
    /// if the pool cannot be created.
    pub async fn connect(config: &TokenStoreConfig) -> GrantStoreResult<Self> {
        config.validate()?;
        info!("Setting up PostgreSQL persisted grant collection");
        let pool = create_pool(config).await?;
        Ok(Self::new(Arc::new(pool)))
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the grants table and indexes if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails.
    pub async fn ensure_schema(&self) -> GrantStoreResult<()> {
        for statement in SCHEMA {
            query(statement)
                .execute(self.pool.as_ref())
                .await
                .map_err(PgStoreError::from)?;
        }
        info!(table = GRANTS_COLLECTION, "Grant collection schema ready");
        Ok(())
    }

    async fn find_documents(&self, filter: &GrantFilter) -> StorageResult<Vec<GrantDocument>> {
        let clause = WhereClause::render(filter, 1);
        let sql = format!("SELECT resource FROM {GRANTS_COLLECTION} WHERE {}", clause.sql);

        let rows: Vec<serde_json::Value> = bind_scalar(query_scalar(&sql), &clause.binds)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter()
            .map(|resource| serde_json::from_value(resource).map_err(PgStoreError::from))
            .collect()
    }

    async fn replace_document(
        &self,
        filter: &GrantFilter,
        document: &GrantDocument,
        options: ReplaceOptions,
    ) -> StorageResult<ReplaceOutcome> {
        let resource = serde_json::to_value(document)?;
        let clause = WhereClause::render(filter, 1);
        let select_sql = format!(
            "SELECT id FROM {GRANTS_COLLECTION} WHERE {} LIMIT 1 FOR UPDATE",
            clause.sql
        );

        let update_sql = format!("UPDATE {GRANTS_COLLECTION} SET resource = $1 WHERE id = $2");
        let insert_sql = format!("INSERT INTO {GRANTS_COLLECTION} (id, resource) VALUES ($1, $2)");

        let mut tx = self.pool.begin().await?;

        let matched: Option<Uuid> = bind_scalar(query_scalar(&select_sql), &clause.binds)
            .fetch_optional(&mut *tx)
            .await?;

        let outcome = match matched {
            Some(id) if id != document.id => {
                return Err(PgStoreError::conflict(format!(
                    "replacement would change immutable _id {id} to {}",
                    document.id
                )));
            }
            Some(id) => {
                query(&update_sql)
                    .bind(&resource)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                ReplaceOutcome::replaced()
            }
            None if options.upsert => {
                query(&insert_sql)
                    .bind(document.id)
                    .bind(&resource)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        if let sqlx_core::Error::Database(ref db_err) = e
                            && db_err.is_unique_violation()
                        {
                            return PgStoreError::conflict(format!(
                                "document with _id {} already exists",
                                document.id
                            ));
                        }
                        PgStoreError::from(e)
                    })?;
                ReplaceOutcome::upserted(document.id)
            }
            None => ReplaceOutcome::unmatched(),
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn delete_documents(&self, filter: &GrantFilter) -> StorageResult<u64> {
        let clause = WhereClause::render(filter, 1);
        let sql = format!("DELETE FROM {GRANTS_COLLECTION} WHERE {}", clause.sql);

        let result = bind_query(query(&sql), &clause.binds)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl GrantCollection for PgGrantCollection {
    async fn find(&self, filter: &GrantFilter) -> GrantStoreResult<Vec<GrantDocument>> {
        Ok(self.find_documents(filter).await?)
    }

    async fn replace_one(
        &self,
        filter: &GrantFilter,
        document: &GrantDocument,
        options: ReplaceOptions,
    ) -> GrantStoreResult<ReplaceOutcome> {
        Ok(self.replace_document(filter, document, options).await?)
    }

    async fn delete_many(&self, filter: &GrantFilter) -> GrantStoreResult<u64> {
        Ok(self.delete_documents(filter).await?)
    }
}
