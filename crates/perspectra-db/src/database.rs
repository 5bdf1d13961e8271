//! PostgreSQL connection and schema bootstrap.

use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::Result;
use crate::schema;

/// Shared database handle.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
}

/// Row counts per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DbStats {
    pub users: i64,
    pub profiles: i64,
    pub problems: i64,
    pub reviews: i64,
    pub concepts: i64,
    pub concept_edges: i64,
}

impl Database {
    pub async fn connect(url: &str, max_connections: u32, min_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create all tables and indexes that do not exist yet.
    pub async fn initialize(&self) -> Result<()> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::debug!(statements = schema::STATEMENTS.len(), "schema initialised");
        Ok(())
    }

    pub async fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            users: self.count(schema::TABLE_USERS).await?,
            profiles: self.count(schema::TABLE_PROFILES).await?,
            problems: self.count(schema::TABLE_PROBLEMS).await?,
            reviews: self.count(schema::TABLE_REVIEWS).await?,
            concepts: self.count(schema::TABLE_CONCEPTS).await?,
            concept_edges: self.count(schema::TABLE_CONCEPT_EDGES).await?,
        })
    }

    async fn count(&self, table: &str) -> Result<i64> {
        // Table names come from the schema constants, never from input.
        let n: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
