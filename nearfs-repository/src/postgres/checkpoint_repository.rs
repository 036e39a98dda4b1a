//! PostgreSQL implementation of the checkpoint repository.
//!
//! Stores the checkpoint in a `checkpoints` table to enable loader resumption
//! after restarts.

use async_trait::async_trait;
use nearfs_shared::types::BlockHeight;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::errors::CheckpointRepositoryError;
use crate::interfaces::CheckpointRepository;

/// Checkpoint id used by the lake loader.
pub const DEFAULT_CHECKPOINT_ID: &str = "nearfs_lake_loader";

/// PostgreSQL-backed checkpoint repository.
///
/// Persists one row per checkpoint id with upsert operations for atomic updates.
pub struct PostgresCheckpointRepository {
    /// PostgreSQL connection pool
    pool: sqlx::PgPool,
    id: String,
}

impl PostgresCheckpointRepository {
    /// Creates a new repository on an existing pool.
    ///
    /// # Arguments
    ///
    /// * `pool` - PostgreSQL connection pool with the `checkpoints` table in place
    /// * `id` - Name of the checkpoint record this repository reads and writes
    pub fn new(pool: sqlx::PgPool, id: impl Into<String>) -> Self {
        Self {
            pool,
            id: id.into(),
        }
    }

    /// Connects to `database_url`, applies the embedded migrations and returns
    /// a repository for the default checkpoint id.
    pub async fn connect(database_url: &str) -> Result<Self, CheckpointRepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url)
            .await?;

        sqlx::migrate!("src/postgres/migrations").run(&pool).await?;
        info!(id = DEFAULT_CHECKPOINT_ID, "Checkpoint table ready");

        Ok(Self::new(pool, DEFAULT_CHECKPOINT_ID))
    }
}

#[async_trait]
impl CheckpointRepository for PostgresCheckpointRepository {
    async fn read(&self) -> Result<Option<BlockHeight>, CheckpointRepositoryError> {
        let result =
            sqlx::query_scalar::<_, i64>("SELECT block_height FROM checkpoints WHERE id = $1")
                .bind(&self.id)
                .fetch_optional(&self.pool)
                .await?;

        result
            .map(|height| {
                BlockHeight::try_from(height)
                    .map_err(|_| CheckpointRepositoryError::Corrupt(height.to_string()))
            })
            .transpose()
    }

    async fn write(&self, height: BlockHeight) -> Result<(), CheckpointRepositoryError> {
        let block_height =
            i64::try_from(height).map_err(|_| CheckpointRepositoryError::HeightOutOfRange(height))?;

        sqlx::query(
            "INSERT INTO checkpoints (id, block_height, updated_at) VALUES ($1, $2, now()) \
             ON CONFLICT (id) DO UPDATE SET block_height = $2, updated_at = now()",
        )
        .bind(&self.id)
        .bind(block_height)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
