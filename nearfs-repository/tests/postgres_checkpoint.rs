//! Integration tests for the PostgreSQL checkpoint repository.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test --test postgres_checkpoint -- --ignored`

use nearfs_repository::{CheckpointRepository, PostgresCheckpointRepository};

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_read_without_checkpoint(pool: sqlx::PgPool) {
    let repository = PostgresCheckpointRepository::new(pool, "test_loader");
    assert_eq!(repository.read().await.unwrap(), None);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_write_and_update_checkpoint(pool: sqlx::PgPool) {
    let repository = PostgresCheckpointRepository::new(pool.clone(), "test_loader");

    repository.write(1000).await.unwrap();
    assert_eq!(repository.read().await.unwrap(), Some(1000));

    repository.write(2000).await.unwrap();
    assert_eq!(repository.read().await.unwrap(), Some(2000));

    // Verify only one record exists
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM checkpoints WHERE id = $1")
        .bind("test_loader")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_checkpoints_are_isolated_by_id(pool: sqlx::PgPool) {
    let first = PostgresCheckpointRepository::new(pool.clone(), "loader_a");
    let second = PostgresCheckpointRepository::new(pool, "loader_b");

    first.write(10).await.unwrap();
    second.write(20).await.unwrap();

    assert_eq!(first.read().await.unwrap(), Some(10));
    assert_eq!(second.read().await.unwrap(), Some(20));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_height_out_of_range(pool: sqlx::PgPool) {
    let repository = PostgresCheckpointRepository::new(pool, "test_loader");
    assert!(repository.write(u64::MAX).await.is_err());
    assert_eq!(repository.read().await.unwrap(), None);
}
