//! PostgreSQL checkpoint storage.
mod checkpoint_repository;

pub use checkpoint_repository::{PostgresCheckpointRepository, DEFAULT_CHECKPOINT_ID};
