//! # NEARFS Indexer
//!
//! Loads content stored with `fs_store` calls on NEAR into a
//! content-addressed store, reading blocks straight from NEAR Lake.
//!
//! ## Architecture
//!
//! The loader follows the Consumer-Processor-Loader pattern of
//! [`nearfs_pipeline`]:
//!
//! 1. **Consumer**: Reads blocks from the NEAR Lake bucket in height order
//! 2. **Processor**: Extracts `fs_store` payloads from action receipts
//! 3. **Loader**: Stores each distinct payload once under its content key
//! 4. **Orchestrator**: Commits a checkpoint after every block
//!
//! ## Modules
//!
//! - [`config`]: Command line and dependency initialization
//! - [`errors`]: Error types for the indexer

pub mod config;
pub mod errors;

pub use config::{Cli, Dependencies};
pub use errors::IndexingError;
