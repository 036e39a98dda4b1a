//! Error types for the orchestrator module of the NEARFS pipeline.
use thiserror::Error;

use crate::errors::{ConsumerError, LoaderError, ProcessorError};

/// Represents the fatal errors that abort a run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Consumer error: {0}")]
    Consumer(#[from] ConsumerError),
    #[error("Processor error: {0}")]
    Processor(#[from] ProcessorError),
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),
}
