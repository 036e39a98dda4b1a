mod consumer;
mod loader;
mod orchestrator;
mod processor;

pub use consumer::ConsumerError;
pub use loader::LoaderError;
pub use orchestrator::OrchestratorError;
pub use processor::{DecodeError, ProcessorError};
