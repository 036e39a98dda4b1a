//! # NEARFS Shared
//! This crate defines the data structures shared across the NEARFS loader:
//! the NEAR Lake block model consumed by the pipeline, extracted payloads and
//! the content keys they are stored under.
pub mod types;
