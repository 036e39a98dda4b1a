//! # NEARFS Pipeline
//! This crate contains the ingestion pipeline of the loader.
//! Blocks are consumed in height order from a [`consumer::BlockSource`],
//! payloads are pulled out of `fs_store` calls by the
//! [`processor::PayloadExtractor`], written once per distinct content by the
//! [`loader::ContentWriter`], and the [`orchestrator::Orchestrator`] commits a
//! checkpoint after every fully written block.
pub mod consumer;
pub mod loader;
pub mod orchestrator;
pub mod processor;

pub mod errors;
