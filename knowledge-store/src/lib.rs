//! Qdrant-backed knowledge collection: bootstrap + similarity search.
//!
//! This crate provides a minimal API to:
//! - Ensure the knowledge collection exists at startup
//! - Retrieve the top-K documents for a precomputed query vector
//!
//! Document ingestion happens out-of-band; the server only searches. The
//! design is flat and splits responsibilities into focused modules.

mod config;
mod errors;
mod qdrant_facade;
mod retrieve;

pub use config::StoreConfig;
pub use errors::StoreError;
pub use qdrant_facade::QdrantFacade;
pub use retrieve::{DocumentHit, top_documents};
