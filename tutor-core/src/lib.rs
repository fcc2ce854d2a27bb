//! Prompt assembly and failure-absorbing context retrieval for the tutor.
//!
//! Public API: [`build_prompt`] plus [`ContextRetriever`], which wraps an
//! optional [`ContextSource`] and turns every retrieval failure into
//! "no context" so the chat flow can keep answering.

mod error;
mod prompt;
mod retrieve;
mod source;

pub use error::RetrieveError;
pub use prompt::{SYSTEM_INSTRUCTION, build_prompt};
pub use retrieve::{ContextRetriever, ContextSource};
pub use source::VectorContextSource;
