//! rag-core - Core types and traits for the RAG pipeline
//!
//! This crate provides the configuration, search-hit types, stage traits
//! and error handling shared by the retriever, the completion client and
//! the pipeline.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::{RagError, Result};
pub use traits::*;
pub use types::*;
