//! rag-query - Context assembly and the question answering pipeline
//!
//! This crate turns search hits into a grounding context block, wraps it
//! in a system prompt and hands it, together with the user's question,
//! to a completion backend.
//!
//! # Features
//!
//! - Flattening of direct field hits and nested chunk inner hits
//! - Fixed instructional prompt with a `{context}` slot
//! - Optional word-count cap on the context block
//!
//! # Example
//!
//! ```rust,ignore
//! use rag_query::{PromptTemplate, RagPipeline};
//! use std::sync::Arc;
//!
//! let pipeline = RagPipeline::new(Arc::new(retriever), Arc::new(llm), fields, PromptTemplate::default());
//! let answer = pipeline.ask("Comment sécuriser mon cluster ?").await?;
//! ```

mod context;
mod engine;
mod prompt;

pub use context::{assemble_context, truncate_words, CHUNK_SEPARATOR};
pub use engine::{check_question, Answer, PreparedPrompt, RagPipeline};
pub use prompt::{PromptTemplate, DEFAULT_TEMPLATE};
