//! rag-search - Elasticsearch semantic retrieval
//!
//! Issues a nested kNN query over the chunks of a `semantic_text` field,
//! letting the cluster embed the question with a deployed model, and
//! returns parent hits with their best-matching chunks as inner hits.
//!
//! # Example
//!
//! ```rust,ignore
//! use rag_search::ElasticsearchRetriever;
//! use rag_core::{RagConfig, Retriever};
//!
//! let retriever = ElasticsearchRetriever::new(&RagConfig::default().elasticsearch)?;
//! let hits = retriever.retrieve("How do I configure ILM?").await?;
//! ```

mod elasticsearch;
mod query;

pub use elasticsearch::{parse_response, ElasticsearchRetriever};
pub use query::SemanticQuery;

// Re-export the Retriever trait for convenience
pub use rag_core::Retriever;
