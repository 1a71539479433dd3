//! Core traits defining the interfaces between pipeline stages.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::SearchHit;

/// Semantic search backend.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return hits for `question` in ranking order.
    async fn retrieve(&self, question: &str) -> Result<Vec<SearchHit>>;

    /// Index this retriever searches.
    fn index(&self) -> &str;
}

/// Language-model completion backend.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer to `question` grounded by `system_prompt`.
    async fn generate(&self, system_prompt: &str, question: &str) -> Result<String>;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;
}
