//! Single-shot question answering pipeline.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use rag_core::{Generator, RagError, Result, Retriever, SearchHit, SourceFields};

use crate::context::{assemble_context, truncate_words};
use crate::prompt::PromptTemplate;

/// Retrieved material and the system prompt built from it.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedPrompt {
    /// Rendered system prompt.
    pub prompt: String,

    /// Context block substituted into the prompt.
    pub context: String,

    /// Hits the context was assembled from, in ranking order.
    pub hits: Vec<SearchHit>,
}

/// Result of answering one question.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub question: String,

    /// Generated text, trimmed.
    pub answer: String,

    pub context: String,

    /// Hits used as grounding, in ranking order.
    pub hits: Vec<SearchHit>,

    /// End-to-end latency in milliseconds.
    pub latency_ms: u64,
}

/// Retrieve → assemble → prompt → generate.
pub struct RagPipeline<R, G> {
    retriever: Arc<R>,
    generator: Arc<G>,
    fields: SourceFields,
    template: PromptTemplate,
    max_context_words: Option<usize>,
}

impl<R, G> RagPipeline<R, G>
where
    R: Retriever,
    G: Generator,
{
    /// Create a new pipeline.
    pub fn new(
        retriever: Arc<R>,
        generator: Arc<G>,
        fields: SourceFields,
        template: PromptTemplate,
    ) -> Self {
        Self {
            retriever,
            generator,
            fields,
            template,
            max_context_words: None,
        }
    }

    /// Cut the context block to `max_words` words before rendering.
    pub fn with_max_context_words(mut self, max_words: Option<usize>) -> Self {
        self.max_context_words = max_words;
        self
    }

    /// Retrieve passages for `question` and render the system prompt.
    pub async fn build_prompt(&self, question: &str) -> Result<PreparedPrompt> {
        check_question(question)?;

        let hits = self.retriever.retrieve(question).await?;
        debug!(
            "Retrieved {} hits from {}",
            hits.len(),
            self.retriever.index()
        );

        let mut context = assemble_context(&hits, &self.fields)?;
        if let Some(max_words) = self.max_context_words {
            context = truncate_words(&context, max_words);
        }

        debug!("Context block: {} chars", context.len());

        Ok(PreparedPrompt {
            prompt: self.template.render(&context),
            context,
            hits,
        })
    }

    /// Answer `question` grounded on retrieved passages.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let start = Instant::now();

        info!("Answering: {:?}", question);

        let prepared = self.build_prompt(question).await?;
        let raw = self
            .generator
            .generate(&prepared.prompt, question)
            .await?;

        let latency_ms = start.elapsed().as_millis() as u64;

        info!(
            "Answered with {} in {}ms using {} hits",
            self.generator.model(),
            latency_ms,
            prepared.hits.len()
        );

        Ok(Answer {
            question: question.to_string(),
            answer: raw.trim().to_string(),
            context: prepared.context,
            hits: prepared.hits,
            latency_ms,
        })
    }
}

/// Reject blank questions. The question itself is passed on untouched.
pub fn check_question(question: &str) -> Result<()> {
    if question.trim().is_empty() {
        return Err(RagError::invalid_argument("question is empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns canned hits and records the questions it saw.
    struct FakeRetriever {
        hits: Vec<SearchHit>,
        seen: Mutex<Vec<String>>,
    }

    impl FakeRetriever {
        fn new(hits: Vec<SearchHit>) -> Self {
            Self {
                hits,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Retriever for FakeRetriever {
        async fn retrieve(&self, question: &str) -> Result<Vec<SearchHit>> {
            self.seen.lock().unwrap().push(question.to_string());
            Ok(self.hits.clone())
        }

        fn index(&self) -> &str {
            "search-elastic-labs"
        }
    }

    /// Echoes the prompt it received so tests can inspect it.
    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        async fn generate(&self, system_prompt: &str, question: &str) -> Result<String> {
            Ok(format!("  {}|{}\n", question, system_prompt))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(&self, _: &str, _: &str) -> Result<String> {
            Err(RagError::completion("boom"))
        }

        fn model(&self) -> &str {
            "fail"
        }
    }

    fn hits() -> Vec<SearchHit> {
        vec![
            serde_json::from_value(json!({
                "_index": "search-elastic-labs",
                "_id": "1",
                "inner_hits": {"search-elastic-labs.semantic_body": {"hits": {"hits": [
                    {"_source": {"text": "chunk one"}},
                    {"_source": {"text": "chunk two"}}
                ]}}}
            }))
            .unwrap(),
            serde_json::from_value(json!({
                "_index": "search-elastic-labs",
                "_id": "2",
                "_source": {"semantic_body": "whole body"}
            }))
            .unwrap(),
        ]
    }

    fn fields() -> SourceFields {
        SourceFields::new().with("search-elastic-labs", &["semantic_body"])
    }

    #[tokio::test]
    async fn test_ask_end_to_end() {
        let retriever = Arc::new(FakeRetriever::new(hits()));
        let pipeline = RagPipeline::new(
            retriever.clone(),
            Arc::new(EchoGenerator),
            fields(),
            PromptTemplate::new("CTX[{context}]"),
        );

        let answer = pipeline.ask("What is ESQL?").await.unwrap();

        assert_eq!(answer.question, "What is ESQL?");
        assert_eq!(answer.context, "chunk one\n --- \nchunk twowhole body\n");
        assert_eq!(
            answer.answer,
            "What is ESQL?|CTX[chunk one\n --- \nchunk twowhole body\n]"
        );
        let ids: Vec<_> = answer.hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(*retriever.seen.lock().unwrap(), vec!["What is ESQL?"]);
    }

    #[tokio::test]
    async fn test_question_passed_through_unchanged() {
        let retriever = Arc::new(FakeRetriever::new(hits()));
        let pipeline = RagPipeline::new(
            retriever.clone(),
            Arc::new(EchoGenerator),
            fields(),
            PromptTemplate::new("{context}"),
        );

        let answer = pipeline.ask("  Comment sécuriser ?\n").await.unwrap();

        assert_eq!(answer.question, "  Comment sécuriser ?\n");
        assert!(answer.answer.starts_with("Comment sécuriser ?\n|"));
        assert_eq!(
            *retriever.seen.lock().unwrap(),
            vec!["  Comment sécuriser ?\n"]
        );
    }

    #[tokio::test]
    async fn test_build_prompt_truncates_context() {
        let pipeline = RagPipeline::new(
            Arc::new(FakeRetriever::new(hits())),
            Arc::new(EchoGenerator),
            fields(),
            PromptTemplate::new("{context}"),
        )
        .with_max_context_words(Some(3));

        let prepared = pipeline.build_prompt("q").await.unwrap();
        assert_eq!(prepared.context, "chunk one ---");
        assert_eq!(prepared.prompt, "chunk one ---");
        assert_eq!(prepared.hits.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_question_skips_retrieval() {
        let retriever = Arc::new(FakeRetriever::new(hits()));
        let pipeline = RagPipeline::new(
            retriever.clone(),
            Arc::new(EchoGenerator),
            fields(),
            PromptTemplate::default(),
        );

        let err = pipeline.ask("   ").await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
        assert!(retriever.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_hits_still_generates() {
        let pipeline = RagPipeline::new(
            Arc::new(FakeRetriever::new(Vec::new())),
            Arc::new(EchoGenerator),
            fields(),
            PromptTemplate::new("[{context}]"),
        );
        let answer = pipeline.ask("anything").await.unwrap();
        assert_eq!(answer.context, "");
        assert_eq!(answer.answer, "anything|[]");
    }

    #[tokio::test]
    async fn test_generator_error_propagates() {
        let pipeline = RagPipeline::new(
            Arc::new(FakeRetriever::new(hits())),
            Arc::new(FailingGenerator),
            fields(),
            PromptTemplate::default(),
        );
        let err = pipeline.ask("q").await.unwrap_err();
        assert_eq!(err.error_code(), "COMPLETION_ERROR");
    }

    #[tokio::test]
    async fn test_unmapped_hit_index_fails() {
        let pipeline = RagPipeline::new(
            Arc::new(FakeRetriever::new(hits())),
            Arc::new(EchoGenerator),
            SourceFields::new(),
            PromptTemplate::default(),
        );
        let err = pipeline.build_prompt("q").await.unwrap_err();
        assert_eq!(err.error_code(), "UNMAPPED_INDEX");
    }
}
