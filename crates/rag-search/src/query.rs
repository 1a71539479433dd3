//! Request body construction for nested semantic search.

use serde_json::{json, Value};

/// Suffix of the nested chunk objects under a `semantic_text` field.
const CHUNKS_SUFFIX: &str = "inference.chunks";

/// Parameters for a nested kNN query against one semantic field.
#[derive(Debug, Clone)]
pub struct SemanticQuery<'a> {
    /// Index being searched.
    pub index: &'a str,

    /// `semantic_text` field holding the chunked passages.
    pub field: &'a str,

    /// Embedding model deployed in the cluster.
    pub model_id: &'a str,

    /// Number of parent documents.
    pub size: u32,

    /// Number of chunks per parent document.
    pub inner_hits_size: u32,
}

impl SemanticQuery<'_> {
    /// Path of the nested chunk objects.
    pub fn chunks_path(&self) -> String {
        format!("{}.{}", self.field, CHUNKS_SUFFIX)
    }

    /// Name the inner hits are reported under.
    pub fn inner_hits_name(&self) -> String {
        format!("{}.{}", self.index, self.field)
    }

    /// Build the `_search` request body for `question`.
    pub fn to_body(&self, question: &str) -> Value {
        let path = self.chunks_path();

        json!({
            "retriever": {
                "standard": {
                    "query": {
                        "nested": {
                            "path": path,
                            "query": {
                                "knn": {
                                    "field": format!("{}.embeddings", path),
                                    "query_vector_builder": {
                                        "text_embedding": {
                                            "model_id": self.model_id,
                                            "model_text": question
                                        }
                                    }
                                }
                            },
                            "inner_hits": {
                                "size": self.inner_hits_size,
                                "name": self.inner_hits_name(),
                                "_source": [format!("{}.text", path)]
                            }
                        }
                    }
                }
            },
            "size": self.size
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> SemanticQuery<'static> {
        SemanticQuery {
            index: "search-elastic-labs",
            field: "semantic_body",
            model_id: "my-e5-model",
            size: 5,
            inner_hits_size: 2,
        }
    }

    #[test]
    fn test_body_shape() {
        let body = query().to_body("How do I set up RAG?");
        let nested = &body["retriever"]["standard"]["query"]["nested"];

        assert_eq!(nested["path"], "semantic_body.inference.chunks");
        assert_eq!(
            nested["query"]["knn"]["field"],
            "semantic_body.inference.chunks.embeddings"
        );

        let builder = &nested["query"]["knn"]["query_vector_builder"]["text_embedding"];
        assert_eq!(builder["model_id"], "my-e5-model");
        assert_eq!(builder["model_text"], "How do I set up RAG?");

        assert_eq!(nested["inner_hits"]["size"], 2);
        assert_eq!(nested["inner_hits"]["name"], "search-elastic-labs.semantic_body");
        assert_eq!(
            nested["inner_hits"]["_source"][0],
            "semantic_body.inference.chunks.text"
        );
        assert_eq!(body["size"], 5);
    }

    #[test]
    fn test_question_is_not_interpolated() {
        let body = query().to_body(r#"quote " and brace }"#);
        let text = &body["retriever"]["standard"]["query"]["nested"]["query"]["knn"]
            ["query_vector_builder"]["text_embedding"]["model_text"];
        assert_eq!(text, r#"quote " and brace }"#);
    }
}
