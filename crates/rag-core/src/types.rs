//! Core domain types for the RAG pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Top-level body of an Elasticsearch `_search` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Server-side latency in milliseconds.
    #[serde(default)]
    pub took: u64,

    /// Whether the search timed out on any shard.
    #[serde(default)]
    pub timed_out: bool,

    /// Ranked hits.
    pub hits: HitList<SearchHit>,
}

/// A ranked list of hits, as returned under every `hits` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitList<T> {
    /// Total matching documents, if tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalHits>,

    /// Highest score in the list.
    #[serde(default)]
    pub max_score: Option<f64>,

    /// Hits in ranking order.
    #[serde(default = "Vec::new")]
    pub hits: Vec<T>,
}

impl<T> Default for HitList<T> {
    fn default() -> Self {
        Self {
            total: None,
            max_score: None,
            hits: Vec::new(),
        }
    }
}

/// Total hit count; older clusters return a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Detailed { value: u64, relation: String },
}

impl TotalHits {
    /// The counted number of hits.
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(n) => *n,
            Self::Detailed { value, .. } => *value,
        }
    }
}

/// A top-level document hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Index the document lives in.
    #[serde(rename = "_index")]
    pub index: String,

    /// Document ID.
    #[serde(rename = "_id")]
    pub id: String,

    /// Relevance score (null when sorting by something else).
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    /// Source document (possibly filtered).
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,

    /// Nested sub-matches keyed by inner-hit name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inner_hits: BTreeMap<String, InnerHitGroup>,
}

impl SearchHit {
    /// Inner hits registered under `key`, if any.
    pub fn inner_hits_for(&self, key: &str) -> Option<&[InnerHit]> {
        self.inner_hits.get(key).map(|group| group.hits.hits.as_slice())
    }
}

/// A named group of inner hits attached to a parent hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InnerHitGroup {
    pub hits: HitList<InnerHit>,
}

/// A nested chunk matched inside a parent document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InnerHit {
    /// Position of the nested object inside its parent.
    #[serde(rename = "_nested", default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<NestedIdentity>,

    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    /// Source of the nested object (the chunk), e.g. `{"text": "..."}`.
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

impl InnerHit {
    /// The chunk text, when present as a string.
    pub fn text(&self) -> Option<&str> {
        self.source.get("text").and_then(Value::as_str)
    }
}

/// Identifies where a nested object sits inside its parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedIdentity {
    pub field: String,
    pub offset: u32,
}

/// Maps an index name to the source fields that carry its passage text.
///
/// Only the first field of each entry is read when assembling context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceFields(BTreeMap<String, Vec<String>>);

impl SourceFields {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, index: impl Into<String>, fields: &[&str]) -> Self {
        self.insert(index, fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Register the fields for an index, replacing any previous entry.
    pub fn insert(&mut self, index: impl Into<String>, fields: Vec<String>) {
        self.0.insert(index.into(), fields);
    }

    /// The field read for hits from `index`.
    pub fn primary_field(&self, index: &str) -> Option<&str> {
        self.0
            .get(index)
            .and_then(|fields| fields.first())
            .map(String::as_str)
    }

    /// Key under which chunk matches for `index` are reported: `"{index}.{field}"`.
    pub fn inner_hit_key(&self, index: &str) -> Option<String> {
        self.primary_field(index)
            .map(|field| format!("{}.{}", index, field))
    }

    pub fn contains(&self, index: &str) -> bool {
        self.primary_field(index).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "took": 12,
        "timed_out": false,
        "hits": {
            "total": {"value": 2, "relation": "eq"},
            "max_score": 0.91,
            "hits": [
                {
                    "_index": "search-elastic-labs",
                    "_id": "doc-1",
                    "_score": 0.91,
                    "_source": {},
                    "inner_hits": {
                        "search-elastic-labs.semantic_body": {
                            "hits": {
                                "total": {"value": 2, "relation": "eq"},
                                "max_score": 0.91,
                                "hits": [
                                    {
                                        "_index": "search-elastic-labs",
                                        "_id": "doc-1",
                                        "_nested": {"field": "semantic_body.inference.chunks", "offset": 3},
                                        "_score": 0.91,
                                        "_source": {"text": "first chunk"}
                                    }
                                ]
                            }
                        }
                    }
                },
                {
                    "_index": "search-elastic-labs",
                    "_id": "doc-2",
                    "_score": null,
                    "_source": {"semantic_body": "plain body"}
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_search_response() {
        let resp: SearchResponse = serde_json::from_str(RESPONSE).unwrap();
        assert_eq!(resp.took, 12);
        assert_eq!(resp.hits.total.as_ref().map(TotalHits::value), Some(2));
        assert_eq!(resp.hits.hits.len(), 2);

        let first = &resp.hits.hits[0];
        let chunks = first
            .inner_hits_for("search-elastic-labs.semantic_body")
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text(), Some("first chunk"));
        assert_eq!(chunks[0].nested.as_ref().unwrap().offset, 3);

        let second = &resp.hits.hits[1];
        assert!(second.score.is_none());
        assert!(second.inner_hits.is_empty());
        assert_eq!(second.source["semantic_body"], "plain body");
    }

    #[test]
    fn test_total_hits_bare_number() {
        let list: HitList<SearchHit> = serde_json::from_str(r#"{"total": 7, "hits": []}"#).unwrap();
        assert_eq!(list.total, Some(TotalHits::Count(7)));
    }

    #[test]
    fn test_source_fields_lookup() {
        let fields = SourceFields::new().with("search-elastic-labs", &["semantic_body", "title"]);
        assert_eq!(fields.primary_field("search-elastic-labs"), Some("semantic_body"));
        assert_eq!(
            fields.inner_hit_key("search-elastic-labs").as_deref(),
            Some("search-elastic-labs.semantic_body")
        );
        assert!(fields.primary_field("other").is_none());
        assert!(!fields.contains("other"));
    }

    #[test]
    fn test_source_fields_empty_list_is_unmapped() {
        let mut fields = SourceFields::new();
        fields.insert("idx", Vec::new());
        assert!(!fields.contains("idx"));
    }
}
