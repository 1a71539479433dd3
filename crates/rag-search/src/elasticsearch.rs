//! Elasticsearch-backed retriever.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use rag_core::{ElasticsearchConfig, RagError, Result, Retriever, SearchHit, SearchResponse};

use crate::query::SemanticQuery;

/// Retriever issuing nested kNN queries against a single index.
pub struct ElasticsearchRetriever {
    /// HTTP client.
    client: Client,

    /// Cluster URL without trailing slash.
    url: String,

    /// Basic auth credentials, passed through as-is.
    user: String,
    password: String,

    index: String,

    /// Semantic field searched in `index`.
    field: String,

    model_id: String,
    size: u32,
    inner_hits_size: u32,
}

impl ElasticsearchRetriever {
    /// Create a retriever from configuration.
    ///
    /// Fails when the configured index has no field in the field table.
    pub fn new(config: &ElasticsearchConfig) -> Result<Self> {
        let field = config
            .fields
            .primary_field(&config.index)
            .ok_or_else(|| RagError::UnmappedIndex {
                index: config.index.clone(),
            })?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!(
            "Elasticsearch retriever: url={}, index={}, field={}",
            config.url, config.index, field
        );

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            password: config.password.clone(),
            index: config.index.clone(),
            field,
            model_id: config.model_id.clone(),
            size: config.size,
            inner_hits_size: config.inner_hits_size,
        })
    }

    fn query(&self) -> SemanticQuery<'_> {
        SemanticQuery {
            index: &self.index,
            field: &self.field,
            model_id: &self.model_id,
            size: self.size,
            inner_hits_size: self.inner_hits_size,
        }
    }

    /// Request body that `retrieve` would send for `question`.
    pub fn search_body(&self, question: &str) -> Value {
        self.query().to_body(question)
    }

    fn search_url(&self) -> String {
        format!("{}/{}/_search", self.url, self.index)
    }
}

/// Parse a raw `_search` response into hits, keeping ranking order.
pub fn parse_response(body: &str) -> Result<Vec<SearchHit>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    debug!(
        "Search took {}ms, {} hits",
        response.took,
        response.hits.hits.len()
    );
    Ok(response.hits.hits)
}

#[async_trait]
impl Retriever for ElasticsearchRetriever {
    async fn retrieve(&self, question: &str) -> Result<Vec<SearchHit>> {
        let start = Instant::now();
        let body = self.search_body(question);

        debug!("Searching {} for: {:?}", self.index, question);

        let mut request = self.client.post(self.search_url()).json(&body);
        if !self.user.is_empty() {
            request = request.basic_auth(&self.user, Some(&self.password));
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(RagError::Search {
                status: status.as_u16(),
                body: text,
            });
        }

        let hits = parse_response(&text)?;

        info!(
            "Retrieved {} hits from {} in {}ms",
            hits.len(),
            self.index,
            start.elapsed().as_millis()
        );

        Ok(hits)
    }

    fn index(&self) -> &str {
        &self.index
    }
}
