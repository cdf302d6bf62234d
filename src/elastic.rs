use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppResult;

/// Single hit from a search response: document id plus its source fields.
#[derive(Clone, Debug)]
pub struct Hit {
    pub id: String,
    pub source: Value,
}

/// Read-side view of the document index: point lookup, query-DSL search and
/// document count. Implementations own their own timeouts; failures are
/// propagated to the caller, never retried here.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn get_source(&self, index: &str, id: &str) -> AppResult<Option<Value>>;
    async fn search(&self, index: &str, body: Value) -> AppResult<Vec<Hit>>;
    async fn count(&self, index: &str) -> AppResult<u64>;
}

/// Elasticsearch client over its REST API.
pub struct ElasticClient {
    http: reqwest::Client,
    base_url: String,
}

impl ElasticClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { http, base_url }
    }
}

#[async_trait]
impl SearchBackend for ElasticClient {
    async fn get_source(&self, index: &str, id: &str) -> AppResult<Option<Value>> {
        let url = format!("{}/{}/_doc/{}", self.base_url, index, id);
        let resp = self.http.get(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let doc: DocResponse = resp.error_for_status()?.json().await?;
        Ok(Some(doc.source))
    }

    async fn search(&self, index: &str, body: Value) -> AppResult<Vec<Hit>> {
        let url = format!("{}/{}/_search", self.base_url, index);
        let resp: SearchResponse =
            self.http.post(url).json(&body).send().await?.error_for_status()?.json().await?;
        Ok(resp
            .hits
            .hits
            .into_iter()
            .map(|h| Hit { id: h.id, source: h.source })
            .collect())
    }

    async fn count(&self, index: &str) -> AppResult<u64> {
        let url = format!("{}/{}/_count", self.base_url, index);
        let resp: CountResponse =
            self.http.get(url).send().await?.error_for_status()?.json().await?;
        Ok(resp.count)
    }
}

#[derive(Debug, Deserialize)]
struct DocResponse {
    #[serde(rename = "_source")]
    source: Value,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: Value,
}
