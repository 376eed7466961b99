//! ES|QL client for the Elasticsearch analytics engine
//!
//! Queries go through the `/_query` endpoint with positional `?` parameter
//! binding, so caller-supplied values never end up spliced into query text.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::{
    config::ElasticConfig,
    error::{AppError, AppResult},
};

/// Timeout applied to every outbound query.
const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes ES|QL queries against the analytics engine.
///
/// Services depend on this trait rather than on the concrete client so they
/// can be tested against a stubbed engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EsqlExecutor: Send + Sync {
    /// Run a query and return one JSON object per result row, keyed by
    /// column name. `params` are bound to the query's `?` placeholders in
    /// order.
    async fn query(&self, esql: &str, params: Vec<Value>) -> AppResult<Vec<Value>>;
}

/// Columnar response shape of the `/_query` endpoint.
#[derive(Debug, Deserialize)]
struct EsqlResponse {
    columns: Vec<EsqlColumn>,
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct EsqlColumn {
    name: String,
}

/// HTTP client for the ES|QL query API.
#[derive(Clone)]
pub struct EsqlClient {
    client: reqwest::Client,
    url: String,
    username: Option<String>,
    password: Option<String>,
}

impl EsqlClient {
    pub fn new(config: &ElasticConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(QUERY_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl EsqlExecutor for EsqlClient {
    async fn query(&self, esql: &str, params: Vec<Value>) -> AppResult<Vec<Value>> {
        let mut body = json!({ "query": esql });
        if !params.is_empty() {
            body["params"] = Value::Array(params);
        }

        let mut request = self
            .client
            .post(format!("{}/_query?format=json", self.url))
            .json(&body);

        if let Some(ref username) = self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Engine(format!(
                "ES|QL query failed with status {}: {}",
                status, detail
            )));
        }

        let parsed: EsqlResponse = response.json().await?;
        Ok(into_rows(parsed))
    }
}

/// Zip the columnar response into one JSON object per row.
fn into_rows(response: EsqlResponse) -> Vec<Value> {
    response
        .values
        .into_iter()
        .map(|row| {
            let mut object = Map::new();
            for (column, cell) in response.columns.iter().zip(row) {
                object.insert(column.name.clone(), cell);
            }
            Value::Object(object)
        })
        .collect()
}
