use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{bulk_index_body, BulkResponse, ElasticURL, SearchResponse, SuggestResponse};

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Minimal client for the Elasticsearch REST API.
///
/// Cloning is cheap; the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    http: reqwest::Client,
    base_url: ElasticURL,
    credentials: Option<Credentials>,
}

impl ElasticClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ElasticError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ElasticError::ResponseError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: ElasticURL::new(base_url),
            credentials: None,
        })
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_ref()
    }

    fn request(&self, method: Method, url: &ElasticURL) -> RequestBuilder {
        let builder = self.http.request(method, url.as_ref());
        match &self.credentials {
            Some(c) => builder.basic_auth(&c.username, Some(&c.password)),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ElasticError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| ElasticError::ResponseError(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ElasticError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let resp_data = resp.json::<T>().await.map_err(|e| {
            ElasticError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })?;

        Ok(resp_data)
    }

    /// Runs a query DSL body against `index` and returns the typed hits.
    pub async fn search<T: DeserializeOwned>(
        &self,
        index: &str,
        body: &Value,
    ) -> Result<SearchResponse<T>, ElasticError> {
        let url = self.base_url.append_path(&format!("{}/_search", index));
        tracing::debug!(index, body = %body, "Executing search");

        self.send(self.request(Method::POST, &url).json(body)).await
    }

    /// Runs a body containing a `suggest` section and returns only the suggestion groups.
    pub async fn suggest(&self, index: &str, body: &Value) -> Result<SuggestResponse, ElasticError> {
        let url = self.base_url.append_path(&format!("{}/_search", index));
        tracing::debug!(index, body = %body, "Executing suggest");

        self.send(self.request(Method::POST, &url).json(body)).await
    }

    pub async fn index_exists(&self, index: &str) -> Result<bool, ElasticError> {
        let url = self.base_url.append_path(index);
        let resp = self
            .request(Method::HEAD, &url)
            .send()
            .await
            .map_err(|e| ElasticError::ResponseError(e.to_string()))?;

        match resp.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ElasticError::UnexpectedStatus {
                status: status.as_u16(),
                body: String::new(),
            }),
        }
    }

    /// Creates `index` with the given settings/mappings body.
    pub async fn create_index(&self, index: &str, body: &Value) -> Result<(), ElasticError> {
        let url = self.base_url.append_path(index);
        let _: Value = self.send(self.request(Method::PUT, &url).json(body)).await?;
        Ok(())
    }

    /// Indexes every `(id, document)` pair in a single `_bulk` request.
    pub async fn bulk_index<'a, T, I>(
        &self,
        index: &str,
        documents: I,
    ) -> Result<BulkResponse, ElasticError>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = (&'a str, &'a T)>,
    {
        let body = bulk_index_body(index, documents)?;
        if body.is_empty() {
            return Ok(BulkResponse {
                took: 0,
                errors: false,
                items: vec![],
            });
        }

        let url = self.base_url.append_path("_bulk");
        let builder = self
            .request(Method::POST, &url)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body);

        self.send(builder).await
    }

    pub async fn refresh(&self, index: &str) -> Result<(), ElasticError> {
        let url = self.base_url.append_path(&format!("{}/_refresh", index));
        let _: Value = self.send(self.request(Method::POST, &url)).await?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ElasticError {
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("UnexpectedStatus: {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("ParsingError: {0}")]
    ParsingError(String),
}
