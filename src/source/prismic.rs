//! Prismic REST API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{fetch_page, handle_response, ContentSource, PageFetcher, PageResult, Query};
use crate::config::ApiConfig;
use crate::error::SourceError;

/// Client for a Prismic repository's v2 API
pub struct PrismicClient {
    http: Client,
    endpoint: String,
    access_token: Option<String>,
}

/// Repository metadata returned by the API root
#[derive(Deserialize)]
struct ApiInfo {
    refs: Vec<ApiRef>,
}

#[derive(Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

impl PrismicClient {
    pub fn new(
        endpoint: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("prismic-blog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token: access_token.filter(|t| !t.is_empty()),
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, SourceError> {
        Self::new(
            &api.endpoint,
            api.access_token.clone(),
            Duration::from_secs(api.timeout_secs.max(1)),
        )
    }

    fn token_param(&self) -> Vec<(&'static str, String)> {
        self.access_token
            .iter()
            .map(|t| ("access_token", t.clone()))
            .collect()
    }

    /// Look up the master ref that pins the published content
    async fn master_ref(&self) -> Result<String, SourceError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&self.token_param())
            .send()
            .await?;
        let info: ApiInfo = handle_response(response).await?;

        info.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or_else(|| SourceError::NoMasterRef(self.endpoint.clone()))
    }
}

#[async_trait]
impl ContentSource for PrismicClient {
    async fn query_posts(&self, query: &Query) -> Result<PageResult, SourceError> {
        let master_ref = self.master_ref().await?;
        let q = query.q();
        tracing::debug!("Searching {} with q={} pageSize={}", self.endpoint, q, query.page_size);

        let mut params = vec![
            ("ref", master_ref),
            ("q", q),
            ("pageSize", query.page_size.to_string()),
        ];
        params.extend(self.token_param());

        let response = self
            .http
            .get(format!("{}/documents/search", self.endpoint))
            .query(&params)
            .send()
            .await?;
        handle_response(response).await
    }
}

#[async_trait]
impl PageFetcher for PrismicClient {
    async fn fetch_page(&self, url: &str) -> Result<PageResult, SourceError> {
        fetch_page(&self.http, url).await
    }
}
