//! Content source port
//!
//! The listing reads posts through two capabilities: a document query for
//! the first page and a plain GET of the cursor URL for every page after it.

mod predicate;
mod prismic;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::content::RawPost;
use crate::error::SourceError;

pub use predicate::{Predicate, Query};
pub use prismic::PrismicClient;

/// One page of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// Cursor URL of the next page, `None` once exhausted
    #[serde(default)]
    pub next_page: Option<String>,

    #[serde(rename = "page")]
    pub page_number: u32,

    pub results: Vec<RawPost>,

    #[serde(default)]
    pub total_pages: Option<u32>,

    #[serde(default)]
    pub total_results_size: Option<u32>,
}

/// Read-only document query
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Run a listing query and return its first page
    async fn query_posts(&self, query: &Query) -> Result<PageResult, SourceError>;
}

/// Cursor-based continuation
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page behind a cursor URL
    async fn fetch_page(&self, url: &str) -> Result<PageResult, SourceError>;
}

/// GET a cursor URL and decode the page it returns
pub async fn fetch_page(http: &Client, url: &str) -> Result<PageResult, SourceError> {
    tracing::debug!("Fetching page {}", url);
    let response = http.get(url).send().await?;
    handle_response(response).await
}

/// Map status codes to errors and decode successful bodies
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SourceError> {
    let status = response.status();

    if status.is_success() {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| SourceError::Deserialization(e.to_string()))
    } else if status.as_u16() == 401 {
        Err(SourceError::Unauthorized)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(SourceError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
