//! Fake content API and a loopback HTTP server

use async_trait::async_trait;
use axum::Router;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::error::SourceError;
use crate::source::{ContentSource, PageFetcher, PageResult, Query};

/// Content API that answers with a scripted queue of responses.
///
/// Queries and cursor fetches share the queue. Every call is recorded
/// (cursor URLs as-is, queries as their `q` string).
#[derive(Default)]
pub struct ScriptedApi {
    responses: Mutex<VecDeque<Result<PageResult, SourceError>>>,
    calls: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
    entered: Arc<Notify>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: PageResult) -> Self {
        self.responses.lock().unwrap().push_back(Ok(page));
        self
    }

    pub fn with_error(self, err: SourceError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    /// Hold every call until `gate` is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Notified each time a call starts
    pub fn entered(&self) -> Arc<Notify> {
        self.entered.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond(&self, call: String) -> Result<PageResult, SourceError> {
        self.calls.lock().unwrap().push(call.clone());
        self.entered.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Err(SourceError::Api {
                status: 404,
                message: format!("no scripted response for {}", call),
            })
        })
    }
}

#[async_trait]
impl ContentSource for ScriptedApi {
    async fn query_posts(&self, query: &Query) -> Result<PageResult, SourceError> {
        self.respond(query.q()).await
    }
}

#[async_trait]
impl PageFetcher for ScriptedApi {
    async fn fetch_page(&self, url: &str) -> Result<PageResult, SourceError> {
        self.respond(url.to_string()).await
    }
}

/// Serve a router on an ephemeral loopback port and return its base URL.
/// The builder receives the base URL so routes can link back to the server.
pub async fn serve<F>(build: F) -> String
where
    F: FnOnce(String) -> Router,
{
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = build(base.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}
