//! In-memory transport for unit tests

use crate::client::{Transport, TransportResponse};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

struct Route {
    fragments: Vec<String>,
    status: u16,
    body: String,
}

/// Answers each URL with the first route whose fragments all appear in it,
/// and records every URL it was asked for.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, fragments: &[&str], body: serde_json::Value) -> Self {
        self.on_text(fragments, 200, &body.to_string())
    }

    pub fn on_text(mut self, fragments: &[&str], status: u16, body: &str) -> Self {
        self.routes.push(Route {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of recorded requests containing `fragment`
    pub fn count(&self, fragment: &str) -> usize {
        self.requests()
            .iter()
            .filter(|url| url.contains(fragment))
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(url.to_string());

        self.routes
            .iter()
            .find(|route| route.fragments.iter().all(|f| url.contains(f.as_str())))
            .map(|route| TransportResponse {
                status: route.status,
                body: route.body.clone(),
            })
            .ok_or_else(|| ReportError::Transport(format!("connection refused: {}", url)))
    }
}
