//! Outbound requests to the SonarQube server

use crate::error::{ReportError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Status and body of one HTTP exchange
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single GET round trip.
///
/// The HTTP client is injected through this trait so that one connection pool
/// is shared by every provider of a run and tests can answer from memory.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse>;
}

/// `reqwest` backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpTransport {
    /// Creates the client used for the whole run
    pub fn new(config: &crate::config::Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("sonar-report/", env!("CARGO_PKG_VERSION")));

        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        let mut request = self.client.get(url);

        // SonarQube tokens go in the user field with an empty password
        if let Some(token) = &self.token {
            request = request.basic_auth(token, Some(""));
        }

        let response = request.send().await.map_err(|e| {
            error!("HTTP request failed: {}", e);
            ReportError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}

/// Error payload SonarQube embeds in its JSON answers
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    errors: Vec<ServerMessage>,
}

#[derive(Debug, Deserialize)]
struct ServerMessage {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Escapes the characters that raw filter values may carry in a query string
pub fn prepare_url(url: &str) -> String {
    url.replace(' ', "%20")
        .replace('+', "%2B")
        .replace('"', "%22")
}

/// First server-reported message of a JSON answer, if any
fn server_error(json: &serde_json::Value) -> Option<String> {
    let payload = ErrorPayload::deserialize(json).ok()?;
    let first = payload.errors.into_iter().next()?;
    Some(
        first
            .msg
            .or(first.message)
            .unwrap_or_else(|| "Unknown server error".to_string()),
    )
}

/// Issues requests and turns the answers into JSON, one round trip per call
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn dispatch(&self, url: &str) -> Result<TransportResponse> {
        let prepared = prepare_url(url);
        debug!("GET {}", prepared);
        self.transport.get(&prepared).await
    }

    /// Executes a request expecting a JSON object
    pub async fn execute(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.dispatch(url).await?;
        parse_object(&response)
    }

    /// Executes a request and deserializes the JSON object into `T`
    pub async fn execute_as<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.dispatch(url).await?;
        let json = parse_object(&response)?;

        serde_json::from_value(json).map_err(|e| {
            error!("Unexpected response shape from {}: {}", url, e);
            ReportError::malformed(e.to_string(), response.body.clone())
        })
    }

    /// Executes a request whose answer is not JSON (e.g. an XML export)
    pub async fn execute_text(&self, url: &str) -> Result<String> {
        let response = self.dispatch(url).await?;

        if response.is_success() {
            return Ok(response.body);
        }

        let message = serde_json::from_str::<serde_json::Value>(&response.body)
            .ok()
            .and_then(|json| server_error(&json))
            .unwrap_or_else(|| format!("HTTP {}: {}", response.status, response.body));

        Err(ReportError::ServerReported(message))
    }
}

fn parse_object(response: &TransportResponse) -> Result<serde_json::Value> {
    let json: serde_json::Value = match serde_json::from_str(&response.body) {
        Ok(json) => json,
        Err(_) if !response.is_success() => {
            return Err(ReportError::ServerReported(format!(
                "HTTP {}: {}",
                response.status, response.body
            )));
        }
        Err(e) => {
            error!("Server answered something that is not JSON: {}", e);
            return Err(ReportError::malformed(e.to_string(), response.body.clone()));
        }
    };

    if let Some(message) = server_error(&json) {
        return Err(ReportError::ServerReported(message));
    }

    if !response.is_success() {
        return Err(ReportError::ServerReported(format!(
            "HTTP {}: {}",
            response.status, response.body
        )));
    }

    if !json.is_object() {
        return Err(ReportError::malformed(
            "expected a JSON object",
            response.body.clone(),
        ));
    }

    Ok(json)
}
