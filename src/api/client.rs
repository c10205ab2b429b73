use std::sync::RwLock;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::api::error::ApiError;
use crate::core::config::Config;
use crate::core::constants::{
    BASE_URL_ENV_VAR, DEFAULT_BASE_URL, READ_TIMEOUT_SECS, WRITE_TIMEOUT_SECS,
};
use crate::utils::url::{build_endpoint_url, normalize_base_url};

/// Per-verb deadlines. Reads (GET/DELETE) get the shorter budget, writes
/// (POST/PUT) the longer one, since query answering can take a while.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub read: Duration,
    pub write: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(READ_TIMEOUT_SECS),
            write: Duration::from_secs(WRITE_TIMEOUT_SECS),
        }
    }
}

impl Timeouts {
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            read: config
                .read_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.read),
            write: config
                .write_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.write),
        }
    }
}

/// A decoded success body: JSON when the server said so, raw text otherwise.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(Value),
    Text(String),
}

/// The single chokepoint for all outbound calls to the backend.
///
/// Holds the resolved base URL, the per-verb deadlines, and an explicit
/// token slot written only by the session holder. The client itself never
/// reads platform storage and never mutates the token.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeouts: Timeouts,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeouts(base_url, Timeouts::default())
    }

    pub fn with_timeouts(base_url: impl Into<String>, timeouts: Timeouts) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: normalize_base_url(&base_url.into()),
            timeouts,
            token: RwLock::new(None),
        }
    }

    /// Build a client from persisted configuration. Base URL resolution
    /// order: config file, then `FRAGA_BASE_URL`, then the built-in default.
    pub fn from_config(config: &Config) -> Self {
        Self::with_timeouts(resolve_base_url(config), Timeouts::from_config(config))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap() = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().unwrap().is_some()
    }

    pub async fn get(&self, path: &str) -> Result<Payload, ApiError> {
        self.send(Method::GET, path, None).await
    }

    pub async fn delete(&self, path: &str) -> Result<Payload, ApiError> {
        self.send(Method::DELETE, path, None).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Payload, ApiError> {
        let body = encode_body(body)?;
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<Payload, ApiError> {
        let body = encode_body(body)?;
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode_payload(self.get(path).await?)
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode_payload(self.delete(path).await?)
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        decode_payload(self.post(path, body).await?)
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        decode_payload(self.put(path, body).await?)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Payload, ApiError> {
        let url = build_endpoint_url(&self.base_url, path);
        let deadline = if method == Method::POST || method == Method::PUT {
            self.timeouts.write
        } else {
            self.timeouts.read
        };

        debug!(%method, %url, "sending request");

        let mut request = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(deadline);

        if let Some(token) = self.token.read().unwrap().as_deref() {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_transport_error(&e, deadline))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json") || v.contains("+json"))
            .unwrap_or(false);

        let text = response
            .text()
            .await
            .map_err(|e| classify_transport_error(&e, deadline))?;

        debug!(status = status.as_u16(), bytes = text.len(), "received response");

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &text));
        }

        if is_json {
            let value = serde_json::from_str(&text).map_err(|e| ApiError::Decode {
                message: format!("Malformed JSON in response body: {e}"),
            })?;
            Ok(Payload::Json(value))
        } else {
            Ok(Payload::Text(text))
        }
    }
}

fn encode_body<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode {
        message: format!("Could not serialize request body: {e}"),
    })
}

fn decode_payload<T: DeserializeOwned>(payload: Payload) -> Result<T, ApiError> {
    match payload {
        Payload::Json(value) => serde_json::from_value(value).map_err(|e| ApiError::Decode {
            message: format!("Unexpected response shape: {e}"),
        }),
        Payload::Text(_) => Err(ApiError::Decode {
            message: "Expected a JSON response body".to_string(),
        }),
    }
}

fn classify_transport_error(e: &reqwest::Error, deadline: Duration) -> ApiError {
    if e.is_timeout() {
        ApiError::timeout(deadline)
    } else {
        ApiError::from_transport(&e.to_string())
    }
}

fn resolve_base_url(config: &Config) -> String {
    if let Some(url) = &config.base_url {
        return url.clone();
    }
    if let Ok(url) = std::env::var(BASE_URL_ENV_VAR) {
        if !url.trim().is_empty() {
            return url;
        }
    }
    DEFAULT_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{QueryRequest, QueryResponse};
    use crate::api::test_support::{http_response, spawn_stub};
    use std::time::Instant;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn successful_query_decodes_answer_and_sources() {
        let body = r#"{"answer":"Tre månader.","sources":[{"document_name":"anstallningsavtal.pdf","page_number":4,"snippet":"Uppsägningstiden är tre månader."}],"mode":"answer","latency_ms":120.0,"workspace":"default"}"#;
        let (url, server) = spawn_stub(http_response("200 OK", "application/json", body)).await;

        let client = ApiClient::new(url);
        let request = QueryRequest {
            query: "Vad är uppsägningstiden?".to_string(),
            workspace: "default".to_string(),
            doc_ids: None,
            mode: crate::api::models::QueryMode::Answer,
            verbose: false,
        };
        let response: QueryResponse = client
            .post_json("/query", &request)
            .await
            .expect("query succeeds");

        assert_eq!(response.answer, "Tre månader.");
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].page_number, 4);
        assert_eq!(response.workspace, "default");

        let raw_request = server.await.expect("stub finished");
        assert!(raw_request.starts_with("POST /query HTTP/1.1"));
        assert!(raw_request.contains("Vad är uppsägningstiden?"));
    }

    #[tokio::test]
    async fn bearer_header_present_iff_token_set() {
        let (url, server) =
            spawn_stub(http_response("200 OK", "application/json", "{}")).await;
        let client = ApiClient::new(url);
        client.set_token("tok-123");
        client.get("/health").await.expect("get succeeds");
        let raw_request = server.await.expect("stub finished");
        assert!(raw_request.contains("authorization: Bearer tok-123")
            || raw_request.contains("Authorization: Bearer tok-123"));

        let (url, server) =
            spawn_stub(http_response("200 OK", "application/json", "{}")).await;
        let client = ApiClient::new(url);
        client.get("/health").await.expect("get succeeds");
        let raw_request = server.await.expect("stub finished");
        assert!(!raw_request.to_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn clear_token_removes_bearer_header() {
        let (url, server) =
            spawn_stub(http_response("200 OK", "application/json", "{}")).await;
        let client = ApiClient::new(url);
        client.set_token("tok-123");
        client.clear_token();
        assert!(!client.has_token());
        client.get("/health").await.expect("get succeeds");
        let raw_request = server.await.expect("stub finished");
        assert!(!raw_request.to_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn non_2xx_json_body_yields_status_error_with_server_message() {
        let (url, _server) = spawn_stub(http_response(
            "503 Service Unavailable",
            "application/json",
            r#"{"detail":"RAGEngine inte redo. Kör indexering först."}"#,
        ))
        .await;

        let client = ApiClient::new(url);
        let err = client.get("/query").await.expect_err("call fails");
        assert_eq!(err.status(), 503);
        assert!(err.message().contains("RAGEngine inte redo"));
    }

    #[tokio::test]
    async fn non_2xx_non_json_body_still_normalizes() {
        let (url, _server) = spawn_stub(http_response(
            "500 Internal Server Error",
            "text/html",
            "<html>boom</html>",
        ))
        .await;

        let client = ApiClient::new(url);
        let err = client.get("/stats").await.expect_err("call fails");
        assert_eq!(err.status(), 500);
        assert!(!err.message().is_empty());
        assert_eq!(err.message(), "Request failed with status 500");
    }

    #[tokio::test]
    async fn non_2xx_empty_body_still_normalizes() {
        let (url, _server) =
            spawn_stub(http_response("502 Bad Gateway", "text/plain", "")).await;

        let client = ApiClient::new(url);
        let err = client.get("/stats").await.expect_err("call fails");
        assert_eq!(err.status(), 502);
        assert!(!err.message().is_empty());
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        // Bind then drop to get a port with nothing listening on it.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = ApiClient::new(format!("http://{addr}"));
        let err = client.get("/health").await.expect_err("call fails");
        assert_eq!(err.status(), 0);
        assert!(err.message().starts_with("Network error:"));
    }

    #[tokio::test]
    async fn unresponsive_server_times_out_with_408() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        // Accept the connection but never answer.
        let server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.expect("accept");
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let deadline = Duration::from_millis(250);
        let client = ApiClient::with_timeouts(
            format!("http://{addr}"),
            Timeouts {
                read: deadline,
                write: deadline,
            },
        );

        let start = Instant::now();
        let err = client.get("/health").await.expect_err("call times out");
        let elapsed = start.elapsed();

        assert_eq!(err.status(), 408);
        assert!(matches!(err, ApiError::Timeout { .. }));
        // Deadline plus generous scheduling slack, well short of forever.
        assert!(elapsed < deadline + Duration::from_secs(5));

        server.abort();
    }

    #[tokio::test]
    async fn malformed_success_json_is_a_decode_error() {
        let (url, _server) = spawn_stub(http_response(
            "200 OK",
            "application/json",
            r#"{"answer": truncated"#,
        ))
        .await;

        let client = ApiClient::new(url);
        let err = client.get("/query").await.expect_err("decode fails");
        assert!(matches!(err, ApiError::Decode { .. }));
        assert!(err.message().contains("Malformed JSON"));
    }

    #[tokio::test]
    async fn non_json_success_body_is_returned_as_text() {
        let (url, _server) =
            spawn_stub(http_response("200 OK", "text/plain", "pong")).await;

        let client = ApiClient::new(url);
        let payload = client.get("/health").await.expect("get succeeds");
        match payload {
            Payload::Text(text) => assert_eq!(text, "pong"),
            other => panic!("expected text payload, got {other:?}"),
        }
    }

    #[test]
    fn base_url_resolution_prefers_config_over_default() {
        let config = Config {
            base_url: Some("http://localhost:9000".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_base_url(&config), "http://localhost:9000");

        let config = Config::default();
        // Environment may or may not carry an override in the test
        // environment; only the config-empty + env-empty case is fixed.
        if std::env::var(BASE_URL_ENV_VAR).is_err() {
            assert_eq!(resolve_base_url(&config), DEFAULT_BASE_URL);
        }
    }

    #[test]
    fn timeouts_honor_config_overrides() {
        let config = Config {
            read_timeout_secs: Some(5),
            ..Config::default()
        };
        let timeouts = Timeouts::from_config(&config);
        assert_eq!(timeouts.read, Duration::from_secs(5));
        assert_eq!(timeouts.write, Duration::from_secs(WRITE_TIMEOUT_SECS));
    }
}
