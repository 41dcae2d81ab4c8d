//! Ollama backend adapter

use crate::ollama::error::{OllamaError, classify_transport, malformed};
use crate::ollama::protocol::{
    CHAT_PATH, ChatRequest, ChatResponse, ErrorBody, TAGS_PATH, TagsResponse, VERSION_PATH,
    VersionResponse,
};
use async_trait::async_trait;
use llmgate_application::{BackendError, BackendHealth, ModelBackend};
use llmgate_domain::Model;
use llmgate_domain::util::preview;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_PORT: u16 = 11434;

/// Connection settings for [`OllamaBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server
    pub base_url: String,
    /// Limit for establishing a TCP connection
    pub connect_timeout: Duration,
    /// Limit for `list_models` and `health` calls
    pub list_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            list_timeout: Duration::from_secs(10),
        }
    }
}

/// Normalize a host string the way `OLLAMA_HOST` is interpreted.
///
/// `0.0.0.0:11434`, `localhost` and `https://gpu-box/` are all accepted. A
/// bare host gets the `http` scheme and, without an explicit port, the
/// default Ollama port. Trailing slashes are removed.
pub fn normalize_base_url(raw: &str) -> Result<String, OllamaError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_BASE_URL.to_string());
    }

    let invalid = |reason: String| OllamaError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = if raw.contains("://") {
        Url::parse(raw).map_err(|e| invalid(e.to_string()))?
    } else {
        let mut url =
            Url::parse(&format!("http://{}", raw)).map_err(|e| invalid(e.to_string()))?;
        if url.port().is_none() {
            url.set_port(Some(DEFAULT_PORT))
                .map_err(|_| invalid("cannot carry a port".to_string()))?;
        }
        url
    };

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// [`ModelBackend`] over the Ollama HTTP API.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    list_timeout: Duration,
}

impl OllamaBackend {
    pub fn new(config: OllamaConfig) -> Result<Self, OllamaError> {
        let base_url = normalize_base_url(&config.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        info!("OllamaBackend initialized at {}", base_url);

        Ok(Self {
            client,
            base_url,
            list_timeout: config.list_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<(StatusCode, Vec<u8>), BackendError> {
        let response = self
            .client
            .get(self.url(path))
            .timeout(self.list_timeout)
            .send()
            .await
            .map_err(|e| classify_transport(e, &self.base_url))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_transport(e, &self.base_url))?;
        Ok((status, body.to_vec()))
    }

    async fn post_chat(
        &self,
        request: &ChatRequest<'_>,
        timeout: Duration,
    ) -> Result<String, BackendError> {
        let response = self
            .client
            .post(self.url(CHAT_PATH))
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| classify_transport(e, &self.base_url))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_transport(e, &self.base_url))?;
        parse_chat_reply(status, &body)
    }
}

/// Interpret a `/api/tags` reply.
fn parse_tags(status: StatusCode, body: &[u8]) -> Result<Vec<Model>, BackendError> {
    if !status.is_success() {
        return Err(unexpected_status(TAGS_PATH, status, body));
    }
    let tags: TagsResponse =
        serde_json::from_slice(body).map_err(|e| malformed("model listing", e, body))?;

    let mut models = Vec::with_capacity(tags.models.len());
    for entry in tags.models {
        match Model::new(entry.name) {
            Ok(model) => models.push(model),
            Err(_) => warn!("Skipping unnamed entry in model listing"),
        }
    }
    Ok(models)
}

/// Interpret a `/api/chat` reply.
///
/// Ollama reports model failures (unknown model, runner crash, out of
/// memory) as an `error` string, either with a non-success status or inside
/// a 200 body.
fn parse_chat_reply(status: StatusCode, body: &[u8]) -> Result<String, BackendError> {
    if !status.is_success() {
        return match serde_json::from_slice::<ErrorBody>(body) {
            Ok(err) => Err(BackendError::ModelExecution(err.error)),
            Err(_) => Err(unexpected_status(CHAT_PATH, status, body)),
        };
    }

    let reply: ChatResponse =
        serde_json::from_slice(body).map_err(|e| malformed("chat reply", e, body))?;
    if let Some(error) = reply.error {
        return Err(BackendError::ModelExecution(error));
    }
    reply
        .message
        .map(|m| m.content)
        .ok_or_else(|| BackendError::Protocol("chat reply carries no message".to_string()))
}

fn unexpected_status(path: &str, status: StatusCode, body: &[u8]) -> BackendError {
    BackendError::Protocol(format!(
        "{} returned HTTP {}: {}",
        path,
        status,
        preview(&String::from_utf8_lossy(body), 200)
    ))
}

#[async_trait]
impl ModelBackend for OllamaBackend {
    async fn list_models(&self) -> Result<Vec<Model>, BackendError> {
        debug!("GET {}{}", self.base_url, TAGS_PATH);
        let (status, body) = self.get(TAGS_PATH).await?;
        parse_tags(status, &body)
    }

    async fn chat_completion(
        &self,
        model: &Model,
        prompt: &str,
        deadline: Instant,
    ) -> Result<String, BackendError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(BackendError::Timeout);
        }

        let request = ChatRequest::single_turn(model.as_str(), prompt);
        debug!(
            "POST {}{} model={} prompt={}",
            self.base_url,
            CHAT_PATH,
            model,
            preview(prompt, 60)
        );

        // reqwest's own timeout covers the HTTP exchange; the outer deadline
        // also bounds anything reqwest does not count (e.g. DNS).
        match tokio::time::timeout_at(deadline, self.post_chat(&request, remaining)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout),
        }
    }

    async fn health(&self) -> Result<BackendHealth, BackendError> {
        let (status, body) = self.get(VERSION_PATH).await?;
        if !status.is_success() {
            return Err(unexpected_status(VERSION_PATH, status, &body));
        }
        let version = serde_json::from_slice::<VersionResponse>(&body)
            .map_err(|e| malformed("version reply", e, &body))?
            .version;
        Ok(BackendHealth {
            endpoint: self.base_url.clone(),
            version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    // ==================== Stub server ====================

    /// Read one HTTP/1.1 request (headers plus Content-Length body).
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serve exactly one canned response; the handle yields the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            request
        });
        (base_url, handle)
    }

    fn backend_at(base_url: &str) -> OllamaBackend {
        OllamaBackend::new(OllamaConfig {
            base_url: base_url.to_string(),
            connect_timeout: Duration::from_secs(2),
            list_timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    fn deadline_in(secs: u64) -> Instant {
        Instant::now() + Duration::from_secs(secs)
    }

    // ==================== URL normalization ====================

    #[test]
    fn normalize_bare_host_gets_scheme_and_port() {
        assert_eq!(normalize_base_url("0.0.0.0").unwrap(), "http://0.0.0.0:11434");
        assert_eq!(
            normalize_base_url("gpu-box:8080").unwrap(),
            "http://gpu-box:8080"
        );
        assert_eq!(normalize_base_url("").unwrap(), DEFAULT_BASE_URL);
    }

    #[test]
    fn normalize_keeps_explicit_url() {
        assert_eq!(
            normalize_base_url("https://ollama.internal/").unwrap(),
            "https://ollama.internal"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:11434").unwrap(),
            "http://127.0.0.1:11434"
        );
    }

    #[test]
    fn normalize_rejects_other_schemes() {
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(OllamaError::InvalidBaseUrl { .. })
        ));
    }

    // ==================== Reply parsing ====================

    #[test]
    fn chat_error_status_is_model_execution() {
        let err = parse_chat_reply(
            StatusCode::NOT_FOUND,
            br#"{"error":"model \"llama9\" not found, try pulling it first"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            BackendError::ModelExecution(
                "model \"llama9\" not found, try pulling it first".to_string()
            )
        );
    }

    #[test]
    fn chat_error_field_in_ok_body_is_model_execution() {
        let err = parse_chat_reply(StatusCode::OK, br#"{"error":"llama runner terminated"}"#)
            .unwrap_err();
        assert!(matches!(err, BackendError::ModelExecution(_)));
    }

    #[test]
    fn chat_garbage_is_protocol_error() {
        let err = parse_chat_reply(StatusCode::OK, b"<html>proxy</html>").unwrap_err();
        assert!(matches!(err, BackendError::Protocol(_)));

        let err = parse_chat_reply(StatusCode::BAD_GATEWAY, b"upstream down").unwrap_err();
        assert!(matches!(err, BackendError::Protocol(_)));
    }

    #[test]
    fn tags_non_success_is_protocol_error() {
        let err = parse_tags(StatusCode::INTERNAL_SERVER_ERROR, b"oops").unwrap_err();
        match err {
            BackendError::Protocol(msg) => assert!(msg.contains("/api/tags")),
            other => panic!("Expected Protocol, got {:?}", other),
        }
    }

    // ==================== Over the wire ====================

    #[tokio::test]
    async fn list_models_over_http() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"models":[{"name":"llama3:latest","size":1},{"name":"mistral:7b"}]}"#,
        )
        .await;
        let backend = backend_at(&base_url);

        let models = backend.list_models().await.unwrap();
        let ids: Vec<_> = models.iter().map(|m| m.as_str()).collect();
        assert_eq!(ids, vec!["llama3:latest", "mistral:7b"]);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/tags "));
    }

    #[tokio::test]
    async fn chat_completion_over_http() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"model":"llama3","message":{"role":"assistant","content":"4"},"done":true}"#,
        )
        .await;
        let backend = backend_at(&base_url);
        let model: Model = "llama3".parse().unwrap();

        let text = backend
            .chat_completion(&model, "What is 2+2? Give a concise answer.", deadline_in(5))
            .await
            .unwrap();
        assert_eq!(text, "4");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/chat "));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["model"], "llama3");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(
            json["messages"][0]["content"],
            "What is 2+2? Give a concise answer."
        );
    }

    #[tokio::test]
    async fn chat_model_not_found_over_http() {
        let (base_url, _server) =
            serve_once("404 Not Found", r#"{"error":"model 'ghost' not found"}"#).await;
        let backend = backend_at(&base_url);
        let model: Model = "ghost".parse().unwrap();

        let err = backend
            .chat_completion(&model, "hi", deadline_in(5))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BackendError::ModelExecution("model 'ghost' not found".to_string())
        );
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (base_url, _server) = serve_once("200 OK", r#"{"version":"0.1.48"}"#).await;
        let backend = backend_at(&base_url);

        let health = backend.health().await.unwrap();
        assert_eq!(health.version.as_deref(), Some("0.1.48"));
        assert_eq!(health.endpoint, base_url);
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let backend = backend_at(&format!("http://{}", addr));

        let err = backend.list_models().await.unwrap_err();
        assert!(matches!(err, BackendError::Unreachable(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn silent_server_hits_deadline() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let _server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut stream).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        });
        let backend = backend_at(&base_url);
        let model: Model = "llama3".parse().unwrap();

        let started = std::time::Instant::now();
        let err = backend
            .chat_completion(&model, "hi", Instant::now() + Duration::from_millis(300))
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::Timeout);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn past_deadline_fails_without_request() {
        let backend = backend_at("http://127.0.0.1:9");
        let model: Model = "llama3".parse().unwrap();
        let err = backend
            .chat_completion(&model, "hi", Instant::now())
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::Timeout);
    }
}
