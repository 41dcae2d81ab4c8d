//! Session gateway use case.
//!
//! The single orchestration point for a user-initiated completion:
//!
//! 1. Validate the request (no backend I/O on invalid input)
//! 2. Fetch the catalog through [`ModelCatalogCache`] (TTL-bounded)
//! 3. Resolve the model id against the snapshot, failing fast if absent
//! 4. Append the style instruction to the prompt
//! 5. Dispatch under a hard deadline, with optional caller cancellation
//! 6. Classify the outcome
//!
//! No retries: the caller decides whether to resubmit, guided by
//! [`ErrorKind::is_retryable`].

use crate::catalog::{CatalogError, ModelCatalogCache};
use crate::config::GatewayParams;
use crate::ports::completion_logger::{CompletionEvent, CompletionLogger, NoCompletionLogger};
use crate::ports::model_backend::{BackendError, BackendHealth, ModelBackend};
use crate::ports::submit_progress::{NoSubmitProgress, SubmitProgress};
use llmgate_domain::util::preview;
use llmgate_domain::{
    CatalogView, Completion, CompletionRequest, DomainError, ErrorKind, RequestPhase,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Deadline cap for timeouts too large to add to an `Instant` (about 30 years).
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Classified failure of a submitted request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    #[error("Model catalog unavailable: {0}")]
    CatalogUnavailable(BackendError),

    #[error("Model '{requested}' not found ({})", describe_known(.known))]
    ModelNotFound {
        requested: String,
        known: Vec<String>,
    },

    #[error("Backend unreachable: {0}")]
    BackendUnreachable(String),

    #[error("Backend protocol error: {0}")]
    BackendProtocol(String),

    #[error("Model execution failed: {0}")]
    ModelExecution(String),

    #[error("No response within {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,
}

fn describe_known(known: &[String]) -> String {
    if known.is_empty() {
        "the catalog is empty".to_string()
    } else {
        format!("available: {}", known.join(", "))
    }
}

impl SubmitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmitError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            SubmitError::CatalogUnavailable(_) => ErrorKind::CatalogUnavailable,
            SubmitError::ModelNotFound { .. } => ErrorKind::ModelNotFound,
            SubmitError::BackendUnreachable(_) => ErrorKind::BackendUnreachable,
            SubmitError::BackendProtocol(_) => ErrorKind::BackendProtocol,
            SubmitError::ModelExecution(_) => ErrorKind::ModelExecution,
            SubmitError::Timeout(_) => ErrorKind::Timeout,
            SubmitError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Map a chat failure; `timeout` is what the caller asked for.
    fn from_chat(error: BackendError, timeout: Duration) -> Self {
        match error {
            BackendError::Unreachable(msg) => SubmitError::BackendUnreachable(msg),
            BackendError::Protocol(msg) => SubmitError::BackendProtocol(msg),
            BackendError::ModelExecution(msg) => SubmitError::ModelExecution(msg),
            BackendError::Timeout => SubmitError::Timeout(timeout),
        }
    }
}

impl From<CatalogError> for SubmitError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::Unavailable(e) => SubmitError::CatalogUnavailable(e),
        }
    }
}

/// Gateway between the presentation layer and the model backend.
pub struct SessionGateway {
    backend: Arc<dyn ModelBackend>,
    catalog: ModelCatalogCache,
    params: GatewayParams,
    logger: Arc<dyn CompletionLogger>,
}

impl Clone for SessionGateway {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            catalog: self.catalog.clone(),
            params: self.params.clone(),
            logger: self.logger.clone(),
        }
    }
}

impl SessionGateway {
    pub fn new(backend: Arc<dyn ModelBackend>, params: GatewayParams) -> Self {
        let catalog = ModelCatalogCache::new(backend.clone());
        Self::with_catalog(backend, catalog, params)
    }

    /// Create a gateway over an existing catalog (shared with other gateways
    /// or a background refresher).
    pub fn with_catalog(
        backend: Arc<dyn ModelBackend>,
        catalog: ModelCatalogCache,
        params: GatewayParams,
    ) -> Self {
        Self {
            backend,
            catalog,
            params,
            logger: Arc::new(NoCompletionLogger),
        }
    }

    /// Create with a completion transcript logger.
    pub fn with_completion_logger(mut self, logger: Arc<dyn CompletionLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn catalog(&self) -> &ModelCatalogCache {
        &self.catalog
    }

    pub fn params(&self) -> &GatewayParams {
        &self.params
    }

    /// Models currently available, at most `catalog_ttl` old (or stale if
    /// the backend is down).
    pub async fn list_available_models(&self) -> Result<CatalogView, CatalogError> {
        self.catalog.get_models(self.params.catalog_ttl).await
    }

    /// Re-list models now, bypassing the TTL.
    pub async fn refresh_models(&self) -> Result<CatalogView, CatalogError> {
        self.catalog.force_refresh().await
    }

    pub async fn health(&self) -> Result<BackendHealth, BackendError> {
        self.backend.health().await
    }

    /// Submit raw user input.
    ///
    /// Invalid input (empty prompt or model id, unknown style, zero timeout)
    /// fails with [`SubmitError::InvalidRequest`] before any backend call.
    pub async fn submit(
        &self,
        model_id: &str,
        prompt_text: &str,
        style: Option<&str>,
        timeout: Duration,
    ) -> Result<Completion, SubmitError> {
        self.submit_with(
            model_id,
            prompt_text,
            style,
            timeout,
            &NoSubmitProgress,
            &CancellationToken::new(),
        )
        .await
    }

    /// [`submit`](Self::submit) with phase reporting and caller cancellation.
    pub async fn submit_with(
        &self,
        model_id: &str,
        prompt_text: &str,
        style: Option<&str>,
        timeout: Duration,
        progress: &dyn SubmitProgress,
        cancellation: &CancellationToken,
    ) -> Result<Completion, SubmitError> {
        let request = match CompletionRequest::parse(model_id, prompt_text, style, timeout) {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejected request for '{}': {}", model_id, e);
                let error = SubmitError::from(e);
                progress.on_phase(RequestPhase::Failed);
                self.record_rejection(model_id, prompt_text, &error);
                return Err(error);
            }
        };
        self.submit_request_with(request, progress, cancellation).await
    }

    /// Submit an already-validated request.
    pub async fn submit_request(
        &self,
        request: CompletionRequest,
    ) -> Result<Completion, SubmitError> {
        self.submit_request_with(request, &NoSubmitProgress, &CancellationToken::new())
            .await
    }

    /// Submit with phase reporting and caller cancellation.
    ///
    /// Cancelling `cancellation` drops the outstanding backend call and
    /// yields [`SubmitError::Cancelled`].
    pub async fn submit_request_with(
        &self,
        request: CompletionRequest,
        progress: &dyn SubmitProgress,
        cancellation: &CancellationToken,
    ) -> Result<Completion, SubmitError> {
        progress.on_phase(RequestPhase::Received);
        progress.on_phase(RequestPhase::Validated);

        let result = self.dispatch(&request, progress, cancellation).await;

        match &result {
            Ok(completion) => {
                info!(
                    "Completion from {} in {:.2}s ({} bytes)",
                    completion.model,
                    completion.elapsed.as_secs_f64(),
                    completion.text.len()
                );
                progress.on_phase(RequestPhase::Completed);
            }
            Err(e) => {
                warn!("Request to '{}' failed: {}", request.model_id(), e);
                progress.on_phase(RequestPhase::Failed);
            }
        }
        self.record(&request, &result);
        result
    }

    async fn dispatch(
        &self,
        request: &CompletionRequest,
        progress: &dyn SubmitProgress,
        cancellation: &CancellationToken,
    ) -> Result<Completion, SubmitError> {
        debug!(
            "Submitting to '{}': {}",
            request.model_id(),
            preview(request.prompt().content(), 80)
        );

        let view = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Err(SubmitError::Cancelled),
            view = self.catalog.get_models(self.params.catalog_ttl) => view?,
        };
        if let Some(reason) = view.stale_reason() {
            debug!("Resolving against stale catalog ({})", reason);
        }

        let model = view
            .snapshot()
            .resolve(request.model_id())
            .cloned()
            .ok_or_else(|| SubmitError::ModelNotFound {
                requested: request.model_id().to_string(),
                known: view.snapshot().model_ids(),
            })?;
        progress.on_phase(RequestPhase::CatalogChecked);

        let prompt = request.composed_prompt();
        let started = Instant::now();
        let deadline = started
            .checked_add(request.timeout())
            .unwrap_or_else(|| started + FAR_FUTURE);
        progress.on_phase(RequestPhase::Dispatched);

        // Dropping the backend future on timeout or cancellation abandons the
        // call; a late reply is never observed.
        let call = tokio::time::timeout_at(
            deadline,
            self.backend.chat_completion(&model, &prompt, deadline),
        );
        let text = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("Request to '{}' cancelled by caller", model);
                return Err(SubmitError::Cancelled);
            }
            outcome = call => match outcome {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => return Err(SubmitError::from_chat(e, request.timeout())),
                Err(_elapsed) => return Err(SubmitError::Timeout(request.timeout())),
            },
        };

        Ok(Completion {
            model,
            style: request.style(),
            text,
            elapsed: started.elapsed(),
        })
    }

    fn record(&self, request: &CompletionRequest, result: &Result<Completion, SubmitError>) {
        let event = match result {
            Ok(completion) => CompletionEvent::new(
                "completion",
                serde_json::json!({
                    "model": completion.model.as_str(),
                    "style": completion.style.map(|s| s.as_str()),
                    "prompt": request.prompt().content(),
                    "elapsed_ms": completion.elapsed.as_millis() as u64,
                    "text": completion.text,
                }),
            ),
            Err(e) => CompletionEvent::new(
                "completion_failed",
                serde_json::json!({
                    "model": request.model_id(),
                    "style": request.style().map(|s| s.as_str()),
                    "prompt": request.prompt().content(),
                    "kind": e.kind().as_str(),
                    "message": e.to_string(),
                }),
            ),
        };
        self.logger.log(event);
    }

    fn record_rejection(&self, model_id: &str, prompt_text: &str, error: &SubmitError) {
        self.logger.log(CompletionEvent::new(
            "completion_failed",
            serde_json::json!({
                "model": model_id,
                "prompt": prompt_text,
                "kind": error.kind().as_str(),
                "message": error.to_string(),
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ChatReply, FakeBackend, models};
    use std::sync::Mutex;

    const FIVE_SECS: Duration = Duration::from_secs(5);

    fn gateway_over(backend: &Arc<FakeBackend>) -> SessionGateway {
        SessionGateway::new(
            Arc::clone(backend) as Arc<dyn ModelBackend>,
            GatewayParams::default(),
        )
    }

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<RequestPhase>>,
    }

    impl SubmitProgress for RecordingProgress {
        fn on_phase(&self, phase: RequestPhase) {
            self.phases.lock().unwrap().push(phase);
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<(&'static str, serde_json::Value)>>,
    }

    impl CompletionLogger for RecordingLogger {
        fn log(&self, event: CompletionEvent) {
            self.events
                .lock()
                .unwrap()
                .push((event.event_type, event.payload));
        }
    }

    #[tokio::test]
    async fn test_concise_answer_scenario() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        backend.set_reply(ChatReply::Text("4".to_string()));
        let gateway = gateway_over(&backend);

        let completion = gateway
            .submit("llama3", "What is 2+2?", Some("concise"), FIVE_SECS)
            .await
            .unwrap();

        assert_eq!(completion.text, "4");
        assert_eq!(completion.model.as_str(), "llama3");
        assert_eq!(
            backend.last_chat(),
            Some((
                "llama3".to_string(),
                "What is 2+2? Give a concise answer.".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_empty_prompt_never_reaches_backend() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        let gateway = gateway_over(&backend);

        let err = gateway.submit("llama3", "", None, FIVE_SECS).await.unwrap_err();

        assert_eq!(err, SubmitError::InvalidRequest(DomainError::EmptyPrompt));
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert_eq!(backend.list_calls(), 0);
        assert_eq!(backend.chat_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_style_is_invalid_request() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        let gateway = gateway_over(&backend);

        let err = gateway
            .submit("llama3", "hello", Some("rambling"), FIVE_SECS)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(!err.is_retryable());
        assert_eq!(backend.chat_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_model_fails_fast() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3", "mistral"]));
        let gateway = gateway_over(&backend);

        let err = gateway
            .submit("nonexistent-model", "hello", None, FIVE_SECS)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SubmitError::ModelNotFound {
                requested: "nonexistent-model".to_string(),
                known: vec!["llama3".to_string(), "mistral".to_string()],
            }
        );
        assert_eq!(
            err.to_string(),
            "Model 'nonexistent-model' not found (available: llama3, mistral)"
        );
        assert_eq!(backend.chat_calls(), 0);
    }

    #[tokio::test]
    async fn test_untagged_id_dispatches_latest_tag() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3:latest", "mistral:7b"]));
        let gateway = gateway_over(&backend);

        let completion = gateway
            .submit("llama3", "hi", None, FIVE_SECS)
            .await
            .unwrap();

        assert_eq!(completion.model.as_str(), "llama3:latest");
        assert_eq!(backend.last_chat().unwrap().0, "llama3:latest");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_times_out_and_late_reply_is_discarded() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        backend.set_reply(ChatReply::Slow(Duration::from_secs(10), "late".to_string()));
        let gateway = gateway_over(&backend);

        let err = gateway
            .submit("llama3", "hello", None, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, SubmitError::Timeout(Duration::from_secs(1)));
        assert!(err.is_retryable());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.chat_calls(), 1);
        assert_eq!(backend.chat_finished(), 0);
    }

    #[tokio::test]
    async fn test_backend_timeout_error_is_classified_as_timeout() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        backend.set_reply(ChatReply::Fail(BackendError::Timeout));
        let gateway = gateway_over(&backend);

        let err = gateway.submit("llama3", "hi", None, FIVE_SECS).await.unwrap_err();
        assert_eq!(err, SubmitError::Timeout(FIVE_SECS));
    }

    #[tokio::test]
    async fn test_backend_failures_are_classified() {
        let cases = [
            (
                BackendError::Unreachable("refused".to_string()),
                ErrorKind::BackendUnreachable,
            ),
            (
                BackendError::ModelExecution("out of memory".to_string()),
                ErrorKind::ModelExecution,
            ),
            (
                BackendError::Protocol("missing content".to_string()),
                ErrorKind::BackendProtocol,
            ),
        ];

        for (failure, expected) in cases {
            let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
            backend.set_reply(ChatReply::Fail(failure));
            let gateway = gateway_over(&backend);

            let err = gateway.submit("llama3", "hi", None, FIVE_SECS).await.unwrap_err();
            assert_eq!(err.kind(), expected);
            assert_eq!(backend.chat_calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_model_execution_message_is_verbatim() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        backend.set_reply(ChatReply::Fail(BackendError::ModelExecution(
            "model requires more system memory".to_string(),
        )));
        let gateway = gateway_over(&backend);

        let err = gateway.submit("llama3", "hi", None, FIVE_SECS).await.unwrap_err();
        assert_eq!(
            err,
            SubmitError::ModelExecution("model requires more system memory".to_string())
        );
    }

    #[tokio::test]
    async fn test_catalog_failure_is_catalog_unavailable() {
        let backend = Arc::new(FakeBackend::failing(BackendError::Unreachable(
            "connection refused".to_string(),
        )));
        let gateway = gateway_over(&backend);

        let err = gateway.submit("llama3", "hi", None, FIVE_SECS).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CatalogUnavailable);
        assert_eq!(backend.chat_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_catalog_still_serves_requests() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        let gateway = gateway_over(&backend);
        gateway.list_available_models().await.unwrap();

        backend.set_listing(Err(BackendError::Unreachable("blip".to_string())));
        tokio::time::advance(Duration::from_secs(120)).await;

        let completion = gateway.submit("llama3", "hi", None, FIVE_SECS).await.unwrap();
        assert_eq!(completion.text, "ok");
        assert_eq!(backend.list_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_drops_backend_call() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        backend.set_reply(ChatReply::Slow(Duration::from_secs(10), "late".to_string()));
        let gateway = gateway_over(&backend);
        let token = CancellationToken::new();

        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                token.cancel();
            })
        };

        let request = CompletionRequest::parse("llama3", "hi", None, Duration::from_secs(60))
            .unwrap();
        let err = gateway
            .submit_request_with(request, &NoSubmitProgress, &token)
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert_eq!(err, SubmitError::Cancelled);
        assert!(!err.is_retryable());
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.chat_finished(), 0);
    }

    #[tokio::test]
    async fn test_lifecycle_phases_reported() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        let gateway = gateway_over(&backend);
        let progress = RecordingProgress::default();

        let request = CompletionRequest::parse("llama3", "hi", None, FIVE_SECS).unwrap();
        gateway
            .submit_request_with(request, &progress, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            *progress.phases.lock().unwrap(),
            vec![
                RequestPhase::Received,
                RequestPhase::Validated,
                RequestPhase::CatalogChecked,
                RequestPhase::Dispatched,
                RequestPhase::Completed,
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_lifecycle_stops_before_dispatch() {
        let backend = Arc::new(FakeBackend::with_models(&["mistral"]));
        let gateway = gateway_over(&backend);
        let progress = RecordingProgress::default();

        let request = CompletionRequest::parse("llama3", "hi", None, FIVE_SECS).unwrap();
        let result = gateway
            .submit_request_with(request, &progress, &CancellationToken::new())
            .await;

        assert!(result.is_err());
        assert_eq!(
            *progress.phases.lock().unwrap(),
            vec![
                RequestPhase::Received,
                RequestPhase::Validated,
                RequestPhase::Failed,
            ]
        );
    }

    #[tokio::test]
    async fn test_rejected_input_reports_failed_only() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        let gateway = gateway_over(&backend);
        let progress = RecordingProgress::default();

        let err = gateway
            .submit_with("llama3", "", None, FIVE_SECS, &progress, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert_eq!(*progress.phases.lock().unwrap(), vec![RequestPhase::Failed]);
        assert_eq!(backend.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_transcript_records_outcomes() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        backend.set_reply(ChatReply::Text("4".to_string()));
        let logger = Arc::new(RecordingLogger::default());
        let gateway = gateway_over(&backend).with_completion_logger(logger.clone());

        gateway
            .submit("llama3", "What is 2+2?", Some("concise"), FIVE_SECS)
            .await
            .unwrap();
        let _ = gateway.submit("llama3", "  ", None, FIVE_SECS).await;

        let events = logger.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, "completion");
        assert_eq!(events[0].1["text"], "4");
        assert_eq!(events[0].1["style"], "concise");
        assert_eq!(events[1].0, "completion_failed");
        assert_eq!(events[1].1["kind"], "invalid_request");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_submits_share_catalog_refresh() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        backend.set_list_delay(Duration::from_millis(50));
        let gateway = gateway_over(&backend);

        let submits = (0..5).map(|i| {
            let gateway = gateway.clone();
            async move {
                gateway
                    .submit("llama3", &format!("question {}", i), None, FIVE_SECS)
                    .await
            }
        });
        let results = futures::future::join_all(submits).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(backend.list_calls(), 1);
        assert_eq!(backend.chat_calls(), 5);
    }

    #[tokio::test]
    async fn test_listing_and_health_passthrough() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3", "mistral"]));
        backend.set_listing(Ok(models(&["llama3", "mistral"])));
        let gateway = gateway_over(&backend);

        let view = gateway.list_available_models().await.unwrap();
        assert_eq!(view.snapshot().model_ids(), vec!["llama3", "mistral"]);

        let health = gateway.health().await.unwrap();
        assert_eq!(health.version.as_deref(), Some("0.0.0"));
    }

    #[tokio::test]
    async fn test_huge_timeout_is_capped_not_overflowed() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        backend.set_reply(ChatReply::Text("ok".to_string()));
        let gateway = gateway_over(&backend);

        let completion = gateway
            .submit("llama3", "hi", None, Duration::from_secs(u64::MAX))
            .await
            .unwrap();
        assert_eq!(completion.text, "ok");
    }

    #[tokio::test]
    async fn test_validated_request_dispatches() {
        let backend = Arc::new(FakeBackend::with_models(&["llama3"]));
        backend.set_reply(ChatReply::Text("Paris".to_string()));
        let gateway = gateway_over(&backend);

        let request = CompletionRequest::parse(
            "llama3",
            "Capital of France?",
            Some("concise"),
            FIVE_SECS,
        )
        .unwrap();
        let completion = gateway.submit_request(request).await.unwrap();

        assert_eq!(completion.text, "Paris");
        assert_eq!(
            backend.last_chat(),
            Some((
                "llama3".to_string(),
                "Capital of France? Give a concise answer.".to_string()
            ))
        );
        assert_eq!(backend.list_calls(), 1);
    }
}
