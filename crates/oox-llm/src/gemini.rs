//! Gemini Provider Implementation
//!
//! Provides integration with Google's Generative Language API
//! (`models/{model}:generateContent`).
//!
//! # Features
//!
//! - Async HTTP communication with the Gemini REST API
//! - Configurable endpoint, model and API key
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use oox_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new(
//!     "https://generativelanguage.googleapis.com",
//!     "gemini-2.5-flash",
//!     "my-api-key",
//! )
//! .unwrap();
//! ```

use crate::LlmError;
use oox_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Upper bound for any single backoff delay
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Gemini API provider
#[derive(Clone)]
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
    backoff_base: Duration,
}

/// Request body for generateContent
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response from generateContent (only the fields we read)
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider with the default timeout
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Configuration`] if the API key is empty or the
    /// HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Gemini provider with an explicit per-request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Configuration("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: Duration::from_secs(1),
        })
    }

    /// Set the maximum number of attempts (at least one is always made)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the first backoff delay; later delays double it
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Model name requests are sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }

    /// Generate text using the Gemini API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The model does not exist (HTTP 404, not retried)
    /// - The quota is exhausted (HTTP 429, not retried)
    /// - Network communication keeps failing after all attempts
    /// - The response carries no candidate text
    pub async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        let url = self.url();
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            debug!(model = %self.model, attempt = attempts + 1, "Calling generateContent");

            match self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response
                            .json::<GenerateContentResponse>()
                            .await
                            .map_err(|e| {
                                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                            })?;
                        return parsed.into_text().ok_or_else(|| {
                            LlmError::InvalidResponse("Response contained no text".to_string())
                        });
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        return Err(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: base, 2*base, 4*base, ...
                let delay = backoff_delay(self.backoff_base, attempts);
                warn!(attempt = attempts, ?delay, "generateContent failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

/// Delay after the `attempt`-th failure: `base * 2^(attempt - 1)`, capped at [`MAX_BACKOFF`]
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    2u32.checked_pow(attempt.saturating_sub(1))
        .map_or(MAX_BACKOFF, |factor| base.saturating_mul(factor))
        .min(MAX_BACKOFF)
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl LlmProviderTrait for GeminiProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.generate_text(prompt).await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serve `router` on an ephemeral port and return its base URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider(endpoint: &str) -> GeminiProvider {
        GeminiProvider::new(endpoint, "test-model", "secret")
            .unwrap()
            .with_backoff_base(Duration::from_millis(5))
    }

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, "key").unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), DEFAULT_MODEL);
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(
            provider.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = GeminiProvider::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, "  ");
        assert!(matches!(result, Err(LlmError::Configuration(_))));
    }

    #[test]
    fn test_with_max_retries_floor() {
        let provider = provider("http://localhost").with_max_retries(0);
        assert_eq!(provider.max_retries, 1);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let rendered = format!("{:?}", provider("http://localhost"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "# Title\n"}, {"text": "Hi"}]}}]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "# Title\nHi");

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_text().is_none());
    }

    #[tokio::test]
    async fn test_generate_success_sends_key_and_prompt() {
        let router = Router::new().route(
            "/v1beta/models/test-model:generateContent",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-goog-api-key"], "secret");
                let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or("");
                Json(json!({
                    "candidates": [{"content": {"parts": [{"text": format!("echo: {}", prompt)}]}}]
                }))
            }),
        );
        let endpoint = serve(router).await;

        let text = provider(&endpoint).generate("hello").await.unwrap();
        assert_eq!(text, "echo: hello");
    }

    #[tokio::test]
    async fn test_not_found_maps_to_model_not_available() {
        let endpoint = serve(Router::new()).await;
        let result = provider(&endpoint).generate_text("hello").await;
        assert!(matches!(result, Err(LlmError::ModelNotAvailable(m)) if m == "test-model"));
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/v1beta/models/test-model:generateContent",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    StatusCode::TOO_MANY_REQUESTS
                }),
            )
            .with_state(hits.clone());
        let endpoint = serve(router).await;

        let result = provider(&endpoint).generate_text("hello").await;
        assert!(matches!(result, Err(LlmError::RateLimitExceeded)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_errors_retry_then_succeed() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/v1beta/models/test-model:generateContent",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    if hits.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(StatusCode::SERVICE_UNAVAILABLE)
                    } else {
                        Ok(Json(json!({
                            "candidates": [{"content": {"parts": [{"text": "third time"}]}}]
                        })))
                    }
                }),
            )
            .with_state(hits.clone());
        let endpoint = serve(router).await;

        let text = provider(&endpoint).generate_text("hello").await.unwrap();
        assert_eq!(text, "third time");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_backoff_delay_doubles_and_caps() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(400));
        assert_eq!(backoff_delay(base, 40), MAX_BACKOFF);
        assert_eq!(backoff_delay(Duration::ZERO, 40), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_many_retries_do_not_overflow() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/v1beta/models/test-model:generateContent",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    StatusCode::INTERNAL_SERVER_ERROR
                }),
            )
            .with_state(hits.clone());
        let endpoint = serve(router).await;

        let result = provider(&endpoint)
            .with_max_retries(40)
            .with_backoff_base(Duration::ZERO)
            .generate_text("hello")
            .await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 40);
    }

    #[tokio::test]
    async fn test_gemini_error_handling() {
        // Nothing listens on port 9 locally
        let result = provider("http://127.0.0.1:9")
            .with_max_retries(1)
            .generate_text("test")
            .await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
