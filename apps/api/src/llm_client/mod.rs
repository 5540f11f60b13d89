/// LLM Client: the single point of entry for all research-provider calls.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// All LLM interactions MUST go through `CompletionProvider`.
///
/// The wire format is the Perplexity chat-completions API (OpenAI-compatible
/// envelope plus web-search options). One attempt per request, no retries:
/// any failure is handed back to the caller, which falls back to the
/// illustrative report.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LlmConfig;

pub mod prompts;

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
pub const PROVIDER_NAME: &str = "perplexity";
/// Low temperature biases the model toward repeatable answers.
const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 4500;
/// Outlets the web search is restricted to.
const SEARCH_DOMAINS: &[&str] = &[
    "techcrunch.com",
    "crunchbase.com",
    "pitchbook.com",
    "bloomberg.com",
    "reuters.com",
    "wsj.com",
    "forbes.com",
    "venturebeat.com",
];
const SEARCH_RECENCY: &str = "month";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No API key configured for the research provider")]
    MissingApiKey,

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    return_citations: bool,
    search_domain_filter: &'a [&'a str],
    search_recency_filter: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Raw text returned by the provider, plus any citations it attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub citations: Vec<String>,
}

impl ChatResponse {
    /// Takes the first choice's content, rejecting missing or blank text.
    fn into_completion(self) -> Result<Completion, LlmError> {
        let text = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?;

        Ok(Completion {
            text,
            citations: self.citations,
        })
    }
}

/// The seam between the research pipeline and the hosted model.
///
/// Carried in `AppState` as `Arc<dyn CompletionProvider>`.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Whether a credential is configured. When false the pipeline skips the
    /// call entirely.
    fn is_configured(&self) -> bool;

    fn provider_name(&self) -> &str;

    fn model(&self) -> &str;

    /// Sends a `system` instruction followed by a `user` prompt and returns the
    /// assistant's text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<Completion, LlmError>;
}

/// HTTP client for the Perplexity chat-completions endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
    url: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let url = format!(
            "{}{CHAT_COMPLETIONS_PATH}",
            config.base_url.trim_end_matches('/')
        );

        Ok(Self {
            client,
            config,
            url,
        })
    }

    fn request_body<'a>(&'a self, system: &'a str, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            return_citations: true,
            search_domain_filter: SEARCH_DOMAINS,
            search_recency_filter: SEARCH_RECENCY,
        }
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<Completion, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)?;

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&self.request_body(system, prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout_secs)
                } else {
                    LlmError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}", status);
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}, citations={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                chat.citations.len()
            );
        }

        chat.into_completion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn serve_stub(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_at(base_url: String, timeout_secs: u64) -> LlmClient {
        LlmClient::new(LlmConfig {
            api_key: Some("test-key".to_string()),
            base_url,
            timeout_secs,
            ..LlmConfig::default()
        })
        .unwrap()
    }

    fn completions(handler: axum::routing::MethodRouter) -> Router {
        Router::new().route(CHAT_COMPLETIONS_PATH, handler)
    }

    fn client_with(api_key: Option<&str>) -> LlmClient {
        LlmClient::new(LlmConfig {
            api_key: api_key.map(str::to_string),
            base_url: "https://api.perplexity.ai/".to_string(),
            ..LlmConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_base_without_double_slash() {
        let client = client_with(Some("key"));
        assert_eq!(client.url, "https://api.perplexity.ai/chat/completions");
    }

    #[test]
    fn test_request_body_carries_fixed_parameters() {
        let client = client_with(Some("key"));
        let body = serde_json::to_value(client.request_body("sys", "user prompt")).unwrap();

        assert_eq!(body["model"], "sonar");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "sys");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "user prompt");
        assert!((body["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert_eq!(body["max_tokens"], 4500);
        assert_eq!(body["return_citations"], true);
        assert_eq!(body["search_recency_filter"], "month");
        assert_eq!(body["search_domain_filter"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_is_configured_follows_api_key() {
        assert!(client_with(Some("key")).is_configured());
        assert!(!client_with(None).is_configured());
    }

    #[tokio::test]
    async fn test_complete_without_key_is_configuration_error() {
        let client = client_with(None);
        let err = client.complete("sys", "prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[test]
    fn test_response_envelope_yields_content_and_citations() {
        let json = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Here: {\"a\": 1}"}}],
            "citations": ["https://techcrunch.com/x"],
            "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        let completion = response.into_completion().unwrap();
        assert_eq!(completion.text, "Here: {\"a\": 1}");
        assert_eq!(completion.citations, vec!["https://techcrunch.com/x"]);
    }

    #[test]
    fn test_blank_content_is_empty_response() {
        let json = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            response.into_completion(),
            Err(LlmError::EmptyContent)
        ));
    }

    #[test]
    fn test_no_choices_is_empty_response() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            response.into_completion(),
            Err(LlmError::EmptyContent)
        ));
    }

    #[tokio::test]
    async fn test_complete_sends_credential_and_reads_answer() {
        let router = completions(post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let content = format!("{auth} {}", body["model"]);
            Json(json!({
                "choices": [{"message": {"role": "assistant", "content": content}}],
                "citations": ["https://techcrunch.com/acme"]
            }))
        }));
        let client = client_at(serve_stub(router).await, 5);

        let completion = client.complete("sys", "prompt").await.unwrap();
        assert_eq!(completion.text, "Bearer test-key \"sonar\"");
        assert_eq!(completion.citations, vec!["https://techcrunch.com/acme"]);
    }

    #[tokio::test]
    async fn test_non_success_status_reads_error_envelope() {
        let router = completions(post(|| async {
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": {"message": "upstream overloaded"}})),
            )
        }));
        let client = client_at(serve_stub(router).await, 5);

        match client.complete("sys", "prompt").await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream overloaded");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept_verbatim() {
        let router = completions(post(|| async {
            (StatusCode::UNAUTHORIZED, "invalid api key")
        }));
        let client = client_at(serve_stub(router).await, 5);

        match client.complete("sys", "prompt").await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let router = completions(post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"choices": []}))
        }));
        let client = client_at(serve_stub(router).await, 1);

        let err = client.complete("sys", "prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout(1)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_blank_answer_over_http_is_empty_content() {
        let router = completions(post(|| async {
            Json(json!({"choices": [{"message": {"content": "  "}}]}))
        }));
        let client = client_at(serve_stub(router).await, 5);

        let err = client.complete("sys", "prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_at(format!("http://{addr}"), 5);

        let err = client.complete("sys", "prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)), "got {err:?}");
    }
}
