//! llama.cpp Provider Implementation
//!
//! Talks to a llama.cpp server through its OpenAI-compatible API
//! (`/v1/chat/completions`). The system instruction and the prompt are sent
//! as two chat messages.

use crate::{block_on, LlmError};
use digest_domain::{GenerationOptions, LlmProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Default API base URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/v1";

/// Default model identifier; llama.cpp usually serves a single model
pub const DEFAULT_MODEL: &str = "local-model";

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
const MODELS_TIMEOUT: Duration = Duration::from_secs(5);
const ERROR_DETAIL_CHARS: usize = 200;

/// llama.cpp server provider
#[derive(Debug, Clone)]
pub struct LlamaCppProvider {
    server_url: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Response from the models API
#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    #[serde(default)]
    id: Option<String>,
}

impl LlamaCppProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `server_url`: API base URL (e.g., "http://localhost:8080/v1")
    /// - `model`: Model identifier sent with each request
    pub fn new(server_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a provider for `http://localhost:8080/v1`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_SERVER_URL, model)
    }

    /// API base URL
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn base(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    /// llama.cpp's own health endpoint, outside the `/v1` prefix
    fn health_url(&self) -> String {
        format!("{}/health", self.base().replace("/v1", ""))
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base())
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base())
    }

    /// Generate text through the chat-completions API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the server cannot be reached (`Connection`) or answers too late (`Timeout`)
    /// - the server answers with a non-200 status
    /// - the response has no choices or is not JSON
    /// - the completion is blank
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = options.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request_body = ChatRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stream: false,
        };

        debug!("POST {} ({} chars of prompt)", self.chat_url(), prompt.len());

        let response = self
            .client
            .post(self.chat_url())
            .timeout(options.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if status != reqwest::StatusCode::OK {
            return Err(LlmError::Communication(format!(
                "API error {}: {}",
                status.as_u16(),
                error_detail(&body)
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::InvalidResponse(format!("Invalid JSON response from API: {}", e))
        })?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            LlmError::InvalidResponse("Unexpected API response format: missing 'choices'".to_string())
        })?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .unwrap_or_default()
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(content)
    }

    /// Probe `/health`, falling back to the OpenAI-compatible `/models`
    pub async fn probe(&self) -> Result<(), LlmError> {
        let unreachable = |e: reqwest::Error| {
            LlmError::Unavailable(format!("Server not reachable at {}: {}", self.server_url, e))
        };

        let health = self
            .client
            .get(self.health_url())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(unreachable)?;
        if health.status().is_success() {
            return Ok(());
        }

        debug!("Health endpoint answered {}, trying models endpoint", health.status());
        let models = self
            .client
            .get(self.models_url())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(unreachable)?;
        if models.status().is_success() {
            Ok(())
        } else {
            Err(LlmError::Unavailable(format!(
                "Server at {} answered {}",
                self.server_url,
                models.status()
            )))
        }
    }

    /// Model identifiers the server reports as loaded
    pub async fn loaded_models(&self) -> Result<Vec<String>, LlmError> {
        let response = self
            .client
            .get(self.models_url())
            .timeout(MODELS_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            return Err(LlmError::Communication(format!(
                "Models endpoint answered {}",
                response.status()
            )));
        }

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse model list: {}", e)))?;

        Ok(list
            .data
            .into_iter()
            .map(|m| m.id.unwrap_or_else(|| "unknown".to_string()))
            .collect())
    }

    fn request_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(format!("Request to {} timed out: {}", self.server_url, e))
        } else if e.is_connect() {
            LlmError::Connection(format!(
                "Connection failed to {}. Is llama.cpp server running? ({})",
                self.server_url, e
            ))
        } else {
            LlmError::Communication(format!("API request failed: {}", e))
        }
    }
}

impl Default for LlamaCppProvider {
    fn default() -> Self {
        Self::default_endpoint(DEFAULT_MODEL)
    }
}

impl LlmProvider for LlamaCppProvider {
    type Error = LlmError;

    fn name(&self) -> &str {
        "llama.cpp server"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn check_available(&self) -> Result<(), Self::Error> {
        info!("Checking llama.cpp server at {}", self.server_url);
        block_on(self.probe())?
    }

    fn list_models(&self) -> Result<Vec<String>, Self::Error> {
        block_on(self.loaded_models())?
    }

    fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String, Self::Error> {
        block_on(self.generate(prompt, options))?
    }

    fn setup_hint(&self) -> String {
        "Start llama.cpp server with: ./server -c 4096 --port 8080\n\
         Or download from: https://github.com/ggerganov/llama.cpp"
            .to_string()
    }
}

/// `error.message` from an OpenAI-style error body, else the raw body, capped
fn error_detail(body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    detail.chars().take(ERROR_DETAIL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer exactly one HTTP request with a canned response; yields the raw request
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });
        (format!("http://{}/v1", addr), handle)
    }

    fn read_request(stream: &mut std::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            if let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&data[..end]).to_lowercase();
                let length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    #[test]
    fn test_provider_creation() {
        let provider = LlamaCppProvider::default();
        assert_eq!(provider.server_url(), DEFAULT_SERVER_URL);
        assert_eq!(provider.model(), DEFAULT_MODEL);
        assert_eq!(provider.name(), "llama.cpp server");
    }

    #[test]
    fn test_endpoint_urls() {
        let provider = LlamaCppProvider::new("http://localhost:8080/v1/", "m");
        assert_eq!(provider.health_url(), "http://localhost:8080/health");
        assert_eq!(provider.models_url(), "http://localhost:8080/v1/models");
        assert_eq!(provider.chat_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_error_detail_prefers_error_message() {
        assert_eq!(
            error_detail(r#"{"error": {"message": "context too long"}}"#),
            "context too long"
        );
        assert_eq!(error_detail("plain failure"), "plain failure");
        assert_eq!(error_detail(&"x".repeat(500)).len(), 200);
    }

    #[test]
    fn test_complete_sends_chat_request() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"choices": [{"message": {"role": "assistant", "content": "  Your digest  "}}]}"#,
        );
        let provider = LlamaCppProvider::new(url, "local-model");
        let options = GenerationOptions::default().with_system_prompt("Be concise.");

        let result = provider.complete("Summarize my day", &options).unwrap();
        assert_eq!(result, "Your digest");

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.contains(r#""role":"system""#));
        assert!(request.contains("Be concise."));
        assert!(request.contains("Summarize my day"));
        assert!(request.contains(r#""max_tokens":1200"#));
        assert!(request.contains(r#""stream":false"#));
    }

    #[test]
    fn test_complete_reports_api_error() {
        let (url, server) = serve_once(
            "500 Internal Server Error",
            r#"{"error": {"message": "model crashed"}}"#,
        );
        let provider = LlamaCppProvider::new(url, "local-model");

        match provider.complete("hi", &GenerationOptions::default()) {
            Err(LlmError::Communication(msg)) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("model crashed"));
            }
            other => panic!("Expected Communication error, got {:?}", other),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_complete_rejects_missing_choices() {
        let (url, server) = serve_once("200 OK", r#"{"choices": []}"#);
        let provider = LlamaCppProvider::new(url, "local-model");

        let result = provider.complete("hi", &GenerationOptions::default());
        assert!(matches!(result.unwrap_err(), LlmError::InvalidResponse(_)));
        server.join().unwrap();
    }

    #[test]
    fn test_complete_rejects_blank_content() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"choices": [{"message": {"content": "   "}}]}"#,
        );
        let provider = LlamaCppProvider::new(url, "local-model");

        let result = provider.complete("hi", &GenerationOptions::default());
        assert!(matches!(result.unwrap_err(), LlmError::EmptyResponse));
        server.join().unwrap();
    }

    #[test]
    fn test_check_available_uses_health_endpoint() {
        let (url, server) = serve_once("200 OK", r#"{"status": "ok"}"#);
        let provider = LlamaCppProvider::new(url, "local-model");

        assert!(provider.check_available().is_ok());
        let request = server.join().unwrap();
        assert!(request.starts_with("GET /health"));
    }

    #[test]
    fn test_list_models() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"object": "list", "data": [{"id": "qwen2.5-7b-instruct"}]}"#,
        );
        let provider = LlamaCppProvider::new(url, "local-model");

        assert_eq!(provider.list_models().unwrap(), vec!["qwen2.5-7b-instruct"]);
        server.join().unwrap();
    }

    #[test]
    fn test_connection_refused() {
        // Reserve a port, then free it so nothing is listening there
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let provider = LlamaCppProvider::new(format!("http://127.0.0.1:{}/v1", port), "m");

        let err = provider
            .complete("hi", &GenerationOptions::default())
            .unwrap_err();
        assert!(matches!(err, LlmError::Connection(_)));
        assert!(err.is_timeout_or_connection());

        assert!(matches!(
            provider.check_available().unwrap_err(),
            LlmError::Unavailable(_)
        ));
    }
}
