// file: src/llm/client.rs
// description: Groq chat-completions gateway with ordered model failover
// reference: https://console.groq.com/docs/api-reference#chat-create

use crate::config::LlmConfig;
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// String-in/string-out text generation boundary.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Fails with [`PipelineError::Model`] once every backing model failed.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    #[serde(default)]
    content: Option<String>,
}

pub struct GroqChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    models: Vec<String>,
    temperature: f32,
    max_tokens: u32,
}

impl GroqChatClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                PipelineError::Config(
                    "no API key: set llm.api_key or GROQ_API_KEY".to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            models: config
                .models
                .iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    async fn complete(&self, model: &str, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt.trim(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt.trim(),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            "Requesting completion from {} for {} prompt chars",
            model,
            user_prompt.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Model(format!(
                "{} returned status {}: {}",
                model, status, error_text
            )));
        }

        let completion: ChatResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| PipelineError::Model(format!("{} returned empty content", model)))
    }
}

#[async_trait]
impl ModelGateway for GroqChatClient {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let mut last_error = None;

        for model in &self.models {
            match self.complete(model, system_prompt, user_prompt).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    warn!("Model {} failed, trying next candidate: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        Err(PipelineError::Model(match last_error {
            Some(e) => format!("all {} models failed; last error: {}", self.models.len(), e),
            None => "no models configured".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn llm_config(base_url: &str, models: &[&str]) -> LlmConfig {
        let mut config = Config::default_config().llm;
        config.base_url = base_url.to_string();
        config.api_key = Some("test_key".to_string());
        config.models = models.iter().map(|m| m.to_string()).collect();
        config.timeout_secs = 5;
        config
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test_key"))
            .and(body_partial_json(json!({
                "model": "primary",
                "messages": [
                    {"role": "system", "content": "You structure topics."},
                    {"role": "user", "content": "resume"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("{\"topics\": []}")))
            .expect(1)
            .mount(&server)
            .await;

        let client = GroqChatClient::new(&llm_config(&server.uri(), &["primary"])).unwrap();
        let text = client
            .generate("You structure topics.", "  resume  ")
            .await
            .unwrap();

        assert_eq!(text, "{\"topics\": []}");
    }

    #[tokio::test]
    async fn test_generate_fails_over_to_next_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"model": "flaky"})))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"model": "steady"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            GroqChatClient::new(&llm_config(&server.uri(), &["flaky", "steady"])).unwrap();

        assert_eq!(client.generate("sys", "user").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_generate_exhausts_all_models() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
            .expect(2)
            .mount(&server)
            .await;

        let client = GroqChatClient::new(&llm_config(&server.uri(), &["a", "b"])).unwrap();
        let err = client.generate("sys", "user").await.unwrap_err();

        assert!(matches!(err, PipelineError::Model(_)));
        assert!(err.to_string().contains("all 2 models failed"));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let mut config = llm_config("http://localhost", &["a"]);
        config.api_key = None;

        assert!(matches!(
            GroqChatClient::new(&config),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_blank_models_are_dropped() {
        let client =
            GroqChatClient::new(&llm_config("http://localhost/v1/", &[" a ", ""])).unwrap();

        assert_eq!(client.models(), &["a".to_string()]);
        assert_eq!(client.endpoint, "http://localhost/v1/chat/completions");
    }
}
