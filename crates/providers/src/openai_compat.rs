//! OpenAI-compatible provider implementation.
//!
//! Works with any endpoint exposing the `/chat/completions` and
//! `/embeddings` dialect: Gemini's OpenAI compatibility layer,
//! OpenRouter, Ollama, vLLM, and friends.
//!
//! Supports chat completions with tool use, plus embeddings for the
//! document retriever.

use async_trait::async_trait;
use reelclaw_core::error::ProviderError;
use reelclaw_core::message::{Message, MessageToolCall, Role};
use reelclaw_core::provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, ToolDefinition,
    Usage,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider with a bounded request
    /// timeout.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Gemini's OpenAI compatibility endpoint (convenience constructor).
    pub fn gemini(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Self::new(
            "gemini",
            "https://generativelanguage.googleapis.com/v1beta/openai",
            api_key,
            timeout,
        )
    }

    /// Ollama (convenience constructor; no real key needed).
    pub fn ollama(base_url: Option<&str>) -> Result<Self, ProviderError> {
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "ollama",
            Duration::from_secs(120),
        )
    }

    /// Convert our Message types to the wire format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                    Role::System => "system".into(),
                    Role::Tool => "tool".into(),
                },
                content: Some(m.content.clone()),
                tool_calls: if m.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        m.tool_calls
                            .iter()
                            .map(|tc| ApiToolCall {
                                id: tc.id.clone(),
                                r#type: "function".into(),
                                function: ApiFunction {
                                    name: tc.name.clone(),
                                    arguments: tc.arguments.clone(),
                                },
                            })
                            .collect(),
                    )
                },
                tool_call_id: m.tool_call_id.clone(),
            })
            .collect()
    }

    /// Convert tool definitions to the wire format.
    fn to_api_tools(tools: &[ToolDefinition]) -> Vec<ApiToolDefinition> {
        tools
            .iter()
            .map(|t| ApiToolDefinition {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }

    fn check_status(status: u16, body: String) -> Result<String, ProviderError> {
        match status {
            200 => Ok(body),
            429 => Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            }),
            401 | 403 => Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            )),
            _ => {
                warn!(status, body = %body, "Provider returned error");
                Err(ProviderError::ApiError {
                    status_code: status,
                    message: body,
                })
            }
        }
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<String, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(url.clone())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        Self::check_status(status, text)
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&request.tools));
        }

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let text = self.post_json("/chat/completions", &body).await?;

        let api_response: ApiResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 200,
                message: "No choices in response".into(),
            })?;

        let tool_calls: Vec<MessageToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| MessageToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            tool_call_id: None,
            timestamp: chrono::Utc::now(),
        };

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ProviderResponse {
            message,
            usage,
            model: api_response.model,
        })
    }

    async fn embed(
        &self,
        request: EmbeddingRequest,
    ) -> std::result::Result<EmbeddingResponse, ProviderError> {
        let body = serde_json::json!({
            "model": request.model,
            "input": request.inputs,
            "encoding_format": "float",
        });

        debug!(
            provider = %self.name,
            model = %request.model,
            count = request.inputs.len(),
            "Sending embedding request"
        );

        let text = self.post_json("/embeddings", &body).await?;

        let api_resp: EmbeddingApiResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse embedding response: {e}"),
            })?;

        Ok(EmbeddingResponse {
            embeddings: api_resp.data.into_iter().map(|d| d.embedding).collect(),
            model: api_resp.model,
        })
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    r#type: String,
    function: ApiFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolDefinition {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

// --- Embedding API types ---

#[derive(Debug, Deserialize)]
struct EmbeddingApiResponse {
    data: Vec<EmbeddingData>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiCompatProvider {
        OpenAiCompatProvider::new(
            "test",
            "https://llm.example.test/v1/",
            "sk-test",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn gemini_constructor() {
        let p = OpenAiCompatProvider::gemini("key", Duration::from_secs(5)).unwrap();
        assert_eq!(p.name(), "gemini");
        assert!(p.base_url.contains("generativelanguage.googleapis.com"));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let p = provider();
        assert_eq!(p.base_url, "https://llm.example.test/v1");
    }

    #[test]
    fn message_conversion() {
        let messages = vec![Message::system("You are a movie expert"), Message::user("Hi")];
        let api_messages = OpenAiCompatProvider::to_api_messages(&messages);
        assert_eq!(api_messages.len(), 2);
        assert_eq!(api_messages[0].role, "system");
        assert_eq!(api_messages[1].role, "user");
    }

    #[test]
    fn message_conversion_with_tool_calls() {
        let mut msg = Message::assistant("");
        msg.tool_calls = vec![MessageToolCall {
            id: "call_1".into(),
            name: "movie_info".into(),
            arguments: r#"{"title":"Alien"}"#.into(),
        }];
        let api_msgs = OpenAiCompatProvider::to_api_messages(&[msg]);
        let tc = api_msgs[0].tool_calls.as_ref().unwrap();
        assert_eq!(tc.len(), 1);
        assert_eq!(tc[0].function.name, "movie_info");
    }

    #[test]
    fn message_conversion_tool_response() {
        let msg = Message::tool_result("call_1", "{\"found\":true}");
        let api_msgs = OpenAiCompatProvider::to_api_messages(&[msg]);
        assert_eq!(api_msgs[0].role, "tool");
        assert_eq!(api_msgs[0].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn tool_definition_conversion() {
        let tools = vec![ToolDefinition {
            name: "movie_info".into(),
            description: "Look up a movie".into(),
            parameters: serde_json::json!({"type": "object"}),
        }];
        let api_tools = OpenAiCompatProvider::to_api_tools(&tools);
        assert_eq!(api_tools.len(), 1);
        assert_eq!(api_tools[0].function.name, "movie_info");
        assert_eq!(api_tools[0].r#type, "function");
    }

    #[test]
    fn status_handling() {
        assert!(OpenAiCompatProvider::check_status(200, "ok".into()).is_ok());
        assert!(matches!(
            OpenAiCompatProvider::check_status(429, String::new()),
            Err(ProviderError::RateLimited { .. })
        ));
        assert!(matches!(
            OpenAiCompatProvider::check_status(401, String::new()),
            Err(ProviderError::AuthenticationFailed(_))
        ));
        assert!(matches!(
            OpenAiCompatProvider::check_status(500, "boom".into()),
            Err(ProviderError::ApiError {
                status_code: 500,
                ..
            })
        ));
    }

    #[test]
    fn parse_completion_with_tool_call() {
        let data = r#"{
            "model": "gemini-2.5-flash",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "movie_info", "arguments": "{\"title\":\"Alien\"}"}
                    }]
                }
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 18, "total_tokens": 138}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let tc = parsed.choices[0].message.tool_calls.as_ref().unwrap();
        assert_eq!(tc[0].function.name, "movie_info");
        assert_eq!(parsed.usage.as_ref().unwrap().total_tokens, 138);
    }

    #[test]
    fn parse_embedding_response() {
        let data = r#"{
            "data": [
                {"embedding": [0.1, 0.2, 0.3], "index": 0},
                {"embedding": [0.4, 0.5, 0.6], "index": 1}
            ],
            "model": "text-embedding-004"
        }"#;
        let parsed: EmbeddingApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2, 0.3]);
        assert_eq!(parsed.model, "text-embedding-004");
    }
}
