//! OpenAI-compatible endpoint client
//!
//! Implements [`ModelClient`] against the `/v1/chat/completions` wire
//! shape, which most hosted and local endpoints (OpenAI, OpenRouter,
//! vLLM, Ollama's compat mode) speak. Tool availability is sent through
//! the native `tools` field and requested calls come back in
//! `message.tool_calls`, so no prompt-embedded calling convention is
//! needed.

use async_trait::async_trait;
use reqwest::Client;
use sdk::ToolDescriptor;
use serde_json::json;
use std::time::Duration;

use super::{EndpointError, Message, ModelClient, ModelReply, Result, ToolCallRequest};

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Client for OpenAI-compatible chat completion endpoints
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    /// Base URL without the `/v1/chat/completions` suffix
    base_url: String,

    /// Bearer token; omitted from the request when `None` (local endpoints)
    api_key: Option<String>,

    /// HTTP client for API requests
    client: Client,
}

impl OpenAiClient {
    /// Create a new client with the default request timeout
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_timeout(base_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new client with an explicit request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Convert our message projection to the wire format
    ///
    /// Assistant messages keep the tool calls they requested; the
    /// endpoint rejects a `tool` message whose call id has no matching
    /// request on the preceding assistant message.
    fn convert_messages(messages: &[Message]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .map(|msg| {
                let mut wire = json!({
                    "role": msg.role.to_string(),
                    "content": msg.content,
                });
                if let Some(ref id) = msg.tool_call_id {
                    wire["tool_call_id"] = json!(id);
                }
                if !msg.tool_calls.is_empty() {
                    // Arguments travel as JSON-encoded strings on this wire
                    let calls: Vec<_> = msg
                        .tool_calls
                        .iter()
                        .map(|call| {
                            json!({
                                "id": call.id,
                                "type": "function",
                                "function": {
                                    "name": call.name,
                                    "arguments": call.arguments.to_string(),
                                }
                            })
                        })
                        .collect();
                    wire["tool_calls"] = json!(calls);
                }
                wire
            })
            .collect()
    }

    /// Convert the tool catalog to the wire format
    fn convert_tools(tools: &[ToolDescriptor]) -> Vec<serde_json::Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.schema,
                    }
                })
            })
            .collect()
    }

    /// Pull the reply text and requested tool calls out of a response body
    fn parse_reply(data: &serde_json::Value) -> Result<ModelReply> {
        let message = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| EndpointError::Protocol("No message in response".to_string()))?;

        let text = message
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or_default()
            .to_string();

        let mut tool_calls = Vec::new();
        if let Some(calls) = message.get("tool_calls").and_then(|t| t.as_array()) {
            for call in calls {
                let id = call
                    .get("id")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| EndpointError::Protocol("Tool call without id".to_string()))?;
                let function = call.get("function").ok_or_else(|| {
                    EndpointError::Protocol("Tool call without function".to_string())
                })?;
                let name = function
                    .get("name")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| EndpointError::Protocol("Tool call without name".to_string()))?;

                // Arguments arrive as a JSON-encoded string on this
                // wire; some endpoints emit "" for no-arg tools.
                let arguments = match function.get("arguments").and_then(|v| v.as_str()) {
                    Some("") | None => serde_json::Value::Null,
                    Some(raw) => serde_json::from_str(raw).map_err(|e| {
                        EndpointError::Protocol(format!("Unparseable tool arguments: {e}"))
                    })?,
                };

                tool_calls.push(ToolCallRequest::new(id, name, arguments));
            }
        }

        Ok(ModelReply { text, tool_calls })
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn send(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<ModelReply> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut payload = json!({
            "model": model,
            "messages": Self::convert_messages(messages),
        });
        if !tools.is_empty() {
            payload["tools"] = json!(Self::convert_tools(tools));
        }

        tracing::debug!(
            "Endpoint request: model={}, messages={}, tools={}",
            model,
            messages.len(),
            tools.len()
        );

        let mut request = self.client.post(&url).json(&payload);
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let start = std::time::Instant::now();
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                EndpointError::Timeout
            } else if e.is_connect() {
                EndpointError::Unavailable(format!("Cannot connect to endpoint at {}", self.base_url))
            } else {
                EndpointError::Network(e.to_string())
            }
        })?;

        tracing::debug!(
            "Endpoint response received in {:.1}s",
            start.elapsed().as_secs_f64()
        );

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => EndpointError::Auth(text),
                429 => EndpointError::RateLimited,
                _ => EndpointError::Protocol(format!("Endpoint error ({status}): {text}")),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EndpointError::Protocol(e.to_string()))?;

        Self::parse_reply(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_final_answer() {
        let data = json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello!"}}]
        });
        let reply = OpenAiClient::parse_reply(&data).unwrap();
        assert_eq!(reply.text, "Hello!");
        assert!(reply.tool_calls.is_empty());
    }

    #[test]
    fn test_parse_reply_tool_calls_in_order() {
        let data = json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    {"id": "call_1", "function": {"name": "echo", "arguments": "{\"text\":\"a\"}"}},
                    {"id": "call_2", "function": {"name": "echo", "arguments": "{\"text\":\"b\"}"}}
                ]
            }}]
        });
        let reply = OpenAiClient::parse_reply(&data).unwrap();
        assert_eq!(reply.text, "");
        assert_eq!(reply.tool_calls.len(), 2);
        assert_eq!(reply.tool_calls[0].id, "call_1");
        assert_eq!(reply.tool_calls[1].arguments["text"], "b");
    }

    #[test]
    fn test_parse_reply_missing_message() {
        let data = json!({"choices": []});
        let err = OpenAiClient::parse_reply(&data).unwrap_err();
        assert!(matches!(err, EndpointError::Protocol(_)));
    }

    #[test]
    fn test_parse_reply_empty_arguments_string() {
        let data = json!({
            "choices": [{"message": {
                "content": null,
                "tool_calls": [
                    {"id": "call_1", "function": {"name": "ping", "arguments": ""}}
                ]
            }}]
        });
        let reply = OpenAiClient::parse_reply(&data).unwrap();
        assert_eq!(reply.tool_calls[0].arguments, serde_json::Value::Null);
    }

    #[test]
    fn test_parse_reply_bad_arguments() {
        let data = json!({
            "choices": [{"message": {
                "content": null,
                "tool_calls": [
                    {"id": "call_1", "function": {"name": "echo", "arguments": "not json"}}
                ]
            }}]
        });
        let err = OpenAiClient::parse_reply(&data).unwrap_err();
        assert!(matches!(err, EndpointError::Protocol(_)));
    }

    #[test]
    fn test_convert_messages_assistant_keeps_tool_calls() {
        let mut assistant = Message::assistant("");
        assistant.tool_calls.push(ToolCallRequest::new(
            "call_1",
            "echo",
            json!({"text": "x"}),
        ));
        let tool_result = Message::tool_result("x", "call_1");

        let wire = OpenAiClient::convert_messages(&[assistant, tool_result]);

        assert_eq!(wire[0]["tool_calls"][0]["id"], "call_1");
        assert_eq!(wire[0]["tool_calls"][0]["type"], "function");
        assert_eq!(
            wire[0]["tool_calls"][0]["function"]["arguments"],
            "{\"text\":\"x\"}"
        );
        assert_eq!(wire[1]["role"], "tool");
        assert_eq!(wire[1]["tool_call_id"], "call_1");
    }

    #[test]
    fn test_convert_tools_wire_shape() {
        let tools = vec![ToolDescriptor {
            name: "echo".to_string(),
            description: "Echo text back.".to_string(),
            schema: json!({"type": "object"}),
        }];
        let wire = OpenAiClient::convert_tools(&tools);
        assert_eq!(wire[0]["type"], "function");
        assert_eq!(wire[0]["function"]["name"], "echo");
        assert_eq!(wire[0]["function"]["parameters"]["type"], "object");
    }
}
