//! Built-in echo tool
//!
//! Returns its `text` argument verbatim. Exists so the default CLI
//! registry and the end-to-end tests have a tool with no side effects.

use async_trait::async_trait;
use sdk::{Tool, ToolError};
use serde_json::json;

/// Tool that echoes its input back
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo the given text back unchanged."
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Text to echo back" }
            },
            "required": ["text"]
        })
    }

    async fn invoke(&self, args: serde_json::Value) -> Result<String, ToolError> {
        let text = args
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::MissingArgument("text".to_string()))?;
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_round_trip() {
        let out = EchoTool.invoke(json!({"text": "ping"})).await.unwrap();
        assert_eq!(out, "ping");
    }

    #[tokio::test]
    async fn test_echo_missing_text() {
        let err = EchoTool.invoke(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::MissingArgument(_)));
    }
}
