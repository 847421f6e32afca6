//! Tool registry
//!
//! Catalog of invocable tools resolved by string-name lookup. The
//! registry is built once before a loop runs and is read-only while it
//! runs; a session references it but never owns or mutates it.
//!
//! Dispatch never raises to the caller: an unknown name or a failed
//! invocation becomes a [`ToolOutcome`] error value that the loop
//! engine records in history, so the model can see it and self-correct
//! on the next turn.

pub mod echo;

pub use echo::EchoTool;

use crate::session::ToolOutcome;
use sdk::{Tool, ToolDescriptor};
use std::sync::Arc;
use tracing::{debug, warn};

/// Registration-ordered catalog of tools dispatched by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry with no tools
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the built-in tools
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(EchoTool));
        registry
    }

    /// Register a tool
    ///
    /// A tool with the same name as an existing one replaces it in
    /// place, keeping the catalog order stable.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        if let Some(slot) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            *slot = tool;
        } else {
            self.tools.push(tool);
        }
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True if no tool is registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// The catalog advertised to model endpoints, in registration order
    pub fn catalog(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|t| ToolDescriptor::of(t.as_ref()))
            .collect()
    }

    /// Dispatch a tool call by name
    ///
    /// Returns an outcome value in every case; errors are recorded, not
    /// raised, so the loop can continue.
    pub async fn dispatch(&self, name: &str, arguments: serde_json::Value) -> ToolOutcome {
        let Some(tool) = self.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return ToolOutcome::UnknownTool;
        };

        debug!("Dispatching tool '{}' with args: {}", name, arguments);

        match tool.invoke(arguments).await {
            Ok(result) => ToolOutcome::Ok { result },
            Err(e) => {
                warn!("Tool '{}' failed: {}", name, e);
                ToolOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Render human-readable documentation for every registered tool
    ///
    /// One block per tool, in registration order: name, description,
    /// and the argument schema.
    pub fn docs(&self) -> String {
        let mut parts = Vec::new();
        for tool in &self.tools {
            parts.push(format!("## {}", tool.name()));
            parts.push(tool.description().to_string());
            parts.push(format!("Arguments: {}", tool.schema()));
            parts.push(String::new());
        }
        parts.join("\n").trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sdk::ToolError;
    use serde_json::json;

    struct Failing;

    #[async_trait]
    impl Tool for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "Always fails."
        }

        fn schema(&self) -> serde_json::Value {
            json!({"type": "object"})
        }

        async fn invoke(&self, _args: serde_json::Value) -> Result<String, ToolError> {
            Err(ToolError::Failed("broken pipe".to_string()))
        }
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let registry = ToolRegistry::builtin();
        let outcome = registry.dispatch("echo", json!({"text": "hi"})).await;
        assert_eq!(
            outcome,
            ToolOutcome::Ok {
                result: "hi".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let registry = ToolRegistry::empty();
        let outcome = registry.dispatch("nope", json!({})).await;
        assert_eq!(outcome, ToolOutcome::UnknownTool);
    }

    #[tokio::test]
    async fn test_dispatch_tool_failure_recorded_not_raised() {
        let mut registry = ToolRegistry::empty();
        registry.register(Arc::new(Failing));

        let outcome = registry.dispatch("failing", json!({})).await;
        assert_eq!(
            outcome,
            ToolOutcome::Failed {
                message: "broken pipe".to_string()
            }
        );
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = ToolRegistry::empty();
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(Failing));
        registry.register(Arc::new(EchoTool));

        // Order is stable under replacement.
        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.catalog().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["echo", "failing"]);
    }

    #[test]
    fn test_docs_rendering() {
        let mut registry = ToolRegistry::builtin();
        registry.register(Arc::new(Failing));

        let docs = registry.docs();
        let echo_pos = docs.find("## echo").unwrap();
        let failing_pos = docs.find("## failing").unwrap();
        assert!(echo_pos < failing_pos);
        assert!(docs.contains("Arguments:"));
    }

    #[test]
    fn test_docs_empty_registry() {
        assert_eq!(ToolRegistry::empty().docs(), "");
    }
}
