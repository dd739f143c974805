//! Tool trait — the abstraction over assistant capabilities.
//!
//! Tools are what let the assistant act: look up movie metadata, mutate
//! the watchlist, build a viewing schedule, answer questions about an
//! uploaded document. The model picks tools by name at runtime, but the
//! set is closed: every registered tool decodes its arguments into a
//! typed struct before doing anything.

use crate::error::ToolError;
use crate::provider::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the LLM's tool_call.id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content (JSON text the model narrates from)
    pub output: String,

    /// Optional structured data for renderers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    /// A successful result carrying a serializable payload.
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, ToolError> {
        let data = serde_json::to_value(payload).map_err(|e| ToolError::ExecutionFailed {
            tool_name: String::new(),
            reason: format!("result serialization failed: {e}"),
        })?;
        Ok(Self {
            call_id: String::new(),
            success: true,
            output: data.to_string(),
            data: Some(data),
        })
    }
}

/// Decode a tool's JSON arguments into its typed argument struct.
///
/// This is the schema-validated decode step: a mismatch (missing field,
/// wrong type, unknown shape) becomes `InvalidArguments`, which the
/// orchestrator lets the model correct exactly once.
pub fn decode_arguments<T: serde::de::DeserializeOwned>(
    arguments: serde_json::Value,
) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// The core Tool trait.
///
/// Each capability (movie_info, watchlist_add, build_schedule, ...)
/// implements this trait. Tools are registered in the ToolRegistry and
/// made available to the orchestrator.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "movie_info").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
///
/// The orchestrator uses this to:
/// 1. Get tool definitions to send to the LLM
/// 2. Look up and execute tools when the LLM requests them
///
/// The registry itself is stateless apart from the routing table; side
/// effects are confined to the individual tools. Every execution runs
/// under a bounded timeout so a hung collaborator surfaces as
/// `ToolError::Timeout` instead of stalling the turn.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    timeout: Duration,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the per-execution timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the LLM).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Execute a tool call.
    pub async fn execute(&self, call: &ToolCall) -> std::result::Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;

        match tokio::time::timeout(self.timeout, tool.execute(call.arguments.clone())).await {
            Ok(result) => {
                let mut result = result?;
                result.call_id = call.id.clone();
                Ok(result)
            }
            Err(_) => Err(ToolError::Timeout {
                tool_name: call.name.clone(),
                timeout_secs: self.timeout.as_secs(),
            }),
        }
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct EchoArgs {
        text: String,
    }

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> std::result::Result<ToolResult, ToolError> {
            let args: EchoArgs = decode_arguments(arguments)?;
            Ok(ToolResult {
                call_id: String::new(),
                success: true,
                output: args.text,
                data: None,
            })
        }
    }

    /// A tool that never finishes, for timeout tests.
    struct StallTool;

    #[async_trait]
    impl Tool for StallTool {
        fn name(&self) -> &str {
            "stall"
        }
        fn description(&self) -> &str {
            "Never returns"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}})
        }
        async fn execute(
            &self,
            _arguments: serde_json::Value,
        ) -> std::result::Result<ToolResult, ToolError> {
            std::future::pending().await
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_definitions() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }

    #[tokio::test]
    async fn registry_execute_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let call = ToolCall {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: serde_json::json!({"text": "hello world"}),
        };
        let result = registry.execute(&call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hello world");
        assert_eq!(result.call_id, "call_1");
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let registry = ToolRegistry::new();
        let call = ToolCall {
            id: "call_1".into(),
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry.execute(&call).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn decode_failure_is_invalid_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let call = ToolCall {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: serde_json::json!({"wrong_field": 42}),
        };
        let err = registry.execute(&call).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn execution_timeout_surfaces_as_error() {
        let mut registry = ToolRegistry::new().with_timeout(Duration::from_millis(20));
        registry.register(Box::new(StallTool));

        let call = ToolCall {
            id: "call_1".into(),
            name: "stall".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry.execute(&call).await.unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
    }
}
