//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain) from "how to serialize for the API"
//! (infrastructure). The domain layer defines [`ToolDefinition`]; this port
//! handles the JSON Schema conversion that the model's function-calling API
//! requires.

use shopwise_domain::tool::entities::ToolDefinition;

/// Port for converting tool definitions to provider-neutral function declarations.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to a function declaration.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools to function declarations (sorted by name).
    fn all_tools_schema(&self, tools: &[ToolDefinition]) -> Vec<serde_json::Value> {
        let mut sorted: Vec<&ToolDefinition> = tools.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
