//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::util::canonical_value;

/// Definition of a tool the model may request
///
/// This is the declarative half of a capability: what the model sees in the
/// function catalog. Definitions are registered once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "search_products")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint ("string", "integer", "number", "boolean", "array")
    pub param_type: String,
    /// Allowed values, if the parameter is an enumeration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Element type for array parameters; derived from the name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_type: Option<String>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Names of the required parameters, in declaration order
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
            enum_values: None,
            items_type: None,
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    pub fn with_enum(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_items(mut self, items_type: impl Into<String>) -> Self {
        self.items_type = Some(items_type.into());
        self
    }

    pub fn is_array(&self) -> bool {
        self.param_type == "array"
    }
}

/// A call to a tool with arguments, as requested by the model
///
/// `call_id` is generated locally when the call is parsed; providers that do
/// not issue their own identifiers still get per-call correlation in logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
    /// Locally generated correlation id
    pub call_id: String,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
            call_id: Self::generate_call_id(),
        }
    }

    /// Build a call from a parsed argument object (non-object values yield no arguments)
    pub fn from_arguments(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        };
        Self {
            name: name.into(),
            arguments,
            call_id: Self::generate_call_id(),
        }
    }

    pub fn generate_call_id() -> String {
        format!("call_{}", Uuid::new_v4().simple())
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Arguments as a JSON object with keys sorted at every nesting level
    pub fn arguments_json(&self) -> serde_json::Value {
        let mut keys: Vec<&String> = self.arguments.keys().collect();
        keys.sort();
        serde_json::Value::Object(
            keys.into_iter()
                .map(|k| (k.clone(), canonical_value(&self.arguments[k])))
                .collect(),
        )
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an i64 argument, accepting numeric strings ("42") as well
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(value_as_i64)
    }

    /// Get an f64 argument, accepting numeric strings as well
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.arguments.get(key).and_then(|v| match v {
            serde_json::Value::String(s) => s.trim().parse().ok(),
            other => other.as_f64(),
        })
    }

    /// Get a list of integers; a single scalar is treated as a one-element list
    pub fn get_i64_list(&self, key: &str) -> Vec<i64> {
        match self.arguments.get(key) {
            Some(serde_json::Value::Array(items)) => items.iter().filter_map(value_as_i64).collect(),
            Some(other) => value_as_i64(other).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

fn value_as_i64(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("get_product_details", "Fetch one product")
            .with_parameter(
                ToolParameter::new("product_id", "Product identifier", true).with_type("integer"),
            )
            .with_parameter(ToolParameter::new("currency", "Display currency", false));

        assert_eq!(tool.name, "get_product_details");
        assert_eq!(tool.parameters.len(), 2);
        assert_eq!(tool.required().collect::<Vec<_>>(), vec!["product_id"]);
        assert!(tool.parameter("currency").is_some());
        assert!(tool.parameter("missing").is_none());
    }

    #[test]
    fn test_tool_call_accessors() {
        let call = ToolCall::new("compare_products")
            .with_arg("product_ids", serde_json::json!([1, "2", 3.0]))
            .with_arg("query", "phone")
            .with_arg("limit", "7");

        assert_eq!(call.get_i64_list("product_ids"), vec![1, 2, 3]);
        assert_eq!(call.get_string("query"), Some("phone"));
        assert_eq!(call.get_i64("limit"), Some(7));
        assert!(call.require_string("missing").is_err());
    }

    #[test]
    fn test_call_ids_are_unique() {
        let a = ToolCall::new("search_products");
        let b = ToolCall::new("search_products");
        assert_ne!(a.call_id, b.call_id);
        assert!(a.call_id.starts_with("call_"));
    }

    #[test]
    fn test_from_arguments_ignores_non_objects() {
        let call = ToolCall::from_arguments("search_products", serde_json::json!("iphone"));
        assert!(call.arguments.is_empty());

        let call =
            ToolCall::from_arguments("search_products", serde_json::json!({"query": "iphone"}));
        assert_eq!(call.get_string("query"), Some("iphone"));
    }

    #[test]
    fn test_arguments_json_is_key_sorted() {
        let call = ToolCall::new("filter_products")
            .with_arg("max_price", 500)
            .with_arg("brand", "Apple");
        let json = serde_json::to_string(&call.arguments_json()).unwrap();
        assert_eq!(json, r#"{"brand":"Apple","max_price":500}"#);
    }

    #[test]
    fn test_arguments_json_keeps_value_types() {
        let call = ToolCall::new("filter_products")
            .with_arg("product_id", 42)
            .with_arg("min_rating", 4.5)
            .with_arg("product_ids", serde_json::json!([3, 1]))
            .with_arg("range", serde_json::json!({"max": 900, "min": 100}));
        let args = call.arguments_json();

        assert_eq!(args["product_id"], serde_json::json!(42));
        assert_eq!(args["product_id"].as_i64(), Some(42));
        assert_eq!(args["min_rating"].as_f64(), Some(4.5));
        assert_eq!(args["product_ids"], serde_json::json!([3, 1]));
        assert!(args["range"].is_object());
        assert_eq!(args["range"]["min"].as_i64(), Some(100));
    }
}
