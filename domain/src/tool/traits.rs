//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async ToolExecutorPort is defined in the application layer (ports).

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
///
/// Rejects calls that omit a required parameter (or pass it as `null`) and
/// calls that pass parameters the definition does not declare.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for name in definition.required() {
            match call.arguments.get(name) {
                None | Some(serde_json::Value::Null) => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        name, definition.name
                    ));
                }
                Some(_) => {}
            }
        }

        for arg_name in call.arguments.keys() {
            if definition.parameter(arg_name).is_none() {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolParameter;

    #[test]
    fn test_validator_missing_required() {
        let validator = DefaultToolValidator;
        let definition = ToolDefinition::new("search_products", "Search")
            .with_parameter(ToolParameter::new("query", "Search term", true));

        let call = ToolCall::new("search_products");
        let result = validator.validate(&call, &definition);
        assert!(result.unwrap_err().contains("Missing required parameter 'query'"));
    }

    #[test]
    fn test_validator_null_required() {
        let validator = DefaultToolValidator;
        let definition = ToolDefinition::new("search_products", "Search")
            .with_parameter(ToolParameter::new("query", "Search term", true));

        let call = ToolCall::new("search_products").with_arg("query", serde_json::Value::Null);
        assert!(validator.validate(&call, &definition).is_err());
    }

    #[test]
    fn test_validator_unknown_param() {
        let validator = DefaultToolValidator;
        let definition = ToolDefinition::new("search_products", "Search")
            .with_parameter(ToolParameter::new("query", "Search term", false));

        let call = ToolCall::new("search_products").with_arg("colour", "red");
        let result = validator.validate(&call, &definition);
        assert!(result.unwrap_err().contains("Unknown parameter"));
    }

    #[test]
    fn test_validator_valid_call() {
        let validator = DefaultToolValidator;
        let definition = ToolDefinition::new("filter_products", "Filter")
            .with_parameter(ToolParameter::new("query", "Search term", true))
            .with_parameter(ToolParameter::new("max_price", "Upper bound", false));

        let call = ToolCall::new("filter_products")
            .with_arg("query", "laptop")
            .with_arg("max_price", 900);

        assert!(validator.validate(&call, &definition).is_ok());
    }
}
