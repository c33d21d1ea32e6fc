//! Function declaration converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces the
//! `{name, description, parameters}` function declarations used by
//! function-calling model APIs.

use shopwise_application::ports::tool_schema::ToolSchemaPort;
use shopwise_domain::tool::entities::{ToolDefinition, ToolParameter};

/// Default implementation producing function declarations.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - `"array"` → `"array"` with an `items` type
/// - anything else → `"string"`
pub struct FunctionDeclarationConverter;

impl FunctionDeclarationConverter {
    fn schema_type(param_type: &str) -> &'static str {
        match param_type {
            "number" => "number",
            "integer" => "integer",
            "boolean" => "boolean",
            "array" => "array",
            _ => "string",
        }
    }

    /// Element type for an array parameter.
    ///
    /// Without an explicit type, id/number/count-like names hold integers.
    fn items_type(param: &ToolParameter) -> &'static str {
        if let Some(items) = &param.items_type {
            return Self::schema_type(items);
        }
        let name = param.name.to_lowercase();
        if ["id", "number", "count"].iter().any(|hint| name.contains(hint)) {
            "integer"
        } else {
            "string"
        }
    }
}

impl ToolSchemaPort for FunctionDeclarationConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let mut prop = serde_json::Map::new();
            prop.insert(
                "type".to_string(),
                serde_json::json!(Self::schema_type(&param.param_type)),
            );
            prop.insert(
                "description".to_string(),
                serde_json::json!(param.description),
            );
            if param.is_array() {
                prop.insert(
                    "items".to_string(),
                    serde_json::json!({ "type": Self::items_type(param) }),
                );
            }
            if let Some(values) = &param.enum_values {
                prop.insert("enum".to_string(), serde_json::json!(values));
            }
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_to_schema() {
        let converter = FunctionDeclarationConverter;
        let tool = ToolDefinition::new("search_products", "Search the catalog")
            .with_parameter(ToolParameter::new("query", "Search term", true))
            .with_parameter(
                ToolParameter::new("max_results", "Result limit", false).with_type("integer"),
            );

        let schema = converter.tool_to_schema(&tool);

        assert_eq!(schema["name"], "search_products");
        assert_eq!(schema["description"], "Search the catalog");
        assert_eq!(schema["parameters"]["type"], "object");
        assert_eq!(schema["parameters"]["properties"]["query"]["type"], "string");
        assert_eq!(
            schema["parameters"]["properties"]["max_results"]["type"],
            "integer"
        );

        let required = schema["parameters"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "query");
    }

    #[test]
    fn test_array_items_type() {
        let converter = FunctionDeclarationConverter;
        let tool = ToolDefinition::new("compare_products", "Compare")
            .with_parameter(ToolParameter::new("product_ids", "Ids", true).with_type("array"))
            .with_parameter(ToolParameter::new("tags", "Tags", false).with_type("array"))
            .with_parameter(
                ToolParameter::new("prices", "Prices", false)
                    .with_type("array")
                    .with_items("number"),
            );

        let props = &converter.tool_to_schema(&tool)["parameters"]["properties"];
        assert_eq!(props["product_ids"]["items"]["type"], "integer");
        assert_eq!(props["tags"]["items"]["type"], "string");
        assert_eq!(props["prices"]["items"]["type"], "number");
        assert!(props["product_ids"].get("enum").is_none());
    }

    #[test]
    fn test_enum_values() {
        let converter = FunctionDeclarationConverter;
        let tool = ToolDefinition::new("filter_products", "Filter").with_parameter(
            ToolParameter::new("sort_by", "Sort order", false).with_enum(["price", "rating"]),
        );

        let prop = &converter.tool_to_schema(&tool)["parameters"]["properties"]["sort_by"];
        assert_eq!(prop["enum"], serde_json::json!(["price", "rating"]));
    }

    #[test]
    fn test_all_tools_schema_sorted() {
        let converter = FunctionDeclarationConverter;
        let tools = vec![
            ToolDefinition::new("search_products", "Search"),
            ToolDefinition::new("compare_products", "Compare"),
        ];

        let schemas = converter.all_tools_schema(&tools);
        assert_eq!(schemas[0]["name"], "compare_products");
        assert_eq!(schemas[1]["name"], "search_products");
    }
}
