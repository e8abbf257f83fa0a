//! Helpers to build response schemas
//!
//! Schemas use the OpenAPI subset understood by Gemini structured output,
//! with upper-case type names.
//!
//! # Example
//!
//! ```
//! use pulse_llm::schema;
//! use serde_json::json;
//!
//! let schema = schema::object(
//!     json!({
//!         "title": schema::string(),
//!         "tags": schema::array(schema::string()),
//!     }),
//!     &["title"],
//! );
//! assert_eq!(schema["type"], "OBJECT");
//! ```

use serde_json::{Value, json};

/// Object schema with properties and required keys
pub fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

/// Array schema
pub fn array(items: Value) -> Value {
    json!({
        "type": "ARRAY",
        "items": items,
    })
}

/// String schema
pub fn string() -> Value {
    json!({ "type": "STRING" })
}

/// Number schema
pub fn number() -> Value {
    json!({ "type": "NUMBER" })
}

/// Attach a description to any schema
pub fn describe(mut schema: Value, description: &str) -> Value {
    if let Some(map) = schema.as_object_mut() {
        map.insert("description".to_string(), Value::from(description));
    }
    schema
}
