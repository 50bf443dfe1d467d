//! LLM request/response types for Plain Digital
//!
//! These types follow the shape of the Gemini `generateContent` API (a system
//! instruction, one user prompt, an optional response schema) but carry no
//! provider-specific wire details.

use serde_json::{Map, Value, json};
use tracing::debug;

/// MIME type used when a structured answer is requested
pub const JSON_MIME_TYPE: &str = "application/json";

/// A generation request - everything needed for one LLM call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// System instruction (rendered from the prompt templates)
    pub system_instruction: String,

    /// The user prompt
    pub prompt: String,

    /// Desired response format; `None` asks for plain text
    pub response_format: Option<ResponseFormat>,

    /// Max output tokens for this call (capped by config)
    pub max_tokens: u32,
}

impl GenerateRequest {
    /// Create a plain-text request
    pub fn text(system_instruction: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            prompt: prompt.into(),
            response_format: None,
            max_tokens,
        }
    }

    /// Attach a JSON response schema
    pub fn with_schema(mut self, schema: Schema) -> Self {
        debug!("GenerateRequest::with_schema: called");
        self.response_format = Some(ResponseFormat::json(schema));
        self
    }

    /// Whether a structured JSON answer was requested
    pub fn wants_json(&self) -> bool {
        self.response_format.is_some()
    }
}

/// Response format descriptor: a MIME type plus a schema
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    pub mime_type: String,
    pub schema: Schema,
}

impl ResponseFormat {
    pub fn json(schema: Schema) -> Self {
        Self {
            mime_type: JSON_MIME_TYPE.to_string(),
            schema,
        }
    }
}

/// Response schema: nested objects and arrays of string fields
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String,
    Array(Box<Schema>),
    Object {
        properties: Vec<(String, Schema)>,
        required: Vec<String>,
    },
}

impl Schema {
    /// An array of plain strings
    pub fn string_array() -> Self {
        Schema::Array(Box::new(Schema::String))
    }

    /// An object whose fields are all required strings
    pub fn string_object(fields: &[&str]) -> Self {
        Schema::Object {
            properties: fields.iter().map(|f| (f.to_string(), Schema::String)).collect(),
            required: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// An array of the given item schema
    pub fn array_of(item: Schema) -> Self {
        Schema::Array(Box::new(item))
    }

    /// Render in the OpenAPI subset the Gemini API accepts
    pub fn to_json(&self) -> Value {
        match self {
            Schema::String => json!({ "type": "STRING" }),
            Schema::Array(items) => json!({
                "type": "ARRAY",
                "items": items.to_json(),
            }),
            Schema::Object { properties, required } => {
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(name, schema)| (name.clone(), schema.to_json()))
                    .collect();
                json!({
                    "type": "OBJECT",
                    "properties": props,
                    "required": required,
                })
            }
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FinishReason {
    #[default]
    Stop,
    MaxTokens,
    Other(String),
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Result of a generation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    /// Text content; `None` when the model produced nothing
    pub text: Option<String>,

    /// Why the model stopped
    pub finish_reason: FinishReason,

    /// Token usage for this call
    pub usage: TokenUsage,
}

impl GenerateResponse {
    /// Build a response carrying the given text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_array_schema() {
        let schema = Schema::string_array().to_json();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["type"], "STRING");
    }

    #[test]
    fn test_object_schema_required_fields() {
        let schema = Schema::array_of(Schema::string_object(&["title", "output"])).to_json();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["type"], "OBJECT");
        assert_eq!(schema["items"]["properties"]["title"]["type"], "STRING");
        assert_eq!(schema["items"]["required"], json!(["title", "output"]));
    }

    #[test]
    fn test_request_builders() {
        let req = GenerateRequest::text("sys", "hello", 256);
        assert!(!req.wants_json());
        assert_eq!(req.max_tokens, 256);

        let req = req.with_schema(Schema::string_array());
        assert!(req.wants_json());
        assert_eq!(req.response_format.unwrap().mime_type, JSON_MIME_TYPE);
    }
}
