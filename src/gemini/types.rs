//! Wire types for the `generateContent` REST endpoint.
//!
//! Only the subset of the schema the computer-use loop touches is modelled.
//! Field names follow the JSON mapping of the API (camelCase).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author of a history entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[default]
    Model,
}

/// One entry of the conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// User turn holding a single text part (the goal)
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    /// User turn reporting the results of an action batch
    pub fn function_responses(responses: Vec<FunctionResponse>) -> Self {
        Self {
            role: Role::User,
            parts: responses.into_iter().map(Part::function_response).collect(),
        }
    }

    /// Action requests in the order the model emitted them
    pub fn function_calls(&self) -> impl Iterator<Item = &FunctionCall> {
        self.parts.iter().filter_map(|p| p.function_call.as_ref())
    }

    pub fn has_function_calls(&self) -> bool {
        self.function_calls().next().is_some()
    }

    /// All text parts joined with a single space
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,

    /// Opaque reasoning marker; must be echoed back untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn function_call(call: FunctionCall) -> Self {
        Self {
            function_call: Some(call),
            ..Default::default()
        }
    }

    pub fn function_response(response: FunctionResponse) -> Self {
        Self {
            function_response: Some(response),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub args: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub response: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<FunctionResponsePart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponsePart {
    pub inline_data: Blob,
}

/// Inline binary payload, base64 on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Blob {
    pub fn png(data: Vec<u8>) -> Self {
        Self {
            mime_type: "image/png".to_string(),
            data,
        }
    }
}

mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Tool declaration sent with every request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub computer_use: ComputerUse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputerUse {
    pub environment: Environment,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_predefined_functions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Environment {
    #[serde(rename = "ENVIRONMENT_BROWSER")]
    Browser,
}

impl Tool {
    /// Predefined browser computer-use tool, minus the excluded functions
    pub fn browser_computer_use(excluded: &[String]) -> Self {
        Self {
            computer_use: ComputerUse {
                environment: Environment::Browser,
                excluded_predefined_functions: excluded.to_vec(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest<'a> {
    pub contents: &'a [Content],
    pub tools: &'a [Tool],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_model_turn_with_text_and_calls() {
        let raw = json!({
            "role": "model",
            "parts": [
                { "text": "Opening the search page." },
                { "functionCall": { "name": "navigate", "args": { "url": "example.com" } } },
                { "functionCall": { "name": "click_at", "args": { "x": 500, "y": 120 } } }
            ]
        });
        let content: Content = serde_json::from_value(raw).unwrap();

        assert_eq!(content.role, Role::Model);
        let names: Vec<_> = content.function_calls().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["navigate", "click_at"]);
        assert_eq!(content.text(), "Opening the search page.");
    }

    #[test]
    fn text_joins_parts_with_spaces() {
        let content = Content {
            role: Role::Model,
            parts: vec![Part::text("The price is"), Part::text("$20. ")],
        };
        assert!(!content.has_function_calls());
        assert_eq!(content.text(), "The price is $20.");
    }

    #[test]
    fn function_response_serializes_inline_png() {
        let mut response = Map::new();
        response.insert("url".into(), json!("https://example.com/"));
        let content = Content::function_responses(vec![FunctionResponse {
            id: None,
            name: "click_at".into(),
            response,
            parts: vec![FunctionResponsePart {
                inline_data: Blob::png(vec![0x89, b'P', b'N', b'G']),
            }],
        }]);

        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value["role"], "user");
        let fr = &value["parts"][0]["functionResponse"];
        assert_eq!(fr["name"], "click_at");
        assert_eq!(fr["response"]["url"], "https://example.com/");
        assert_eq!(fr["parts"][0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(fr["parts"][0]["inlineData"]["data"], "iVBORw==");
    }

    #[test]
    fn tool_declaration_wire_shape() {
        let tool = Tool::browser_computer_use(&["drag_and_drop".to_string()]);
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(
            value,
            json!({
                "computerUse": {
                    "environment": "ENVIRONMENT_BROWSER",
                    "excludedPredefinedFunctions": ["drag_and_drop"]
                }
            })
        );

        let bare = serde_json::to_value(Tool::browser_computer_use(&[])).unwrap();
        assert!(bare["computerUse"].get("excludedPredefinedFunctions").is_none());
    }

    #[test]
    fn thought_signature_survives_round_trip() {
        let raw = json!({
            "role": "model",
            "parts": [{ "functionCall": { "name": "open_web_browser" }, "thoughtSignature": "abc" }]
        });
        let content: Content = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&content).unwrap(), raw);
    }
}
