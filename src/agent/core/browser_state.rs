use serde_json::{Map, Value};
use tracing::debug;

use super::processor::AgentInner;
use crate::agent::{ActionRequest, ActionResult, AgentError, AgentResult, Outcome, TurnSnapshot};
use crate::gemini::{Blob, FunctionResponse, FunctionResponsePart};

/// Page state capture implementation
impl AgentInner {
    /// One screenshot and URL for the whole batch
    pub(super) async fn capture_snapshot(&self) -> AgentResult<TurnSnapshot> {
        let screenshot = self
            .driver
            .screenshot()
            .await
            .map_err(AgentError::StateCapture)?;
        let url = self
            .driver
            .current_url()
            .await
            .map_err(AgentError::StateCapture)?;

        debug!("Captured {} byte screenshot at {}", screenshot.len(), url);
        Ok(TurnSnapshot { url, screenshot })
    }
}

/// One function response per executed request, all sharing `snapshot`
pub(super) fn build_responses(
    entries: &[(ActionRequest, ActionResult)],
    snapshot: &TurnSnapshot,
) -> Vec<FunctionResponse> {
    entries
        .iter()
        .map(|(request, result)| FunctionResponse {
            id: None,
            name: request.name().to_string(),
            response: response_fields(result, &snapshot.url),
            parts: vec![FunctionResponsePart {
                inline_data: Blob::png(snapshot.screenshot.clone()),
            }],
        })
        .collect()
}

/// `{"url", ...outcome fields, "safety_acknowledgement"}`
fn response_fields(result: &ActionResult, url: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("url".to_string(), Value::String(url.to_string()));

    match &result.outcome {
        Outcome::Ok(extra) => fields.extend(extra.clone()),
        Outcome::Failed(message) => {
            fields.insert("error".to_string(), Value::String(message.clone()));
        }
    }

    if let Some(acknowledged) = result.acknowledgement {
        fields.insert(
            "safety_acknowledgement".to_string(),
            Value::String(acknowledged.to_string()),
        );
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ActionKind;
    use serde_json::json;

    fn request(name: &str) -> ActionRequest {
        ActionRequest {
            kind: ActionKind::from_name(name),
            args: Map::new(),
            safety_decision: None,
        }
    }

    fn snapshot() -> TurnSnapshot {
        TurnSnapshot {
            url: "https://example.com/".to_string(),
            screenshot: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn one_response_per_entry_with_shared_state() {
        let entries = vec![
            (
                request("click_at"),
                ActionResult::succeeded(ActionKind::ClickAt, Map::new()),
            ),
            (
                request("navigate"),
                ActionResult::failed(ActionKind::Navigate, "Navigation failed: boom"),
            ),
            (
                request("hover_at"),
                ActionResult::succeeded(ActionKind::from_name("hover_at"), Map::new()),
            ),
        ];
        let responses = build_responses(&entries, &snapshot());

        assert_eq!(responses.len(), 3);
        let names: Vec<_> = responses.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["click_at", "navigate", "hover_at"]);
        for response in &responses {
            assert_eq!(response.response["url"], "https://example.com/");
            assert_eq!(response.parts.len(), 1);
            assert_eq!(response.parts[0].inline_data.mime_type, "image/png");
            assert_eq!(response.parts[0].inline_data.data, snapshot().screenshot);
        }
        assert_eq!(responses[1].response["error"], "Navigation failed: boom");
        assert!(!responses[0].response.contains_key("safety_acknowledgement"));
    }

    #[test]
    fn acknowledgement_flags_are_strings() {
        let approved = ActionResult::succeeded(ActionKind::ClickAt, Map::new())
            .with_acknowledgement(Some(true));
        let rejected = ActionResult::rejected(ActionKind::ClickAt);

        assert_eq!(
            Value::Object(response_fields(&approved, "u")),
            json!({ "url": "u", "safety_acknowledgement": "true" })
        );
        assert_eq!(
            Value::Object(response_fields(&rejected, "u")),
            json!({ "url": "u", "terminated_by_user": true, "safety_acknowledgement": "false" })
        );
    }
}
