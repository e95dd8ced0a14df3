mod core;
pub mod coordinates;
pub mod keys;
pub mod safety;

use serde_json::{Map, Value};
use thiserror::Error;

pub use self::core::{Agent, SessionConfig, TimingConfig, Viewport};
pub use safety::{ConsoleSafetyGate, SafetyGate, SafetyVerdict};

use crate::browser::BrowserError;
use crate::gemini::{Content, FunctionCall, ModelError};

/// Closed set of computer-use actions the executor understands
///
/// Names outside the set are kept as [`ActionKind::Unrecognized`] so they
/// can still be answered by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    OpenBrowser,
    Navigate,
    ClickAt,
    TypeTextAt,
    KeyCombination,
    ScrollDocument,
    Unrecognized(String),
}

impl ActionKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "open_web_browser" => Self::OpenBrowser,
            "navigate" => Self::Navigate,
            "click_at" => Self::ClickAt,
            "type_text_at" => Self::TypeTextAt,
            "key_combination" => Self::KeyCombination,
            "scroll_document" => Self::ScrollDocument,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Function name as the model knows it
    pub fn name(&self) -> &str {
        match self {
            Self::OpenBrowser => "open_web_browser",
            Self::Navigate => "navigate",
            Self::ClickAt => "click_at",
            Self::TypeTextAt => "type_text_at",
            Self::KeyCombination => "key_combination",
            Self::ScrollDocument => "scroll_document",
            Self::Unrecognized(name) => name,
        }
    }
}

/// Model-attached request for operator confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyDecision {
    pub explanation: Option<String>,
}

impl SafetyDecision {
    pub const FALLBACK_NOTICE: &'static str =
        "The model requested a potentially sensitive action.";

    /// Read the `safety_decision` argument; only an object counts
    pub fn from_args(args: &Map<String, Value>) -> Option<Self> {
        let decision = args.get("safety_decision")?.as_object()?;
        let explanation = ["explanation", "reason"]
            .iter()
            .filter_map(|key| decision.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|text| !text.is_empty())
            .map(str::to_string);
        Some(Self { explanation })
    }

    /// Text shown to the operator
    pub fn message(&self) -> &str {
        self.explanation.as_deref().unwrap_or(Self::FALLBACK_NOTICE)
    }
}

/// One function call from a model turn, ready for dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub args: Map<String, Value>,
    pub safety_decision: Option<SafetyDecision>,
}

impl ActionRequest {
    pub fn from_call(call: &FunctionCall) -> Self {
        Self {
            kind: ActionKind::from_name(&call.name),
            safety_decision: SafetyDecision::from_args(&call.args),
            args: call.args.clone(),
        }
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Required integer argument; accepts numbers and numeric strings
    pub(crate) fn integer(&self, arg: &'static str) -> Result<i64, ActionError> {
        match self.args.get(arg) {
            None | Some(Value::Null) => Err(self.missing(arg)),
            Some(value) => to_integer(value).ok_or_else(|| self.invalid(arg, "expected a number")),
        }
    }

    pub(crate) fn integer_or(&self, arg: &'static str, default: i64) -> Result<i64, ActionError> {
        match self.args.get(arg) {
            None | Some(Value::Null) => Ok(default),
            Some(_) => self.integer(arg),
        }
    }

    /// String argument; absent or null reads as empty
    pub(crate) fn string(&self, arg: &str) -> String {
        match self.args.get(arg) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub(crate) fn flag(&self, arg: &str, default: bool) -> bool {
        match self.args.get(arg) {
            None | Some(Value::Null) => default,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "" | "false" | "0" | "no"
            ),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }

    pub(crate) fn missing(&self, arg: &'static str) -> ActionError {
        ActionError::MissingArgument {
            action: self.name().to_string(),
            arg,
        }
    }

    pub(crate) fn invalid(&self, arg: &'static str, reason: impl Into<String>) -> ActionError {
        ActionError::InvalidArgument {
            action: self.name().to_string(),
            arg,
            reason: reason.into(),
        }
    }
}

fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

/// Why a single action could not be performed
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Missing '{arg}' argument for {action}")]
    MissingArgument { action: String, arg: &'static str },

    #[error("Invalid '{arg}' argument for {action}: {reason}")]
    InvalidArgument {
        action: String,
        arg: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ok(Map<String, Value>),
    Failed(String),
}

/// Result of one dispatched action; never changed once built
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub kind: ActionKind,
    pub outcome: Outcome,
    /// `Some` only when the request carried a safety decision
    pub acknowledgement: Option<bool>,
}

impl ActionResult {
    pub fn succeeded(kind: ActionKind, fields: Map<String, Value>) -> Self {
        Self {
            kind,
            outcome: Outcome::Ok(fields),
            acknowledgement: None,
        }
    }

    pub fn failed(kind: ActionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            outcome: Outcome::Failed(message.into()),
            acknowledgement: None,
        }
    }

    /// The operator refused the action at the safety gate
    pub fn rejected(kind: ActionKind) -> Self {
        let mut fields = Map::new();
        fields.insert("terminated_by_user".to_string(), Value::Bool(true));
        Self {
            kind,
            outcome: Outcome::Ok(fields),
            acknowledgement: Some(false),
        }
    }

    /// Later action in a batch the operator terminated
    pub fn skipped(kind: ActionKind) -> Self {
        Self::failed(
            kind,
            "Not executed: the operator terminated this action batch",
        )
    }

    pub fn with_acknowledgement(mut self, acknowledgement: Option<bool>) -> Self {
        self.acknowledgement = acknowledgement;
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Ok(_))
    }
}

/// Page state captured once after an action batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSnapshot {
    pub url: String,
    pub screenshot: Vec<u8>,
}

/// Why a goal session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoneReason {
    /// The model answered without requesting actions
    FinalAnswer(String),
    /// The operator rejected an action at the safety gate
    UserTerminated,
    TurnLimitReached,
}

/// Summary of one goal session
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub session_id: uuid::Uuid,
    pub goal: String,
    pub reason: DoneReason,
    /// Model calls made
    pub turns: usize,
    pub history: Vec<Content>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl SessionReport {
    pub fn final_answer(&self) -> Option<&str> {
        match &self.reason {
            DoneReason::FinalAnswer(text) => Some(text),
            _ => None,
        }
    }
}

/// Errors that end a goal session early
///
/// Action-level problems never show up here; they are reported to the
/// model as failed results instead.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("State capture failed: {0}")]
    StateCapture(#[source] BrowserError),
}

pub type AgentResult<T> = Result<T, AgentError>;
