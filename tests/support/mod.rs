#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use browser_computer_use::gemini::{Content, FunctionCall, FunctionResponse, Part, Role, Tool};
use browser_computer_use::{
    Agent, BrowserDriver, BrowserError, BrowserResult, GenerativeModel, ModelError,
    SafetyDecision, SafetyGate, SafetyVerdict, SessionConfig, TimingConfig,
};

pub const SCREENSHOT: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
pub const START_URL: &str = "https://www.google.com/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    Navigate(String),
    Click(i64, i64),
    Type(String),
    Key(String),
    Wheel(i64, i64),
    IdleWait,
    Screenshot,
}

/// Records every driver call; optionally fails clicks or idle waits
pub struct FakeBrowser {
    events: Mutex<Vec<BrowserEvent>>,
    url: Mutex<String>,
    fail_clicks: bool,
    never_idle: bool,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            url: Mutex::new(START_URL.to_string()),
            fail_clicks: false,
            never_idle: false,
        }
    }

    pub fn failing_clicks(mut self) -> Self {
        self.fail_clicks = true;
        self
    }

    pub fn never_idle(mut self) -> Self {
        self.never_idle = true;
        self
    }

    pub fn events(&self) -> Vec<BrowserEvent> {
        self.events.lock().clone()
    }

    /// Events with settle waits and captures filtered out
    pub fn inputs(&self) -> Vec<BrowserEvent> {
        self.events()
            .into_iter()
            .filter(|e| !matches!(e, BrowserEvent::IdleWait | BrowserEvent::Screenshot))
            .collect()
    }

    fn record(&self, event: BrowserEvent) {
        self.events.lock().push(event);
    }
}

#[async_trait]
impl BrowserDriver for FakeBrowser {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.record(BrowserEvent::Navigate(url.to_string()));
        *self.url.lock() = url.to_string();
        Ok(())
    }

    async fn click(&self, x: i64, y: i64) -> BrowserResult<()> {
        if self.fail_clicks {
            return Err(BrowserError::InputFailed("element detached".to_string()));
        }
        self.record(BrowserEvent::Click(x, y));
        Ok(())
    }

    async fn type_text(&self, text: &str, _per_char_delay: Duration) -> BrowserResult<()> {
        self.record(BrowserEvent::Type(text.to_string()));
        Ok(())
    }

    async fn press_key(&self, combination: &str) -> BrowserResult<()> {
        self.record(BrowserEvent::Key(combination.to_string()));
        Ok(())
    }

    async fn wheel(&self, dx: i64, dy: i64) -> BrowserResult<()> {
        self.record(BrowserEvent::Wheel(dx, dy));
        Ok(())
    }

    async fn screenshot(&self) -> BrowserResult<Vec<u8>> {
        self.record(BrowserEvent::Screenshot);
        Ok(SCREENSHOT.to_vec())
    }

    async fn current_url(&self) -> BrowserResult<String> {
        Ok(self.url.lock().clone())
    }

    async fn wait_for_network_idle(&self, _timeout: Duration) -> BrowserResult<()> {
        self.record(BrowserEvent::IdleWait);
        if self.never_idle {
            return Err(BrowserError::Timeout("network still busy".to_string()));
        }
        Ok(())
    }
}

/// Replays scripted turns; repeats `fallback` once the script runs out
pub struct ScriptedModel {
    turns: Mutex<VecDeque<Content>>,
    fallback: Option<Content>,
    requests: Mutex<Vec<(Vec<Content>, Vec<Tool>)>>,
}

impl ScriptedModel {
    pub fn new(turns: Vec<Content>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn repeating(turn: Content) -> Self {
        Self {
            fallback: Some(turn),
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// History sent on the `n`th call (zero based)
    pub fn history_at(&self, n: usize) -> Vec<Content> {
        self.requests.lock()[n].0.clone()
    }

    pub fn tools_at(&self, n: usize) -> Vec<Tool> {
        self.requests.lock()[n].1.clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, history: &[Content], tools: &[Tool]) -> Result<Content, ModelError> {
        self.requests.lock().push((history.to_vec(), tools.to_vec()));
        let next = self.turns.lock().pop_front();
        next.or_else(|| self.fallback.clone())
            .ok_or_else(|| ModelError::EmptyCandidate("script exhausted".to_string()))
    }
}

/// Answers safety prompts from a script and records what it was shown
pub struct ScriptedGate {
    verdicts: Mutex<VecDeque<SafetyVerdict>>,
    shown: Mutex<Vec<String>>,
}

impl ScriptedGate {
    pub fn new(verdicts: Vec<SafetyVerdict>) -> Self {
        Self {
            verdicts: Mutex::new(verdicts.into()),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().clone()
    }
}

#[async_trait]
impl SafetyGate for ScriptedGate {
    async fn confirm(&self, decision: &SafetyDecision) -> SafetyVerdict {
        self.shown.lock().push(decision.message().to_string());
        self.verdicts
            .lock()
            .pop_front()
            .unwrap_or(SafetyVerdict::Terminate)
    }
}

pub struct Harness {
    pub browser: Arc<FakeBrowser>,
    pub model: Arc<ScriptedModel>,
    pub gate: Arc<ScriptedGate>,
    pub agent: Agent,
}

impl Harness {
    pub fn new(browser: FakeBrowser, model: ScriptedModel, gate: ScriptedGate) -> Self {
        Self::with_config(browser, model, gate, test_config())
    }

    pub fn with_config(
        browser: FakeBrowser,
        model: ScriptedModel,
        gate: ScriptedGate,
        config: SessionConfig,
    ) -> Self {
        let browser = Arc::new(browser);
        let model = Arc::new(model);
        let gate = Arc::new(gate);
        let agent = Agent::new(browser.clone(), model.clone(), gate.clone(), config);
        Self {
            browser,
            model,
            gate,
            agent,
        }
    }

    /// Harness whose model emits `turns` then answers "done"
    pub fn scripted(turns: Vec<Content>) -> Self {
        let mut turns = turns;
        turns.push(text_turn(&["done"]));
        Self::new(FakeBrowser::new(), ScriptedModel::new(turns), ScriptedGate::new(Vec::new()))
    }
}

pub fn test_config() -> SessionConfig {
    SessionConfig {
        timing: TimingConfig::immediate(),
        ..SessionConfig::default()
    }
}

pub fn call(name: &str, args: Value) -> FunctionCall {
    FunctionCall {
        id: None,
        name: name.to_string(),
        args: match args {
            Value::Object(map) => map,
            _ => Map::new(),
        },
    }
}

pub fn action_turn(calls: Vec<FunctionCall>) -> Content {
    Content {
        role: Role::Model,
        parts: calls.into_iter().map(Part::function_call).collect(),
    }
}

pub fn text_turn(texts: &[&str]) -> Content {
    Content {
        role: Role::Model,
        parts: texts.iter().map(|t| Part::text(*t)).collect(),
    }
}

/// Function responses from a user history entry
pub fn responses(entry: &Content) -> Vec<FunctionResponse> {
    assert_eq!(entry.role, Role::User);
    entry
        .parts
        .iter()
        .filter_map(|p| p.function_response.clone())
        .collect()
}
