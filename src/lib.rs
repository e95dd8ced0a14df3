//! Vision-model driven browser agent
//!
//! Runs the computer-use turn loop: the model sees a screenshot and the
//! action history, answers with text or a batch of UI actions in a 0-1000
//! coordinate grid, and the agent replays those actions against a live
//! Chrome page via chromiumoxide.

pub mod agent;
pub mod browser;
pub mod browser_setup;
pub mod gemini;
mod manager;
pub mod utils;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use utils::{ConfigError, MAX_REQUEST_TIMEOUT_MS, validate_wait};
use utils::constants::{
    API_KEY_VARS, DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_START_URL, DEFAULT_TURN_LIMIT,
    MODEL_REQUEST_TIMEOUT_SECS, NETWORK_IDLE_TIMEOUT_MS, SCREEN_HEIGHT, SCREEN_WIDTH,
    SETTLE_DELAY_MS, TYPING_DELAY_MS,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model turns per goal before giving up
    #[serde(default = "default_turn_limit")]
    pub turn_limit: usize,

    /// Page opened before the first goal
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// Predefined computer-use functions the model may not call
    #[serde(default)]
    pub excluded_functions: Vec<String>,

    #[serde(default)]
    pub screen: ScreenConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub timing: TimingSettings,
}

/// Viewport size shared by the browser and the coordinate mapping
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(default = "default_screen_width")]
    pub width: u32,

    #[serde(default = "default_screen_height")]
    pub height: u32,
}

/// Browser launch configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub headless: bool,

    /// Disable web security features (Same-Origin Policy, etc.)
    /// WARNING: Only enable for trusted content
    #[serde(default)]
    pub disable_security: bool,
}

/// Waits around each action, in milliseconds unless noted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSettings {
    #[serde(default = "default_network_idle_timeout_ms")]
    pub network_idle_timeout_ms: u64,

    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}
fn default_turn_limit() -> usize {
    DEFAULT_TURN_LIMIT
}
fn default_start_url() -> String {
    DEFAULT_START_URL.to_string()
}
fn default_screen_width() -> u32 {
    SCREEN_WIDTH
}
fn default_screen_height() -> u32 {
    SCREEN_HEIGHT
}
fn default_network_idle_timeout_ms() -> u64 {
    NETWORK_IDLE_TIMEOUT_MS
}
fn default_settle_delay_ms() -> u64 {
    SETTLE_DELAY_MS
}
fn default_typing_delay_ms() -> u64 {
    TYPING_DELAY_MS
}
fn default_request_timeout_secs() -> u64 {
    MODEL_REQUEST_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            turn_limit: default_turn_limit(),
            start_url: default_start_url(),
            excluded_functions: Vec::new(),
            screen: ScreenConfig::default(),
            browser: BrowserConfig::default(),
            timing: TimingSettings::default(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_screen_width(),
            height: default_screen_height(),
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            network_idle_timeout_ms: default_network_idle_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            typing_delay_ms: default_typing_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load YAML config from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Validated timeout for one model request
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        validate_wait(
            "request_timeout",
            self.timing.request_timeout_secs.saturating_mul(1_000),
            MAX_REQUEST_TIMEOUT_MS,
        )
    }
}

/// Model credential from the environment (`GOOGLE_API_KEY` preferred)
pub fn credential_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

pub use agent::{
    ActionKind, ActionRequest, ActionResult, Agent, AgentError, AgentResult, ConsoleSafetyGate,
    DoneReason, Outcome, SafetyDecision, SafetyGate, SafetyVerdict, SessionConfig,
    SessionReport, TimingConfig, TurnSnapshot, Viewport,
};
pub use browser::{BrowserDriver, BrowserError, BrowserResult, ChromiumDriver};
pub use gemini::{GeminiClient, GenerativeModel, ModelError};
pub use manager::BrowserManager;
