use std::time::Duration;

use crate::gemini::Tool;
use crate::utils::constants::{
    DEFAULT_MODEL, DEFAULT_TURN_LIMIT, NETWORK_IDLE_TIMEOUT_MS, SCREEN_HEIGHT, SCREEN_WIDTH,
    SETTLE_DELAY_MS, TYPING_DELAY_MS,
};
use crate::utils::{ConfigError, MAX_SETTLE_TIMEOUT_MS, MAX_TYPING_DELAY_MS, validate_wait};
use crate::{Config, ScreenConfig};

/// Logical screen size shared by the browser and coordinate mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

impl From<&ScreenConfig> for Viewport {
    fn from(screen: &ScreenConfig) -> Self {
        Self {
            width: screen.width,
            height: screen.height,
        }
    }
}

/// Waits performed around each action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub network_idle_timeout: Duration,
    pub settle_delay: Duration,
    pub typing_delay: Duration,
}

impl TimingConfig {
    /// No waiting at all
    pub fn immediate() -> Self {
        Self {
            network_idle_timeout: Duration::ZERO,
            settle_delay: Duration::ZERO,
            typing_delay: Duration::ZERO,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            network_idle_timeout: Duration::from_millis(NETWORK_IDLE_TIMEOUT_MS),
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
            typing_delay: Duration::from_millis(TYPING_DELAY_MS),
        }
    }
}

/// Immutable per-session settings, built once from [`Config`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub viewport: Viewport,
    pub turn_limit: usize,
    pub model: String,
    pub excluded_functions: Vec<String>,
    pub timing: TimingConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            turn_limit: DEFAULT_TURN_LIMIT,
            model: DEFAULT_MODEL.to_string(),
            excluded_functions: Vec::new(),
            timing: TimingConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Tool declarations sent with every model call
    pub fn tools(&self) -> Vec<Tool> {
        vec![Tool::browser_computer_use(&self.excluded_functions)]
    }
}

impl TryFrom<&Config> for SessionConfig {
    type Error = ConfigError;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        let viewport = Viewport::from(&config.screen);
        if viewport.width == 0 || viewport.height == 0 {
            return Err(ConfigError::InvalidScreen {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if config.turn_limit == 0 {
            return Err(ConfigError::InvalidTurnLimit);
        }

        let timing = &config.timing;
        Ok(Self {
            viewport,
            turn_limit: config.turn_limit,
            model: config.model.clone(),
            excluded_functions: config.excluded_functions.clone(),
            timing: TimingConfig {
                network_idle_timeout: validate_wait(
                    "network_idle_timeout_ms",
                    timing.network_idle_timeout_ms,
                    MAX_SETTLE_TIMEOUT_MS,
                )?,
                settle_delay: validate_wait(
                    "settle_delay_ms",
                    timing.settle_delay_ms,
                    MAX_SETTLE_TIMEOUT_MS,
                )?,
                typing_delay: validate_wait(
                    "typing_delay_ms",
                    timing.typing_delay_ms,
                    MAX_TYPING_DELAY_MS,
                )?,
            },
        })
    }
}
