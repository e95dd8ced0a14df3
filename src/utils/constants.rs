//! Shared defaults for the agent, the browser and the model client

/// Chrome user agent string presented by the launched browser
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// CDP request timeout in seconds
pub const BROWSER_REQUEST_TIMEOUT: u64 = 30;

pub const DEFAULT_MODEL: &str = "gemini-2.5-computer-use-preview-10-2025";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_START_URL: &str = "https://www.google.com";

/// Viewport the model's 0-1000 grid is mapped onto
pub const SCREEN_WIDTH: u32 = 1440;
pub const SCREEN_HEIGHT: u32 = 900;

pub const DEFAULT_TURN_LIMIT: usize = 10;

pub const NETWORK_IDLE_TIMEOUT_MS: u64 = 5_000;
pub const SETTLE_DELAY_MS: u64 = 800;
pub const TYPING_DELAY_MS: u64 = 15;
pub const MODEL_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Environment variables holding the model credential, in priority order
pub const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GENAI_API_KEY"];
