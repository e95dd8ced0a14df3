use async_trait::async_trait;
use std::time::Duration;

use super::BrowserResult;

/// Input and capture primitives the agent core needs from a live page
///
/// Coordinates are viewport pixels. All calls are issued strictly one at a
/// time by the agent; implementations need not handle concurrent callers.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Load `url` and return once the DOM content is ready
    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// Single primary-button click
    async fn click(&self, x: i64, y: i64) -> BrowserResult<()>;

    /// Type `text` into the focused element, one character at a time
    async fn type_text(&self, text: &str, per_char_delay: Duration) -> BrowserResult<()>;

    /// Press a `+`-joined key combination (e.g. `Control+A`) as one event
    async fn press_key(&self, combination: &str) -> BrowserResult<()>;

    /// Mouse wheel by a signed pixel delta
    async fn wheel(&self, dx: i64, dy: i64) -> BrowserResult<()>;

    /// PNG of the current viewport
    async fn screenshot(&self) -> BrowserResult<Vec<u8>>;

    async fn current_url(&self) -> BrowserResult<String>;

    /// Wait until the page stops loading resources, or until `timeout`
    async fn wait_for_network_idle(&self, timeout: Duration) -> BrowserResult<()>;
}
