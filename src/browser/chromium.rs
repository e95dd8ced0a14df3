//! chromiumoxide-backed [`BrowserDriver`]

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::layout::Point;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide_cdp::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType,
};
use chromiumoxide_cdp::cdp::browser_protocol::page::CaptureScreenshotFormat;
use parking_lot::Mutex;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::driver::BrowserDriver;
use super::keyboard::{self, KeyDefinition};
use super::{BrowserError, BrowserResult};

// Idle is approximated from the Resource Timing buffer. It only lists
// finished requests and stops growing once full (250 entries by default), so
// a long-running XHR or a busy page with a full buffer reads as idle early.
// TODO: count in-flight requests from Network.requestWillBeSent and
// Network.loadingFinished/loadingFailed events instead.

/// Resource count must hold steady this long to count as idle
const NETWORK_QUIET_WINDOW: Duration = Duration::from_millis(500);
const NETWORK_POLL_INTERVAL: Duration = Duration::from_millis(100);

const PAGE_ACTIVITY_JS: &str = "({ readyState: document.readyState, \
     resources: performance.getEntriesByType('resource').length })";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageActivity {
    ready_state: String,
    resources: u64,
}

/// Driver bound to a single page for the lifetime of the process
pub struct ChromiumDriver {
    page: Page,
    // Wheel events are dispatched where the pointer last was
    pointer: Mutex<(f64, f64)>,
}

impl ChromiumDriver {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            pointer: Mutex::new((0.0, 0.0)),
        }
    }

    async fn dispatch_key(
        &self,
        event: DispatchKeyEventType,
        definition: &KeyDefinition,
        modifiers: i64,
    ) -> BrowserResult<()> {
        let mut builder = DispatchKeyEventParams::builder()
            .r#type(event.clone())
            .modifiers(modifiers)
            .key(definition.key.clone())
            .code(definition.code.clone())
            .windows_virtual_key_code(definition.key_code)
            .native_virtual_key_code(definition.key_code);

        if event == DispatchKeyEventType::KeyDown
            && let Some(text) = &definition.text
        {
            builder = builder.text(text.clone()).unmodified_text(text.clone());
        }

        let params = builder
            .build()
            .map_err(|e| BrowserError::InputFailed(format!("Failed to build key event: {e}")))?;

        self.page.execute(params).await.map_err(|e| {
            BrowserError::InputFailed(format!("Key '{}' failed: {}", definition.key, e))
        })?;
        Ok(())
    }

    async fn page_activity(&self) -> BrowserResult<PageActivity> {
        self.page
            .evaluate(PAGE_ACTIVITY_JS)
            .await
            .map_err(|e| BrowserError::CaptureFailed(e.to_string()))?
            .into_value::<PageActivity>()
            .map_err(|e| BrowserError::CaptureFailed(e.to_string()))
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.page.goto(url).await.map_err(|e| {
            BrowserError::NavigationFailed(format!("Navigation failed for URL: {url}. Error: {e}"))
        })?;
        Ok(())
    }

    async fn click(&self, x: i64, y: i64) -> BrowserResult<()> {
        let (px, py) = (x as f64, y as f64);
        self.page.click(Point::new(px, py)).await.map_err(|e| {
            BrowserError::InputFailed(format!("Click at ({x}, {y}) failed: {e}"))
        })?;
        *self.pointer.lock() = (px, py);
        Ok(())
    }

    async fn type_text(&self, text: &str, per_char_delay: Duration) -> BrowserResult<()> {
        for c in text.chars() {
            let definition = keyboard::char_definition(c);
            self.dispatch_key(DispatchKeyEventType::KeyDown, &definition, 0)
                .await?;
            self.dispatch_key(DispatchKeyEventType::KeyUp, &definition, 0)
                .await?;
            if !per_char_delay.is_zero() {
                tokio::time::sleep(per_char_delay).await;
            }
        }
        Ok(())
    }

    async fn press_key(&self, combination: &str) -> BrowserResult<()> {
        let chord = keyboard::parse_chord(combination)?;
        trace!("Pressing {:?}", chord);

        let mut held_mask = 0;
        for held in &chord.held {
            held_mask |= modifier_bit(&held.key);
            self.dispatch_key(DispatchKeyEventType::KeyDown, held, held_mask)
                .await?;
        }

        self.dispatch_key(DispatchKeyEventType::KeyDown, &chord.key, chord.modifiers)
            .await?;
        self.dispatch_key(DispatchKeyEventType::KeyUp, &chord.key, chord.modifiers)
            .await?;

        for held in chord.held.iter().rev() {
            held_mask &= !modifier_bit(&held.key);
            self.dispatch_key(DispatchKeyEventType::KeyUp, held, held_mask)
                .await?;
        }
        Ok(())
    }

    async fn wheel(&self, dx: i64, dy: i64) -> BrowserResult<()> {
        let (x, y) = *self.pointer.lock();
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseWheel)
            .x(x)
            .y(y)
            .delta_x(dx as f64)
            .delta_y(dy as f64)
            .build()
            .map_err(|e| BrowserError::InputFailed(format!("Failed to build wheel event: {e}")))?;

        self.page.execute(params).await.map_err(|e| {
            BrowserError::InputFailed(format!("Wheel by ({dx}, {dy}) failed: {e}"))
        })?;
        Ok(())
    }

    async fn screenshot(&self) -> BrowserResult<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        self.page
            .screenshot(params)
            .await
            .map_err(|e| BrowserError::CaptureFailed(format!("Page screenshot failed: {e}")))
    }

    async fn current_url(&self) -> BrowserResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| BrowserError::CaptureFailed(format!("Failed to get URL: {e}")))?;
        Ok(url.unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> BrowserResult<()> {
        let start = Instant::now();
        let mut last_count = None;
        let mut quiet_since = Instant::now();

        loop {
            let activity = self.page_activity().await?;
            if last_count != Some(activity.resources) {
                last_count = Some(activity.resources);
                quiet_since = Instant::now();
            } else if activity.ready_state == "complete"
                && quiet_since.elapsed() >= NETWORK_QUIET_WINDOW
            {
                debug!(
                    "Network idle after {}ms ({} resources)",
                    start.elapsed().as_millis(),
                    activity.resources
                );
                return Ok(());
            }

            if start.elapsed() >= timeout {
                return Err(BrowserError::Timeout(format!(
                    "page still loading after {}ms (readyState: {})",
                    timeout.as_millis(),
                    activity.ready_state
                )));
            }

            tokio::time::sleep(NETWORK_POLL_INTERVAL).await;
        }
    }
}

fn modifier_bit(key: &str) -> i64 {
    match key {
        "Alt" => keyboard::ALT,
        "Control" => keyboard::CONTROL,
        "Meta" => keyboard::META,
        "Shift" => keyboard::SHIFT,
        _ => 0,
    }
}
