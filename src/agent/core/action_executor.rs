use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::processor::AgentInner;
use crate::agent::coordinates::{
    DEFAULT_SCROLL_MAGNITUDE, ScrollDirection, ensure_url_scheme, to_pixel_x, to_pixel_y,
};
use crate::agent::keys::{normalize_key_combination, select_all_shortcut};
use crate::agent::{ActionError, ActionKind, ActionRequest, ActionResult};

/// Action execution implementation
impl AgentInner {
    /// Perform one action against the page, then let the page settle
    ///
    /// Never fails: input and argument errors come back as a failed result.
    pub(super) async fn execute_action(&self, request: &ActionRequest) -> ActionResult {
        info!("  -> Executing: {}", request.name());

        let result = match self.perform(request).await {
            Ok(fields) => ActionResult::succeeded(request.kind.clone(), fields),
            Err(e) => {
                warn!("Error executing {}: {}", request.name(), e);
                ActionResult::failed(request.kind.clone(), e.to_string())
            }
        };

        self.settle().await;
        result
    }

    async fn perform(&self, request: &ActionRequest) -> Result<Map<String, Value>, ActionError> {
        let driver = &self.driver;

        match &request.kind {
            // The page already exists
            ActionKind::OpenBrowser => {}

            ActionKind::Navigate => {
                let url = request.string("url");
                let url = url.trim();
                if url.is_empty() {
                    return Err(request.missing("url"));
                }
                let url = ensure_url_scheme(url);
                debug!("Navigating to {}", url);
                driver.navigate(&url).await?;
            }

            ActionKind::ClickAt => {
                let (x, y) = self.pixel_point(request)?;
                driver.click(x, y).await?;
            }

            ActionKind::TypeTextAt => {
                let (x, y) = self.pixel_point(request)?;
                let text = request.string("text");
                let press_enter = request.flag("press_enter", true);
                let clear_before_typing = request.flag("clear_before_typing", true);

                driver.click(x, y).await?;
                if clear_before_typing {
                    driver.press_key(select_all_shortcut()).await?;
                    driver.press_key("Backspace").await?;
                }
                if !text.is_empty() {
                    driver.type_text(&text, self.config.timing.typing_delay).await?;
                }
                if press_enter {
                    driver.press_key("Enter").await?;
                }
            }

            ActionKind::KeyCombination => {
                let keys = normalize_key_combination(&request.string("keys"))
                    .ok_or_else(|| request.missing("keys"))?;
                debug!("Pressing {}", keys);
                driver.press_key(&keys).await?;
            }

            ActionKind::ScrollDocument => {
                let direction = request.string("direction");
                let direction = if direction.trim().is_empty() {
                    ScrollDirection::Down
                } else {
                    ScrollDirection::parse(&direction).ok_or_else(|| {
                        request.invalid("direction", "direction must be up, down, left, or right")
                    })?
                };
                let magnitude = request.integer_or("magnitude", DEFAULT_SCROLL_MAGNITUDE)?;
                let (dx, dy) = direction.delta(magnitude).ok_or_else(|| {
                    request.invalid("magnitude", format!("{magnitude} is out of range"))
                })?;
                debug!("Scrolling {:?} by ({}, {})", direction, dx, dy);
                driver.wheel(dx, dy).await?;
            }

            ActionKind::Unrecognized(name) => {
                warn!("Unimplemented or custom function '{}', skipping", name);
            }
        }

        Ok(Map::new())
    }

    /// `x`/`y` on the 0-1000 grid mapped to viewport pixels
    fn pixel_point(&self, request: &ActionRequest) -> Result<(i64, i64), ActionError> {
        let x = request.integer("x")?;
        let y = request.integer("y")?;
        let viewport = self.config.viewport;
        let point = (to_pixel_x(x, viewport.width), to_pixel_y(y, viewport.height));
        debug!("Grid ({}, {}) -> pixel ({}, {})", x, y, point.0, point.1);
        Ok(point)
    }

    /// Wait for network quiet (bounded, failures ignored), then pause
    async fn settle(&self) {
        let timing = &self.config.timing;
        if let Err(e) = self
            .driver
            .wait_for_network_idle(timing.network_idle_timeout)
            .await
        {
            debug!("Page did not go idle, continuing: {}", e);
        }
        if !timing.settle_delay.is_zero() {
            tokio::time::sleep(timing.settle_delay).await;
        }
    }
}
