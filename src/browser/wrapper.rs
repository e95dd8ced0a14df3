//! Browser lifecycle: launch, page creation and teardown

use anyhow::{Context, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::info;

use crate::BrowserConfig;
use crate::agent::Viewport;

/// Chrome process, its CDP handler task and the throwaway profile
///
/// Owned by `BrowserManager` for the whole run. The agent only ever sees the
/// one page opened through [`BrowserWrapper::open_page`].
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, user_data_dir: PathBuf) -> Self {
        Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        }
    }

    pub(crate) fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Open the single page the agent drives
    pub async fn open_page(&self, url: &str) -> Result<Page> {
        let page = self
            .browser
            .new_page(url)
            .await
            .with_context(|| format!("Failed to open page at {url}"))?;
        info!("Opened page at {}", url);
        Ok(page)
    }

    /// Remove the temporary profile directory
    ///
    /// MUST be called AFTER `browser.wait()` completes so Chrome has
    /// released its file handles.
    pub fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            info!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                tracing::warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();

        if let Some(path) = &self.user_data_dir {
            tracing::warn!("Browser dropped before shutdown, leaving profile at {}", path.display());
        }
    }
}

/// Launch a browser whose viewport matches the coordinate contract
///
/// Returns the browser, its CDP handler task and the temporary profile
/// directory that must be removed after shutdown.
pub async fn launch_browser(
    config: &BrowserConfig,
    viewport: Viewport,
) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    info!(
        "Launching browser ({}x{}, headless: {})",
        viewport.width, viewport.height, config.headless
    );

    let user_data_dir =
        std::env::temp_dir().join(format!("computer_use_browser_{}", std::process::id()));

    let (browser, handler) = crate::browser_setup::launch_browser(
        config.headless,
        Some(user_data_dir.clone()),
        config.disable_security,
        viewport,
    )
    .await?;

    Ok((browser, handler, user_data_dir))
}
