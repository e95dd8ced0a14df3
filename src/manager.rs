//! Owner of the one browser session the agent drives
//!
//! The agent core is handed an `Arc<dyn BrowserDriver>`; this manager keeps
//! the Chrome process, its handler task and the page alive behind it, and
//! tears them down in the right order.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::Config;
use crate::agent::Viewport;
use crate::browser::{BrowserDriver, BrowserWrapper, ChromiumDriver, launch_browser};

pub struct BrowserManager {
    browser: Mutex<Option<BrowserWrapper>>,
    driver: Arc<ChromiumDriver>,
}

impl BrowserManager {
    /// Launch Chrome and open the agent page at `config.start_url`
    pub async fn launch(config: &Config) -> Result<Self> {
        let viewport = Viewport::from(&config.screen);
        let (browser, handler, user_data_dir) = launch_browser(&config.browser, viewport).await?;
        let wrapper = BrowserWrapper::new(browser, handler, user_data_dir);

        let page = match wrapper.open_page(&config.start_url).await {
            Ok(page) => page,
            Err(e) => {
                Self::close(wrapper).await;
                return Err(e);
            }
        };

        Ok(Self {
            browser: Mutex::new(Some(wrapper)),
            driver: Arc::new(ChromiumDriver::new(page)),
        })
    }

    pub fn driver(&self) -> Arc<dyn BrowserDriver> {
        self.driver.clone()
    }

    /// Close Chrome, wait for the process to exit, then drop the profile dir
    ///
    /// Safe to call more than once.
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(wrapper) = self.browser.lock().await.take() {
            info!("Shutting down browser");
            Self::close(wrapper).await;
        }
        Ok(())
    }

    async fn close(mut wrapper: BrowserWrapper) {
        if let Err(e) = wrapper.browser_mut().close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = wrapper.browser_mut().wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        wrapper.cleanup_temp_dir();
        // Handler task is aborted when the wrapper drops
        drop(wrapper);
    }
}

impl Drop for BrowserManager {
    fn drop(&mut self) {
        info!("BrowserManager dropping - browser will be cleaned up");
    }
}
