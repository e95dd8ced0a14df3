//! Browser infrastructure: Chrome launch, page lifecycle and the input driver
//!
//! The agent core never touches chromiumoxide directly; it talks to a
//! [`BrowserDriver`]. [`ChromiumDriver`] is the production implementation
//! bound to one live page.

mod chromium;
mod driver;
mod keyboard;
mod wrapper;

pub use crate::browser_setup::{download_managed_browser, find_browser_executable};
pub use chromium::ChromiumDriver;
pub use driver::BrowserDriver;
pub use wrapper::{BrowserWrapper, launch_browser};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Input dispatch failed: {0}")]
    InputFailed(String),

    #[error("Unknown key '{0}'")]
    UnknownKey(String),

    #[error("Page capture failed: {0}")]
    CaptureFailed(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

pub type BrowserResult<T> = Result<T, BrowserError>;
