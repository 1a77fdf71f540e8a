//! Browser session: the narrow capability surface over a browser backend
//!
//! Everything above this module talks to the browser through
//! [`BrowserSession`], which wraps a [`BrowserDriver`] implementation and
//! owns the run's single browser instance. Three drivers exist: an
//! HTTP-backed driver for server-rendered pages, a scripted stub for tests,
//! and (behind the `chrome` feature) a headless-Chrome driver for pages
//! that need a real browser.

mod driver;
mod http;
mod stub;

#[cfg(feature = "chrome")]
mod chrome;

pub use driver::{BrowserDriver, DriverError, ElementSnapshot};
pub use http::HttpDriver;
pub use stub::StubDriver;

#[cfg(feature = "chrome")]
pub use chrome::ChromeDriver;

use std::time::Duration;

/// The run's exclusively-owned browser handle.
///
/// Adds the configured bounded wait and per-operation tracing on top of
/// the raw driver. Components receive `&mut BrowserSession` for exactly
/// the duration of their call and may not retain it — the `&mut` receiver
/// makes concurrent navigation unrepresentable.
pub struct BrowserSession<D: BrowserDriver> {
    driver: D,
    wait_timeout: Duration,
}

impl<D: BrowserDriver> BrowserSession<D> {
    /// Wraps a driver with the configured element-wait timeout
    pub fn new(driver: D, wait_timeout: Duration) -> Self {
        Self {
            driver,
            wait_timeout,
        }
    }

    /// Navigates to an absolute URL
    pub async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        tracing::debug!("Navigating to {}", url);
        self.driver.navigate(url).await
    }

    /// Waits for at least one element matching `selector`, bounded by the
    /// session timeout
    pub async fn wait_for(&mut self, selector: &str) -> Result<(), DriverError> {
        self.driver
            .wait_for_selector(selector, self.wait_timeout)
            .await
    }

    /// Clicks the first element matching `selector`
    pub async fn click(&mut self, selector: &str) -> Result<(), DriverError> {
        tracing::debug!("Clicking {}", selector);
        self.driver.click(selector).await
    }

    /// Returns owned snapshots of all elements matching `selector`
    pub async fn find_elements(
        &mut self,
        selector: &str,
    ) -> Result<Vec<ElementSnapshot>, DriverError> {
        self.driver.find_elements(selector).await
    }

    /// Releases the underlying browser resource
    pub async fn close(&mut self) -> Result<(), DriverError> {
        self.driver.close().await
    }
}
