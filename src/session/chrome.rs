//! Headless-Chrome browser driver
//!
//! For pages that only render under script execution. The crawl is
//! sequential by design, so the blocking CDP calls run inline on the
//! single logical thread.

use crate::session::driver::{BrowserDriver, DriverError, DriverResult, ElementSnapshot};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;

/// Browser driver backed by a headless Chrome process
pub struct ChromeDriver {
    // Held for its Drop: closing the browser tears down the tab too
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeDriver {
    /// Launches a headless Chrome instance and opens its single tab
    ///
    /// # Returns
    ///
    /// * `Ok(ChromeDriver)` - Browser process running
    /// * `Err(DriverError::Startup)` - Chrome could not be launched
    pub fn new() -> DriverResult<Self> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((1920, 1080)))
            .build()
            .map_err(|e| DriverError::Startup(e.to_string()))?;

        let browser = Browser::new(options).map_err(|e| DriverError::Startup(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| DriverError::Startup(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl BrowserDriver for ChromeDriver {
    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> DriverResult<()> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ())
            .map_err(|_| DriverError::WaitTimeout {
                selector: selector.to_string(),
            })
    }

    async fn click(&mut self, selector: &str) -> DriverResult<()> {
        let element = self
            .tab
            .find_element(selector)
            .map_err(|_| DriverError::ClickFailed {
                selector: selector.to_string(),
            })?;
        element.click().map_err(|e| DriverError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn find_elements(&mut self, selector: &str) -> DriverResult<Vec<ElementSnapshot>> {
        let elements = match self.tab.find_elements(selector) {
            Ok(elements) => elements,
            // CDP reports "no matches" as an error; the crawler's fallback
            // chains expect an empty list
            Err(_) => return Ok(Vec::new()),
        };

        let mut snapshots = Vec::with_capacity(elements.len());
        for element in elements {
            let html = element
                .get_content()
                .map_err(|e| DriverError::Backend(e.to_string()))?;
            snapshots.push(ElementSnapshot::new(html));
        }
        Ok(snapshots)
    }

    async fn close(&mut self) -> DriverResult<()> {
        // The browser process exits when `_browser` drops; nothing to do
        // eagerly beyond closing the tab.
        self.tab
            .close(true)
            .map(|_| ())
            .map_err(|e| DriverError::Backend(e.to_string()))
    }
}
