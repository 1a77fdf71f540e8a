//! Scripted in-memory browser driver
//!
//! Maps URLs to fixture HTML and replays them without any I/O, with
//! per-URL failure injection. Lives in the crate proper (not behind
//! `cfg(test)`) so integration tests can drive the full orchestrator
//! against it.

use crate::session::driver::{
    select_outer_html, BrowserDriver, DriverError, DriverResult, ElementSnapshot,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct StubPage {
    html: String,
    fail_navigation: bool,
}

/// A scripted driver serving fixture pages
#[derive(Default)]
pub struct StubDriver {
    pages: HashMap<String, StubPage>,
    current: Option<String>,
    visits: Arc<Mutex<Vec<String>>>,
}

impl StubDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fixture page for an exact URL
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            StubPage {
                html: html.to_string(),
                fail_navigation: false,
            },
        );
        self
    }

    /// Registers a URL whose navigation always fails
    pub fn failing_page(mut self, url: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            StubPage {
                html: String::new(),
                fail_navigation: true,
            },
        );
        self
    }

    /// Shared handle to the navigation log, usable after the driver has
    /// been moved into a session
    pub fn visit_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.visits)
    }

    fn current_page(&self) -> DriverResult<&StubPage> {
        let url = self.current.as_ref().ok_or(DriverError::NoPage)?;
        self.pages.get(url).ok_or(DriverError::NoPage)
    }
}

impl BrowserDriver for StubDriver {
    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.visits.lock().unwrap().push(url.to_string());

        let page = self.pages.get(url).ok_or_else(|| DriverError::Navigation {
            url: url.to_string(),
            message: "no fixture registered".to_string(),
        })?;

        if page.fail_navigation {
            return Err(DriverError::Navigation {
                url: url.to_string(),
                message: "injected failure".to_string(),
            });
        }

        self.current = Some(url.to_string());
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> DriverResult<()> {
        let page = self.current_page()?;
        if select_outer_html(&page.html, selector)?.is_empty() {
            return Err(DriverError::WaitTimeout {
                selector: selector.to_string(),
            });
        }
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> DriverResult<()> {
        let page = self.current_page()?;
        if select_outer_html(&page.html, selector)?.is_empty() {
            return Err(DriverError::ClickFailed {
                selector: selector.to_string(),
            });
        }
        Ok(())
    }

    async fn find_elements(&mut self, selector: &str) -> DriverResult<Vec<ElementSnapshot>> {
        let page = self.current_page()?;
        Ok(select_outer_html(&page.html, selector)?
            .into_iter()
            .map(ElementSnapshot::new)
            .collect())
    }

    async fn close(&mut self) -> DriverResult<()> {
        self.current = None;
        Ok(())
    }
}
