//! WebDriver-backed render sessions
//!
//! Talks to a running WebDriver server (chromedriver, selenium) through
//! `thirtyfour`. Each category harvest gets its own browser session.

use async_trait::async_trait;
use fantoccini::error::CmdError;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tracing::{debug, info};

use crate::error::SessionError;
use crate::traits::{PageControl, RenderSession, SessionFactory};

/// W3C error code sent when a click lands on an element that cannot take it
const NOT_INTERACTABLE: &str = "element not interactable";

/// The W3C error code carried by `err`, if the server sent one
fn w3c_code(err: &WebDriverError) -> Option<&'static str> {
    match err {
        WebDriverError::CmdError(CmdError::Standard(e)) => Some(e.error()),
        _ => None,
    }
}

fn is_not_interactable(code: Option<&str>) -> bool {
    code == Some(NOT_INTERACTABLE)
}

impl From<WebDriverError> for SessionError {
    fn from(err: WebDriverError) -> Self {
        if is_not_interactable(w3c_code(&err)) {
            Self::NotInteractable(err.to_string())
        } else {
            Self::WebDriver(err)
        }
    }
}

/// Opens Chrome sessions against a WebDriver endpoint
#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    server_url: String,
    headless: bool,
}

impl WebDriverFactory {
    pub fn new(server_url: impl Into<String>, headless: bool) -> Self {
        Self {
            server_url: server_url.into(),
            headless,
        }
    }
}

#[async_trait]
impl SessionFactory for WebDriverFactory {
    type Session = WebDriverSession;

    async fn open(&self) -> Result<WebDriverSession, SessionError> {
        if self.server_url.trim().is_empty() {
            return Err(SessionError::Other("WebDriver URL is empty".to_string()));
        }

        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless()?;
        }

        debug!("Opening WebDriver session at {}", self.server_url);
        let driver = WebDriver::new(&self.server_url, caps).await?;
        Ok(WebDriverSession { driver })
    }
}

/// A live browser window
pub struct WebDriverSession {
    driver: WebDriver,
}

#[async_trait]
impl RenderSession for WebDriverSession {
    type Control = WebElement;

    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        info!("Navigating to {}", url);
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn find_one(&self, selector: &str) -> Result<Option<WebElement>, SessionError> {
        let elements = self.driver.find_all(By::Css(selector)).await?;
        Ok(elements.into_iter().next())
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        Ok(self.driver.source().await?)
    }

    async fn quit(self) -> Result<(), SessionError> {
        self.driver.quit().await?;
        debug!("WebDriver session closed");
        Ok(())
    }
}

#[async_trait]
impl PageControl for WebElement {
    async fn is_displayed(&self) -> Result<bool, SessionError> {
        Ok(WebElement::is_displayed(self).await?)
    }

    async fn is_enabled(&self) -> Result<bool, SessionError> {
        Ok(WebElement::is_enabled(self).await?)
    }

    async fn scroll_into_view(&self) -> Result<(), SessionError> {
        Ok(WebElement::scroll_into_view(self).await?)
    }

    async fn click(&self) -> Result<(), SessionError> {
        Ok(WebElement::click(self).await?)
    }
}
