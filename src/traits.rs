//! Traits and interfaces for driving a rendered category page

use async_trait::async_trait;

use crate::error::SessionError;

/// CSS selectors for the parts of a category page the harvester touches
#[derive(Debug, Clone)]
pub struct PageSelectors {
    /// Container selector for individual product cards
    pub card: String,
    /// Title element within a card
    pub title: String,
    /// Attribute on the title element carrying the full product name
    pub title_attribute: String,
    /// Description element within a card
    pub description: String,
    /// Price element within a card
    pub price: String,
    /// Ratings container within a card
    pub ratings: String,
    /// Individual rating mark within the ratings container
    pub rating_mark: String,
    /// Review count element within a card
    pub review_count: String,
    /// Control that reveals more cards when clicked
    pub load_more: String,
    /// Cookie consent accept button
    pub cookie_accept: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            card: ".card-body".to_string(),
            title: ".title".to_string(),
            title_attribute: "title".to_string(),
            description: ".description".to_string(),
            price: ".price".to_string(),
            ratings: ".ratings".to_string(),
            rating_mark: "span".to_string(),
            review_count: ".review-count".to_string(),
            load_more: ".ecomerce-items-scroll-more".to_string(),
            cookie_accept: ".acceptCookies".to_string(),
        }
    }
}

/// An interactive element located in a live render session
#[async_trait]
pub trait PageControl: Send + Sync {
    async fn is_displayed(&self) -> Result<bool, SessionError>;

    async fn is_enabled(&self) -> Result<bool, SessionError>;

    async fn scroll_into_view(&self) -> Result<(), SessionError>;

    /// Click the element
    ///
    /// # Errors
    /// * `SessionError::NotInteractable` when the element can no longer receive clicks
    async fn click(&self) -> Result<(), SessionError>;
}

/// A live, navigable browser page
#[async_trait]
pub trait RenderSession: Send {
    type Control: PageControl;

    async fn goto(&mut self, url: &str) -> Result<(), SessionError>;

    /// Find the first element matching a CSS selector
    ///
    /// # Returns
    /// * `Ok(None)` - No element matches; this is not an error
    async fn find_one(&self, selector: &str) -> Result<Option<Self::Control>, SessionError>;

    /// Serialized HTML of the current document
    async fn page_source(&self) -> Result<String, SessionError>;

    /// Release the session and everything it holds
    async fn quit(self) -> Result<(), SessionError>;
}

/// Opens fresh render sessions, one per category harvest
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: RenderSession;

    async fn open(&self) -> Result<Self::Session, SessionError>;
}
