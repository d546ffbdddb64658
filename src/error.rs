//! Error types for extraction, rendering, harvesting, export and configuration

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The five fields of a [`crate::models::Product`], in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Title,
    Description,
    Price,
    Rating,
    NumOfReviews,
}

impl ProductField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Price => "price",
            Self::Rating => "rating",
            Self::NumOfReviews => "num_of_reviews",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to read one field from a card.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("missing {field} element")]
    Missing { field: ProductField },

    #[error("malformed {field} value {value:?}: {reason}")]
    Malformed {
        field: ProductField,
        value: String,
        reason: String,
    },
}

/// Failure to extract a card, tagged with its position on the page.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("card #{index}: {source}")]
pub struct CardError {
    pub index: usize,
    #[source]
    pub source: FieldError,
}

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("invalid {name} selector {selector:?}")]
    InvalidSelector { name: &'static str, selector: String },
}

/// Errors raised by a render session or one of its controls.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The element exists but cannot receive the interaction.
    #[error("element not interactable: {0}")]
    NotInteractable(String),

    #[error("webdriver error: {0}")]
    WebDriver(#[source] thirtyfour::error::WebDriverError),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("render session error for {category}: {source}")]
    Session {
        category: String,
        #[source]
        source: SessionError,
    },

    #[error("load-more interaction failed for {category} after {clicks} clicks: {source}")]
    Interaction {
        category: String,
        clicks: usize,
        #[source]
        source: SessionError,
    },

    #[error("pagination limit reached for {category}: exceeded {max_clicks} load-more clicks")]
    PaginationLimit { category: String, max_clicks: usize },

    #[error("extraction failed for {category} at card #{index}: {source}")]
    Card {
        category: String,
        index: usize,
        #[source]
        source: FieldError,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("failed to read categories file {path}: {source}")]
    CategoriesIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse categories file {path}: {source}")]
    Categories {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
