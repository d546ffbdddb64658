//! Data models for harvested product listings and the categories they come from

use serde::{Deserialize, Serialize};

/// Column order of every exported file. Matches the declaration order of [`Product`].
pub const PRODUCT_FIELDS: [&str; 5] = ["title", "description", "price", "rating", "num_of_reviews"];

/// A product listing extracted from one card on a category page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub rating: u32,
    pub num_of_reviews: u32,
}

/// A named catalog section and the page listing its products
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryTarget {
    /// Category name, also used as the output file base name
    pub name: String,
    pub url: String,
}

impl CategoryTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
