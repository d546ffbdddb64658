//! Product card extraction
//!
//! Every field has its own parser returning `Result<_, FieldError>`, and
//! [`Extractor::extract_product`] chains them with `?` so the first failing
//! field aborts the card. Parsers work on a static `scraper` snapshot of the
//! page, never on the live session.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{CardError, ExtractorError, FieldError, ProductField};
use crate::models::Product;
use crate::traits::PageSelectors;

const NBSP: char = '\u{a0}';

/// Selectors compiled once per harvester and reused for every card
#[derive(Debug, Clone)]
pub struct Extractor {
    card: Selector,
    title: Selector,
    title_attribute: String,
    description: Selector,
    price: Selector,
    ratings: Selector,
    rating_mark: Selector,
    review_count: Selector,
}

fn compile(name: &'static str, selector: &str) -> Result<Selector, ExtractorError> {
    Selector::parse(selector).map_err(|_| ExtractorError::InvalidSelector {
        name,
        selector: selector.to_string(),
    })
}

fn select_one<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

impl Extractor {
    pub fn new(selectors: &PageSelectors) -> Result<Self, ExtractorError> {
        Ok(Self {
            card: compile("card", &selectors.card)?,
            title: compile("title", &selectors.title)?,
            title_attribute: selectors.title_attribute.clone(),
            description: compile("description", &selectors.description)?,
            price: compile("price", &selectors.price)?,
            ratings: compile("ratings", &selectors.ratings)?,
            rating_mark: compile("rating mark", &selectors.rating_mark)?,
            review_count: compile("review count", &selectors.review_count)?,
        })
    }

    /// Extract every card in document order, failing on the first bad card
    pub fn extract_products(&self, document: &Html) -> Result<Vec<Product>, CardError> {
        let products = document
            .select(&self.card)
            .enumerate()
            .map(|(index, card)| {
                self.extract_product(card)
                    .map_err(|source| CardError { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Extracted {} products", products.len());
        Ok(products)
    }

    pub fn extract_product(&self, card: ElementRef<'_>) -> Result<Product, FieldError> {
        Ok(Product {
            title: self.title(card)?,
            description: self.description(card)?,
            price: self.price(card)?,
            rating: self.rating(card)?,
            num_of_reviews: self.num_of_reviews(card)?,
        })
    }

    fn title(&self, card: ElementRef<'_>) -> Result<String, FieldError> {
        let missing = FieldError::Missing {
            field: ProductField::Title,
        };
        let element = select_one(card, &self.title).ok_or_else(|| missing.clone())?;
        let title = element.value().attr(&self.title_attribute).ok_or(missing)?;

        if title.trim().is_empty() {
            return Err(FieldError::Malformed {
                field: ProductField::Title,
                value: title.to_string(),
                reason: "title is empty".to_string(),
            });
        }
        Ok(title.to_string())
    }

    fn description(&self, card: ElementRef<'_>) -> Result<String, FieldError> {
        select_one(card, &self.description)
            .map(|el| normalize_description(&text_of(el)))
            .ok_or(FieldError::Missing {
                field: ProductField::Description,
            })
    }

    fn price(&self, card: ElementRef<'_>) -> Result<f64, FieldError> {
        let element = select_one(card, &self.price).ok_or(FieldError::Missing {
            field: ProductField::Price,
        })?;
        parse_price(&text_of(element))
    }

    fn rating(&self, card: ElementRef<'_>) -> Result<u32, FieldError> {
        let container = select_one(card, &self.ratings).ok_or(FieldError::Missing {
            field: ProductField::Rating,
        })?;
        let marks = container.select(&self.rating_mark).count();

        u32::try_from(marks).map_err(|e| FieldError::Malformed {
            field: ProductField::Rating,
            value: marks.to_string(),
            reason: e.to_string(),
        })
    }

    fn num_of_reviews(&self, card: ElementRef<'_>) -> Result<u32, FieldError> {
        let element = select_one(card, &self.review_count).ok_or(FieldError::Missing {
            field: ProductField::NumOfReviews,
        })?;
        parse_review_count(&text_of(element))
    }
}

/// Replace non-breaking spaces with ordinary ones
pub fn normalize_description(text: &str) -> String {
    text.replace(NBSP, " ")
}

/// Parse a currency-formatted price such as `$1,149.99`
pub fn parse_price(text: &str) -> Result<f64, FieldError> {
    let malformed = |reason: String| FieldError::Malformed {
        field: ProductField::Price,
        value: text.to_string(),
        reason,
    };

    let trimmed = text.trim();
    let amount = trimmed
        .strip_prefix(|c: char| !c.is_ascii_digit() && c != '.' && c != '-')
        .unwrap_or(trimmed)
        .trim_start()
        .replace(',', "");

    let price = amount
        .parse::<f64>()
        .map_err(|e| malformed(e.to_string()))?;
    if !price.is_finite() {
        return Err(malformed("price is not a finite number".to_string()));
    }
    if price.is_sign_negative() {
        return Err(malformed("price is negative".to_string()));
    }
    Ok(price)
}

/// Parse review text such as `14 reviews`; the first token is the count
pub fn parse_review_count(text: &str) -> Result<u32, FieldError> {
    let malformed = |reason: String| FieldError::Malformed {
        field: ProductField::NumOfReviews,
        value: text.to_string(),
        reason,
    };

    let token = text
        .split_whitespace()
        .next()
        .ok_or_else(|| malformed("no review count".to_string()))?;
    token.parse::<u32>().map_err(|e| malformed(e.to_string()))
}
