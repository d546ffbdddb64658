//! Single-category harvest: open a session, expand the page, extract every card
//!
//! The render session is always released, whether the harvest succeeds or fails.

use scraper::Html;
use tracing::{info, warn};

use crate::error::{ExtractorError, HarvestError, SessionError};
use crate::extractor::Extractor;
use crate::models::{CategoryTarget, Product};
use crate::pagination::{PaginationDriver, PaginationFailure, dismiss_cookie_banner};
use crate::traits::{PageSelectors, RenderSession, SessionFactory};

/// Harvests one category page at a time through sessions from `F`
pub struct PageHarvester<F> {
    factory: F,
    pagination: PaginationDriver,
    extractor: Extractor,
    cookie_accept: String,
}

impl<F: SessionFactory> PageHarvester<F> {
    pub fn new(
        factory: F,
        selectors: &PageSelectors,
        pagination: PaginationDriver,
    ) -> Result<Self, ExtractorError> {
        Ok(Self {
            factory,
            pagination,
            extractor: Extractor::new(selectors)?,
            cookie_accept: selectors.cookie_accept.clone(),
        })
    }

    /// Fetch every product listed on `target`, in page order
    ///
    /// The session is released whether or not the harvest succeeds.
    pub async fn harvest(&self, target: &CategoryTarget) -> Result<Vec<Product>, HarvestError> {
        let mut session = self
            .factory
            .open()
            .await
            .map_err(|source| session_error(target, source))?;

        let result = self.harvest_with(&mut session, target).await;

        if let Err(e) = session.quit().await {
            warn!("Failed to release session for {}: {}", target.name, e);
        }
        result
    }

    async fn harvest_with(
        &self,
        session: &mut F::Session,
        target: &CategoryTarget,
    ) -> Result<Vec<Product>, HarvestError> {
        session
            .goto(&target.url)
            .await
            .map_err(|source| session_error(target, source))?;

        dismiss_cookie_banner(&*session, &self.cookie_accept).await;

        let outcome = self
            .pagination
            .expand(&*session)
            .await
            .map_err(|failure| match failure {
                PaginationFailure::Interaction { clicks, source } => HarvestError::Interaction {
                    category: target.name.clone(),
                    clicks,
                    source,
                },
                PaginationFailure::Limit { max_clicks } => HarvestError::PaginationLimit {
                    category: target.name.clone(),
                    max_clicks,
                },
            })?;

        let html = session
            .page_source()
            .await
            .map_err(|source| session_error(target, source))?;

        let products = {
            let document = Html::parse_document(&html);
            self.extractor
                .extract_products(&document)
                .map_err(|e| HarvestError::Card {
                    category: target.name.clone(),
                    index: e.index,
                    source: e.source,
                })?
        };

        info!(
            "Harvested {} products from {} ({} load-more clicks)",
            products.len(),
            target.name,
            outcome.clicks
        );
        Ok(products)
    }
}

fn session_error(target: &CategoryTarget, source: SessionError) -> HarvestError {
    HarvestError::Session {
        category: target.name.clone(),
        source,
    }
}
