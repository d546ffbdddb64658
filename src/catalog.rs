//! Runs the configured categories one after another and exports each to CSV

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::exporter::CsvExporter;
use crate::harvester::PageHarvester;
use crate::models::CategoryTarget;
use crate::traits::SessionFactory;

/// A category whose file was written
#[derive(Debug)]
pub struct Exported {
    pub category: String,
    pub products: usize,
    pub path: PathBuf,
}

/// A category that produced no file
#[derive(Debug)]
pub struct Failed {
    pub category: String,
    pub error: anyhow::Error,
}

#[derive(Debug)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub exported: Vec<Exported>,
    pub failed: Vec<Failed>,
}

/// Harvests every configured category in order and exports each one
pub struct Catalog<F> {
    harvester: PageHarvester<F>,
    exporter: CsvExporter,
    categories: Vec<CategoryTarget>,
}

impl<F: SessionFactory> Catalog<F> {
    pub fn new(
        harvester: PageHarvester<F>,
        exporter: CsvExporter,
        categories: Vec<CategoryTarget>,
    ) -> Self {
        Self {
            harvester,
            exporter,
            categories,
        }
    }

    /// Run every category; a failed category is logged and skipped
    pub async fn run(&self) -> RunSummary {
        let started_at = Utc::now();
        let mut exported = Vec::new();
        let mut failed = Vec::new();

        for target in &self.categories {
            let category_started = Utc::now();
            match self.harvest_and_export(target).await {
                Ok((path, products)) => {
                    info!(
                        "Exported {} products for {} to {} in {}s",
                        products,
                        target.name,
                        path.display(),
                        (Utc::now() - category_started).num_seconds()
                    );
                    exported.push(Exported {
                        category: target.name.clone(),
                        products,
                        path,
                    });
                }
                Err(e) => {
                    error!("Skipping category {}: {:#}", target.name, e);
                    failed.push(Failed {
                        category: target.name.clone(),
                        error: e,
                    });
                }
            }
        }

        RunSummary {
            started_at,
            exported,
            failed,
        }
    }

    async fn harvest_and_export(&self, target: &CategoryTarget) -> anyhow::Result<(PathBuf, usize)> {
        let products = self.harvester.harvest(target).await?;
        let path = self.exporter.export(&target.name, &products)?;
        Ok((path, products.len()))
    }
}
