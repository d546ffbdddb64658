use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod browser;
mod catalog;
mod config;
mod error;
mod exporter;
mod extractor;
mod harvester;
mod models;
mod pagination;
mod traits;

use browser::WebDriverFactory;
use catalog::Catalog;
use config::Config;
use exporter::CsvExporter;
use harvester::PageHarvester;
use pagination::PaginationDriver;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Starting catalog harvest of {} categories via {}",
        config.categories.len(),
        config.webdriver_url
    );

    let factory = WebDriverFactory::new(&config.webdriver_url, config.headless);
    let pagination = PaginationDriver::new(
        &config.selectors.load_more,
        config.settle_delay,
        config.max_clicks,
    );
    let harvester = PageHarvester::new(factory, &config.selectors, pagination)?;
    let catalog = Catalog::new(
        harvester,
        CsvExporter::new(&config.output_dir),
        config.categories,
    );

    let summary = catalog.run().await;
    info!(
        "Harvest started at {} finished: {} exported, {} failed",
        summary.started_at.to_rfc3339(),
        summary.exported.len(),
        summary.failed.len()
    );

    for exported in &summary.exported {
        info!(
            "{}: {} products -> {}",
            exported.category,
            exported.products,
            exported.path.display()
        );
    }

    if !summary.failed.is_empty() {
        for failed in &summary.failed {
            error!("{}: {:#}", failed.category, failed.error);
        }
        let names: Vec<_> = summary.failed.iter().map(|f| f.category.as_str()).collect();
        anyhow::bail!("failed to harvest: {}", names.join(", "));
    }

    Ok(())
}
