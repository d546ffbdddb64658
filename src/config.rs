//! Runtime configuration loaded from the environment (and `.env` via `dotenvy`)

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::CategoryTarget;
use crate::traits::PageSelectors;

const BASE_URL: &str = "https://webscraper.io/test-sites/e-commerce/more";

const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;
const DEFAULT_MAX_CLICKS: usize = 500;

#[derive(Debug, Clone)]
pub struct Config {
    pub webdriver_url: String,
    pub headless: bool,
    /// Directory receiving one `<category>.csv` per harvested category
    pub output_dir: PathBuf,
    /// Wait between scrolling the load-more control into view and clicking it
    pub settle_delay: Duration,
    pub max_clicks: usize,
    pub selectors: PageSelectors,
    pub categories: Vec<CategoryTarget>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            output_dir: PathBuf::from("."),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            max_clicks: DEFAULT_MAX_CLICKS,
            selectors: PageSelectors::default(),
            categories: default_categories(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let categories = match lookup("CATEGORIES_FILE") {
            Some(path) => load_categories(Path::new(&path))?,
            None => defaults.categories,
        };

        Ok(Self {
            webdriver_url: lookup("WEBDRIVER_URL").unwrap_or(defaults.webdriver_url),
            headless: parse_bool("HEADLESS", lookup("HEADLESS"), defaults.headless)?,
            output_dir: lookup("OUTPUT_DIR").map_or(defaults.output_dir, PathBuf::from),
            settle_delay: Duration::from_millis(parse_var(
                "SETTLE_DELAY_MS",
                lookup("SETTLE_DELAY_MS"),
                DEFAULT_SETTLE_DELAY_MS,
            )?),
            max_clicks: parse_max_clicks(lookup("MAX_LOAD_MORE_CLICKS"), defaults.max_clicks)?,
            selectors: defaults.selectors,
            categories,
        })
    }
}

/// The demo store's category pages
pub fn default_categories() -> Vec<CategoryTarget> {
    let computers = format!("{BASE_URL}/computers");
    let phones = format!("{BASE_URL}/phones");

    vec![
        CategoryTarget::new("home", BASE_URL),
        CategoryTarget::new("computers", computers.clone()),
        CategoryTarget::new("laptops", format!("{computers}/laptops")),
        CategoryTarget::new("tablets", format!("{computers}/tablets")),
        CategoryTarget::new("phones", phones.clone()),
        CategoryTarget::new("touch", format!("{phones}/touch")),
    ]
}

/// Load a JSON array of `{ "name": ..., "url": ... }` objects
pub fn load_categories(path: &Path) -> Result<Vec<CategoryTarget>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::CategoriesIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Categories {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_var<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

/// A limit of zero would fail every page that shows the load-more control
fn parse_max_clicks(raw: Option<String>, default: usize) -> Result<usize, ConfigError> {
    let key = "MAX_LOAD_MORE_CLICKS";
    match parse_var(key, raw.clone(), default)? {
        0 => Err(ConfigError::Invalid {
            key,
            value: raw.unwrap_or_default(),
        }),
        max_clicks => Ok(max_clicks),
    }
}

fn parse_bool(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let normalized = raw.as_deref().map(|v| v.trim().to_ascii_lowercase());
    match normalized {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::Invalid {
            key,
            value: raw.unwrap_or_default(),
        }),
    }
}
