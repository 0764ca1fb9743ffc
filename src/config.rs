use std::path::PathBuf;

use dotenvy::dotenv;

use crate::error::AppError;

fn default_plot_dir() -> PathBuf {
    PathBuf::from("plots")
}

fn default_max_bins() -> usize {
    20
}

fn default_max_categories() -> usize {
    50
}

fn default_preview_categories() -> usize {
    10
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub plot_dir: PathBuf,
    /// Upper bound on histogram bins for numeric columns.
    pub max_bins: usize,
    /// Categorical columns with more distinct values than this are truncated.
    pub max_categories: usize,
    /// Number of categories listed for a truncated column.
    pub preview_categories: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plot_dir: default_plot_dir(),
            max_bins: default_max_bins(),
            max_categories: default_max_categories(),
            preview_categories: default_preview_categories(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, AppError> {
        // Load .env file first
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(dir) = lookup("UNIVARIATE_PLOT_DIR").filter(|d| !d.trim().is_empty()) {
            config.plot_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("UNIVARIATE_MAX_BINS") {
            config.max_bins = parse_positive("UNIVARIATE_MAX_BINS", &raw)?;
        }
        if let Some(raw) = lookup("UNIVARIATE_MAX_CATEGORIES") {
            config.max_categories = parse_positive("UNIVARIATE_MAX_CATEGORIES", &raw)?;
        }
        if let Some(raw) = lookup("UNIVARIATE_PREVIEW_CATEGORIES") {
            config.preview_categories = parse_positive("UNIVARIATE_PREVIEW_CATEGORIES", &raw)?;
        }

        if config.preview_categories > config.max_categories {
            return Err(AppError::InvalidConfig(format!(
                "preview of {} categories exceeds the truncation limit of {}",
                config.preview_categories, config.max_categories
            )));
        }

        Ok(config)
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(AppError::InvalidConfig(format!(
            "{} must be a positive integer, got '{}'",
            key, raw
        ))),
        Ok(value) => Ok(value),
    }
}

pub fn load_config() -> Result<Config, AppError> {
    let config = Config::new()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
