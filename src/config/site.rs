//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path};

use crate::error::DateError;
use crate::helpers::{DateFormatter, DEFAULT_DATE_FORMAT};

/// Environment variable overriding `api.endpoint`
pub const ENV_API_ENDPOINT: &str = "PRISMIC_API_ENDPOINT";
/// Environment variable overriding `api.access_token`
pub const ENV_ACCESS_TOKEN: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub root: String,

    // Directory
    pub public_dir: String,
    pub i18n_dir: String,

    // Date format
    pub date_format: String,

    // Pagination
    pub pagination_dir: String,
    #[serde(default)]
    pub listing: ListingConfig,

    // Content API
    #[serde(default)]
    pub api: ApiConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            language: "pt-BR".to_string(),
            timezone: String::new(),

            root: "/".to_string(),

            public_dir: "public".to_string(),
            i18n_dir: "languages".to_string(),

            date_format: DEFAULT_DATE_FORMAT.to_string(),

            pagination_dir: "page".to_string(),
            listing: ListingConfig::default(),

            api: ApiConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the output directories stay inside the site. `clean` and
    /// `generate` delete them recursively.
    pub fn validate(&self) -> Result<()> {
        check_relative_dir("public_dir", &self.public_dir)?;
        check_relative_dir("pagination_dir", &self.pagination_dir)?;
        Ok(())
    }

    /// Override API settings from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Override API settings using the given variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_API_ENDPOINT).filter(|v| !v.is_empty()) {
            tracing::debug!("API endpoint taken from {}", ENV_API_ENDPOINT);
            self.api.endpoint = endpoint;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|v| !v.is_empty()) {
            tracing::debug!("Access token taken from {}", ENV_ACCESS_TOKEN);
            self.api.access_token = Some(token);
        }
    }

    /// Date formatter for the configured language, timezone and pattern
    pub fn date_formatter(&self) -> Result<DateFormatter, DateError> {
        DateFormatter::from_settings(&self.language, &self.timezone, &self.date_format)
    }
}

/// Reject empty, absolute and parent-escaping directory settings
fn check_relative_dir(key: &str, value: &str) -> Result<()> {
    let path = Path::new(value.trim());
    let nested = path
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if value.trim().is_empty() || !nested {
        anyhow::bail!(
            "{} must be a relative directory inside the site, got {:?}",
            key,
            value
        );
    }
    Ok(())
}

/// Content API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Repository API endpoint, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub access_token: Option<String>,
    /// Custom type listed on the home page
    pub document_type: String,
    /// Only list documents carrying one of these tags (empty = all)
    pub tags: Vec<String>,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_token: None,
            document_type: "posts".to_string(),
            tags: Vec::new(),
            page_size: 20,
            timeout_secs: 30,
        }
    }
}

/// Listing generation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Maximum number of static listing pages to write (0 = until exhausted)
    pub max_pages: usize,
}
