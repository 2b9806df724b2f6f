//! prismic-blog: a static blog front page backed by a headless content API
//!
//! The home page lists posts queried from a Prismic repository. The first
//! page of results seeds a `PaginatedList`; every "load more" step fetches
//! the next cursor and appends its posts. `generate` writes one static
//! page per step, `list` walks the same steps in the terminal.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod listing;
pub mod server;
pub mod source;
pub mod templates;

#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use listing::{ListState, PaginatedList};
use source::{ContentSource, PageFetcher, PrismicClient, Query};

/// The blog site
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory.
    ///
    /// Reads `_config.yml` when present, then applies environment overrides.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)
                .with_context(|| format!("Failed to load {}", config_path.display()))?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog instance from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Translations for the configured language, with site overrides
    pub fn i18n(&self) -> Result<i18n::I18n> {
        let mut i18n = i18n::I18n::new(&self.config.language);
        i18n.load_languages(self.base_dir.join(&self.config.i18n_dir))?;
        Ok(i18n)
    }

    /// HTTP client for the configured content API
    pub fn content_source(&self) -> Result<Arc<PrismicClient>> {
        if self.config.api.endpoint.trim().is_empty() {
            anyhow::bail!(
                "No API endpoint configured. Set api.endpoint in _config.yml or {}",
                config::ENV_API_ENDPOINT
            );
        }
        Ok(Arc::new(PrismicClient::from_config(&self.config.api)?))
    }

    /// The home page query
    pub fn listing_query(&self) -> Query {
        Query::documents_of_type(&self.config.api.document_type, self.config.api.page_size)
            .with_tags(&self.config.api.tags)
    }

    /// Query the first page and seed a paginated list with it
    pub async fn open_listing<S>(&self, source: Arc<S>) -> Result<PaginatedList>
    where
        S: ContentSource + PageFetcher + 'static,
    {
        let formatter = self.config.date_formatter()?;
        let query = self.listing_query();

        let first = source
            .query_posts(&query)
            .await
            .context("Failed to query the first page of posts")?;
        tracing::info!(
            "First page: {} posts, next page {}",
            first.results.len(),
            if first.next_page.is_some() { "available" } else { "none" }
        );

        let state = ListState::seed(first, &formatter)?;
        Ok(PaginatedList::new(source, formatter, state))
    }

    /// Generate the static listing pages
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{page, ScriptedApi};

    #[test]
    fn test_new_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.public_dir, dir.path().join("public"));
        assert_eq!(blog.config.api.document_type, "posts");
    }

    #[test]
    fn test_new_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("_config.yml"),
            "title: spacetraveling\npublic_dir: out\napi:\n  page_size: 1\n  tags: [react]\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "spacetraveling");
        assert_eq!(blog.public_dir, dir.path().join("out"));
        assert_eq!(
            blog.listing_query(),
            Query::documents_of_type("posts", 1).with_tags(&["react".to_string()])
        );
    }

    #[test]
    fn test_content_source_requires_endpoint() {
        let blog = Blog::with_config("/tmp/site", config::SiteConfig::default());
        assert!(blog.content_source().is_err());
    }

    #[tokio::test]
    async fn test_open_listing_seeds_from_query() {
        let api = Arc::new(
            ScriptedApi::new().with_page(page(1, Some("https://api.example/2"), &["post-a"])),
        );
        let blog = Blog::with_config("/tmp/site", config::SiteConfig::default());

        let list = blog.open_listing(api.clone()).await.unwrap();
        let state = list.snapshot().await;

        assert_eq!(api.calls(), [r#"[[at(document.type, "posts")]]"#]);
        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.next_cursor.as_deref(), Some("https://api.example/2"));
    }
}
