//! Generator module - writes the static listing pages
//!
//! Step 1 is the seeded list and lands in `index.html`. Each later step is
//! the list after one more `load_next_page` and lands in
//! `{pagination_dir}/{step}/index.html`; the load-more control of every
//! page links to the next step.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::helpers::listing_path;
use crate::i18n::I18n;
use crate::listing::{ListState, LoadOutcome, PaginatedList};
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Summary of a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub pages_written: usize,
    pub posts: usize,
    /// Whether the listing reached its last page
    pub complete: bool,
}

/// Static listing generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    i18n: I18n,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            renderer: TemplateRenderer::new()?,
            i18n: blog.i18n()?,
        })
    }

    /// Write one page per load step until the list is exhausted, the
    /// configured page cap is hit, or a load fails
    pub async fn generate(&self, list: &PaginatedList) -> Result<GenerateReport> {
        self.blog.config.validate()?;
        fs::create_dir_all(&self.blog.public_dir)?;

        let pagination_root = self.blog.public_dir.join(&self.blog.config.pagination_dir);
        if pagination_root.exists() {
            fs::remove_dir_all(&pagination_root)?;
        }

        let max_pages = self.blog.config.listing.max_pages;
        let mut step = 1;

        loop {
            let state = list.snapshot().await;
            let continues = !state.is_exhausted() && (max_pages == 0 || step < max_pages);
            let href = continues.then(|| listing_path(&self.blog.config, step + 1));
            self.write_step(step, &state, href)?;

            if !continues {
                if !state.is_exhausted() {
                    tracing::info!("Stopped after {} pages (listing.max_pages)", step);
                }
                break;
            }

            match list.load_next_page().await {
                Ok(LoadOutcome::Loaded { .. }) => step += 1,
                Ok(outcome) => {
                    tracing::debug!("Stopping at step {}: {:?}", step, outcome);
                    break;
                }
                Err(e) => {
                    tracing::warn!("Stopping at step {}: {}", step, e);
                    // Rewrite the last page with the inline error and no link
                    let state = list.snapshot().await;
                    self.write_step(step, &state, None)?;
                    break;
                }
            }
        }

        let state = list.snapshot().await;
        Ok(GenerateReport {
            pages_written: step,
            posts: state.posts.len(),
            complete: state.is_exhausted(),
        })
    }

    /// Output file of a step
    pub fn step_path(&self, step: usize) -> PathBuf {
        if step <= 1 {
            self.blog.public_dir.join("index.html")
        } else {
            self.blog
                .public_dir
                .join(&self.blog.config.pagination_dir)
                .join(step.to_string())
                .join("index.html")
        }
    }

    fn write_step(&self, step: usize, state: &ListState, href: Option<String>) -> Result<()> {
        let html = self
            .renderer
            .render_listing(&self.blog.config, &self.i18n, state, href)?;

        let output_path = self.step_path(step);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::error::SourceError;
    use crate::helpers::DateFormatter;
    use crate::test_utils::{page, ScriptedApi};
    use std::sync::Arc;

    fn list_for(api: Arc<ScriptedApi>, first: crate::source::PageResult) -> PaginatedList {
        let formatter = DateFormatter::default();
        let state = ListState::seed(first, &formatter).unwrap();
        PaginatedList::new(api, formatter, state)
    }

    fn blog_in(dir: &std::path::Path, config: SiteConfig) -> Blog {
        Blog::with_config(dir, config)
    }

    #[tokio::test]
    async fn test_generates_one_page_per_step() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path(), SiteConfig::default());
        let api = Arc::new(
            ScriptedApi::new()
                .with_page(page(2, Some("https://api.example/3"), &["post-b"]))
                .with_page(page(3, None, &["post-c"])),
        );
        let list = list_for(api, page(1, Some("https://api.example/2"), &["post-a"]));

        let generator = Generator::new(&blog).unwrap();
        let report = generator.generate(&list).await.unwrap();
        assert_eq!(
            report,
            GenerateReport {
                pages_written: 3,
                posts: 3,
                complete: true
            }
        );

        let index = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        assert!(index.contains(r#"href="/page/2/""#));
        assert!(index.contains("/post/post-a"));
        assert!(!index.contains("/post/post-b"));

        let second = fs::read_to_string(dir.path().join("public/page/2/index.html")).unwrap();
        assert!(second.contains("/post/post-a") && second.contains("/post/post-b"));
        assert!(second.contains(r#"href="/page/3/""#));

        let last = fs::read_to_string(dir.path().join("public/page/3/index.html")).unwrap();
        assert!(last.contains("/post/post-c"));
        assert!(last.contains("Você já carregou todos os posts"));
    }

    #[tokio::test]
    async fn test_single_page_listing() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path(), SiteConfig::default());
        let api = Arc::new(ScriptedApi::new());
        let list = list_for(api.clone(), page(1, None, &["post-a"]));

        let report = Generator::new(&blog).unwrap().generate(&list).await.unwrap();

        assert_eq!(report.pages_written, 1);
        assert!(api.calls().is_empty());
        let index = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        assert!(index.contains("Você já carregou todos os posts"));
        assert!(!dir.path().join("public/page").exists());
    }

    #[tokio::test]
    async fn test_max_pages_caps_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.listing.max_pages = 2;
        let blog = blog_in(dir.path(), config);
        let api = Arc::new(
            ScriptedApi::new()
                .with_page(page(2, Some("https://api.example/3"), &["post-b"]))
                .with_page(page(3, None, &["post-c"])),
        );
        let list = list_for(api.clone(), page(1, Some("https://api.example/2"), &["post-a"]));

        let report = Generator::new(&blog).unwrap().generate(&list).await.unwrap();

        assert_eq!(report.pages_written, 2);
        assert!(!report.complete);
        assert_eq!(api.calls().len(), 1);
        let second = fs::read_to_string(dir.path().join("public/page/2/index.html")).unwrap();
        assert!(second.contains("disabled>Carregar mais posts</button>"));
    }

    #[tokio::test]
    async fn test_failed_load_rewrites_page_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path(), SiteConfig::default());
        let api = Arc::new(ScriptedApi::new().with_error(SourceError::Api {
            status: 502,
            message: "bad gateway".into(),
        }));
        let list = list_for(api, page(1, Some("https://api.example/2"), &["post-a"]));

        let report = Generator::new(&blog).unwrap().generate(&list).await.unwrap();

        assert_eq!(report.pages_written, 1);
        assert!(!report.complete);
        let index = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        assert!(index.contains("Não foi possível carregar mais posts."));
        assert!(!index.contains(r#"href="/page/2/""#));
    }

    #[tokio::test]
    async fn test_escaping_pagination_dir_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        fs::create_dir_all(&site).unwrap();
        fs::write(site.join("_config.yml"), "title: keep me\n").unwrap();

        let config = SiteConfig {
            pagination_dir: "../..".to_string(),
            ..SiteConfig::default()
        };
        let blog = blog_in(&site, config);
        let api = Arc::new(ScriptedApi::new());
        let list = list_for(api.clone(), page(1, Some("https://api.example/2"), &["post-a"]));

        let generator = Generator::new(&blog).unwrap();
        assert!(generator.generate(&list).await.is_err());

        assert!(site.join("_config.yml").exists());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_step_paths() {
        let blog = Blog::with_config("/site", SiteConfig::default());
        let generator = Generator::new(&blog).unwrap();
        assert_eq!(generator.step_path(1), PathBuf::from("/site/public/index.html"));
        assert_eq!(
            generator.step_path(4),
            PathBuf::from("/site/public/page/4/index.html")
        );
    }
}
