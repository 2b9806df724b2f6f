//! Built-in listing templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on because
//! titles, subtitles and author names come straight from the content API.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::PostSummary;
use crate::helpers::url_for;
use crate::i18n::I18n;
use crate::listing::ListState;

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            (
                "partials/load_more.html",
                include_str!("blog/partials/load_more.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the listing page for a list state.
    ///
    /// `load_more_href` is where the load-more control points; it is only
    /// used while the state still has a cursor.
    pub fn render_listing(
        &self,
        config: &SiteConfig,
        i18n: &I18n,
        state: &ListState,
        load_more_href: Option<String>,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("config", &ConfigData::from_config(config));
        context.insert("labels", &LabelData::from_i18n(i18n));
        context.insert("listing", &ListingData::from_state(config, state, load_more_href));
        context.insert("generator_version", env!("CARGO_PKG_VERSION"));
        self.render("index.html", &context)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub uid: String,
    pub path: String,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub author: String,
}

impl PostData {
    pub fn from_summary(config: &SiteConfig, post: &PostSummary) -> Self {
        Self {
            uid: post.uid.clone(),
            path: url_for(config, &post.path()),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            date: post.first_publication_date.clone().unwrap_or_default(),
            author: post.author.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingData {
    pub posts: Vec<PostData>,
    pub current_page: u32,
    pub exhausted: bool,
    pub load_more_href: Option<String>,
    pub error: Option<String>,
}

impl ListingData {
    pub fn from_state(
        config: &SiteConfig,
        state: &ListState,
        load_more_href: Option<String>,
    ) -> Self {
        let exhausted = state.is_exhausted();
        Self {
            posts: state
                .posts
                .iter()
                .map(|p| PostData::from_summary(config, p))
                .collect(),
            current_page: state.current_page,
            exhausted,
            load_more_href: if exhausted { None } else { load_more_href },
            error: state.last_error.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub root: String,
}

impl ConfigData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            root: url_for(config, "/"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelData {
    pub home: String,
    pub load_more: String,
    pub all_loaded: String,
    pub load_failed: String,
}

impl LabelData {
    pub fn from_i18n(i18n: &I18n) -> Self {
        Self {
            home: i18n.get("home"),
            load_more: i18n.get("load_more"),
            all_loaded: i18n.get("all_loaded"),
            load_failed: i18n.get("load_failed"),
        }
    }
}
