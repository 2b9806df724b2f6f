//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    // Create directory structure
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("languages"))?;

    // Create default _config.yml
    let config_content = r#"# Blog Configuration

# Site
title: Blog
description: ''
language: pt-BR
timezone: ''

# URL
root: /

# Directory
public_dir: public
i18n_dir: languages

# Date format (dd, MMM, MMMM, yyyy, HH, mm, ss)
date_format: dd MMM yyyy

# Pagination
pagination_dir: page
listing:
  max_pages: 0

# Content API
# PRISMIC_API_ENDPOINT and PRISMIC_ACCESS_TOKEN override these values.
api:
  endpoint: https://your-repository.cdn.prismic.io/api/v2
  document_type: posts
  tags: []
  page_size: 1
  timeout_secs: 30
"#;

    fs::write(&config_path, config_content)?;

    Ok(())
}
