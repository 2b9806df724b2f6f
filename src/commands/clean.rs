//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Blog;

/// Remove the generated listing pages
pub fn run(blog: &Blog) -> Result<()> {
    blog.config.validate()?;
    if blog.public_dir.exists() {
        fs::remove_dir_all(&blog.public_dir)?;
        tracing::info!("Deleted: {:?}", blog.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(blog.public_dir.join("page/2")).unwrap();
        fs::write(blog.public_dir.join("index.html"), "<html></html>").unwrap();

        run(&blog).unwrap();
        assert!(!blog.public_dir.exists());

        // Cleaning twice is fine
        run(&blog).unwrap();
    }

    #[test]
    fn test_clean_refuses_parent_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        fs::create_dir_all(&site).unwrap();
        let config = SiteConfig {
            public_dir: "..".to_string(),
            ..SiteConfig::default()
        };

        assert!(run(&Blog::with_config(&site, config)).is_err());
        assert!(site.exists());
    }
}
