//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Query the content API and write the listing pages
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let source = blog.content_source()?;
    let list = blog.open_listing(source).await?;

    let generator = Generator::new(blog)?;
    let report = generator.generate(&list).await?;

    tracing::info!(
        "Wrote {} pages with {} posts{}",
        report.pages_written,
        report.posts,
        if report.complete { "" } else { " (listing not exhausted)" }
    );

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
