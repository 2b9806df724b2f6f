//! List posts in the terminal, loading more pages on demand

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::content::PostSummary;
use crate::i18n::I18n;
use crate::listing::{LoadOutcome, PaginatedList};
use crate::Blog;

/// Show the first page, then load one more page per Enter (or all pages
/// at once with `all`)
pub async fn run(blog: &Blog, all: bool) -> Result<()> {
    let source = blog.content_source()?;
    let list = blog.open_listing(source).await?;
    let i18n = blog.i18n()?;

    let input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    walk(&list, &i18n, all, input, &mut out).await
}

/// Drive the listing from an input stream.
/// An empty line loads the next page, `q` or end of input stops.
pub async fn walk<R, W>(
    list: &PaginatedList,
    i18n: &I18n,
    all: bool,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut shown = 0;

    let state = list.snapshot().await;
    for post in &state.posts {
        writeln!(out, "{}", format_post_line(post))?;
    }
    shown += state.posts.len();

    loop {
        if list.is_exhausted().await {
            writeln!(out, "{}", i18n.get("all_loaded"))?;
            break;
        }

        if !all {
            writeln!(out, "{}", i18n.get("load_more_prompt"))?;
            out.flush()?;
            match lines.next_line().await? {
                Some(line) if line.trim().eq_ignore_ascii_case("q") => break,
                Some(_) => {}
                None => break,
            }
        }

        match list.load_next_page().await {
            Ok(LoadOutcome::Loaded { .. }) => {
                let state = list.snapshot().await;
                for post in &state.posts[shown..] {
                    writeln!(out, "{}", format_post_line(post))?;
                }
                shown = state.posts.len();
            }
            Ok(_) => {}
            Err(e) => {
                writeln!(out, "{} ({})", i18n.get("load_failed"), e)?;
                if all {
                    break;
                }
            }
        }
    }

    writeln!(out, "{}", i18n.get_plural("posts_loaded", shown))?;
    Ok(())
}

/// One terminal line per post
pub fn format_post_line(post: &PostSummary) -> String {
    let date = post.first_publication_date.as_deref().unwrap_or("-");
    format!(
        "  {} - {} ({}) [{}]",
        date,
        post.title,
        post.author,
        post.path()
    )
}
