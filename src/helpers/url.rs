//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/post/hello") // -> "/blog/post/hello"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Path of the detail view for a post uid
pub fn post_path(uid: &str) -> String {
    format!("/post/{}", utf8_percent_encode(uid, SEGMENT))
}

/// Path of the static page holding the listing after `step` loads
pub fn listing_path(config: &SiteConfig, step: usize) -> String {
    if step <= 1 {
        url_for(config, "/")
    } else {
        url_for(config, &format!("{}/{}/", config.pagination_dir, step))
    }
}
