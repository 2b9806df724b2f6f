//! Test fixtures
//!
//! Factory functions for raw API records, pages and the summaries they
//! turn into under the default date formatter.

use crate::content::{PostFields, PostSummary, RawPost};
use crate::source::PageResult;

/// A raw post published on 2021-03-25
pub fn raw_post(uid: &str) -> RawPost {
    RawPost {
        id: format!("id-{}", uid),
        uid: Some(uid.to_string()),
        doc_type: "posts".to_string(),
        first_publication_date: Some("2021-03-25T12:00:00+0000".to_string()),
        data: PostFields {
            title: format!("Title {}", uid),
            subtitle: format!("Subtitle {}", uid),
            author: "Joseph Oliveira".to_string(),
        },
    }
}

/// The summary `raw_post(uid)` becomes
pub fn summary(uid: &str) -> PostSummary {
    PostSummary {
        uid: uid.to_string(),
        first_publication_date: Some("25 mar 2021".to_string()),
        title: format!("Title {}", uid),
        subtitle: format!("Subtitle {}", uid),
        author: "Joseph Oliveira".to_string(),
    }
}

/// A page holding one raw post per uid
pub fn page(page_number: u32, next_page: Option<&str>, uids: &[&str]) -> PageResult {
    PageResult {
        next_page: next_page.map(str::to_string),
        page_number,
        results: uids.iter().map(|uid| raw_post(uid)).collect(),
        total_pages: None,
        total_results_size: None,
    }
}
