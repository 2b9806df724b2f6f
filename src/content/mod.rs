//! Content module - post records coming from the content API

mod post;

pub use post::{summarize, PostFields, PostSummary, RawPost};
