//! Post records and summaries

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ContentError;
use crate::helpers::DateFormatter;

/// Deserialize null as the type's default
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// A post document as returned by the content API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPost {
    /// Document id
    #[serde(default)]
    pub id: String,

    /// URL-friendly unique id
    #[serde(default)]
    pub uid: Option<String>,

    /// Custom type of the document
    #[serde(default, rename = "type")]
    pub doc_type: String,

    /// ISO timestamp of the first publication
    #[serde(default)]
    pub first_publication_date: Option<String>,

    /// Custom fields
    pub data: PostFields,
}

/// Custom fields of a post document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFields {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub title: String,

    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub subtitle: String,

    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub author: String,
}

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub uid: String,

    /// Localized publication date, `None` for unpublished documents
    pub first_publication_date: Option<String>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    /// Transform a raw document, formatting its publication date for display
    pub fn from_raw(raw: RawPost, formatter: &DateFormatter) -> Result<Self, ContentError> {
        let uid = match raw.uid {
            Some(uid) if !uid.trim().is_empty() => uid,
            _ => return Err(ContentError::MissingUid(raw.id)),
        };

        let first_publication_date = match raw.first_publication_date.as_deref() {
            Some(date) => Some(formatter.format(date).map_err(|source| {
                ContentError::InvalidDate {
                    uid: uid.clone(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(Self {
            uid,
            first_publication_date,
            title: raw.data.title,
            subtitle: raw.data.subtitle,
            author: raw.data.author,
        })
    }

    /// Path of the post detail view
    pub fn path(&self) -> String {
        crate::helpers::post_path(&self.uid)
    }
}

/// Transform a batch of raw documents, failing on the first bad record
pub fn summarize(
    raws: Vec<RawPost>,
    formatter: &DateFormatter,
) -> Result<Vec<PostSummary>, ContentError> {
    raws.into_iter()
        .map(|raw| PostSummary::from_raw(raw, formatter))
        .collect()
}
