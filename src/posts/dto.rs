use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::posts::repo::PostWithAuthor;

/// Sort key for post listings, named as the wire-level query values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    pub(crate) fn column(self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at",
            SortKey::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    pub author: Option<String>,
    pub tag: Option<String>,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub sort_order: SortOrder,
}

/// Body shared by create and update. Update replaces all four mutable fields
/// at once, so both operations validate the same required pair; an omitted
/// tag list comes through empty and overwrites whatever was stored.
#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub title: Option<String>,
    pub author: Option<String>,
    pub contents: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug)]
pub struct ValidPostBody {
    pub title: String,
    pub author: String,
    pub contents: Option<String>,
    pub tags: Vec<String>,
}

impl PostBody {
    pub fn validate(self) -> Result<ValidPostBody, ApiError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::validation("title is required"))?;
        let author = self
            .author
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| ApiError::validation("author is required"))?;
        Ok(ValidPostBody {
            title,
            author,
            contents: self.contents,
            tags: self.tags,
        })
    }
}

/// A post as consumers see it: `author` carries the username, never the
/// reference id.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub contents: Option<String>,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<PostWithAuthor> for PostResponse {
    fn from(p: PostWithAuthor) -> Self {
        Self {
            id: p.id,
            title: p.title,
            author: p.author,
            contents: p.contents,
            tags: p.tags,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
