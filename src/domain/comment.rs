// src/domain/comment.rs
use crate::domain::{wire, DomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(deserialize_with = "wire::id")]
    pub idea_id: String,
    #[serde(default = "anonymous", deserialize_with = "author_or_anonymous")]
    pub author: String,
    pub content: String,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
}

fn anonymous() -> String {
    ANONYMOUS_AUTHOR.to_string()
}

fn author_or_anonymous<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let author = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_author(author.as_deref()))
}

fn normalize_author(author: Option<&str>) -> String {
    match author.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => anonymous(),
    }
}

/// Comment body sent to `POST /api/comments/idea/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub content: String,
    pub author: String,
}

impl NewComment {
    pub fn new(content: &str, author: Option<&str>) -> Result<Self, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::InvalidInput(
                "Comment cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            content: content.to_string(),
            author: normalize_author(author),
        })
    }
}
