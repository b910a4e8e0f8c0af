// src/domain/idea.rs
use crate::domain::{wire, DomainError, Listable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    #[serde(other)]
    Other,
}

/// A media attachment as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media<'a> {
    pub url: &'a str,
    pub kind: MediaType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(default)]
    pub likes_count: u32,
}

impl Idea {
    /// Returns the attachment only when both url and a renderable type are present.
    pub fn media(&self) -> Option<Media<'_>> {
        let url = self.media_url.as_deref().filter(|u| !u.is_empty())?;
        match self.media_type? {
            MediaType::Other => None,
            kind => Some(Media { url, kind }),
        }
    }
}

impl Listable for Idea {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn likes(&self) -> u32 {
        self.likes_count
    }
}

/// Payload for creating or updating an idea.
///
/// When `media` is set the upload goes out as a multipart form,
/// otherwise as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdeaDraft {
    pub title: String,
    pub description: String,
    #[serde(skip)]
    pub media: Option<PathBuf>,
}

impl IdeaDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        media: Option<PathBuf>,
    ) -> Result<Self, DomainError> {
        let title = title.into().trim().to_string();
        let description = description.into().trim().to_string();
        if title.is_empty() {
            return Err(DomainError::InvalidInput("Title cannot be empty".to_string()));
        }
        if description.is_empty() {
            return Err(DomainError::InvalidInput(
                "Description cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            title,
            description,
            media,
        })
    }
}
