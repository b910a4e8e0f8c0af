// src/domain/notification.rs
use crate::domain::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Follow,
    QuizCompleted,
    SkillAdded,
    QuizResult,
    #[serde(other)]
    Other,
}

impl NotificationType {
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationType::Follow => "fas fa-user-plus",
            NotificationType::QuizCompleted => "fas fa-check-circle",
            NotificationType::SkillAdded => "fas fa-plus-circle",
            NotificationType::QuizResult => "fas fa-chart-bar",
            NotificationType::Other => "fas fa-bell",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            NotificationType::Follow => "primary",
            NotificationType::QuizCompleted => "success",
            NotificationType::SkillAdded => "info",
            NotificationType::QuizResult => "warning",
            NotificationType::Other => "secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "type", default = "other_type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

fn other_type() -> NotificationType {
    NotificationType::Other
}

/// Body of `GET /api/notifications/unread-count` and the comment count endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}
