// src/application/notifications.rs
use crate::application::NotificationRepository;
use crate::domain::{DomainError, Notification};
use tracing::{info, warn};

/// Last fetched notification list plus the inline error line.
pub struct NotificationCenter<R: NotificationRepository> {
    repository: R,
    notifications: Vec<Notification>,
    error: Option<String>,
}

impl<R: NotificationRepository> NotificationCenter<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            notifications: Vec::new(),
            error: None,
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Unread entries in the current list, no server call.
    pub fn unread(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// A failed refresh keeps the previous list.
    pub async fn refresh(&mut self) -> Result<(), DomainError> {
        match self.repository.list_notifications().await {
            Ok(notifications) => {
                info!(count = notifications.len(), "Fetched notifications");
                self.notifications = notifications;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch notifications");
                self.error = Some("Failed to fetch notifications".to_string());
                Err(e)
            }
        }
    }

    pub async fn unread_count(&self) -> Result<u64, DomainError> {
        self.repository.unread_count().await
    }

    pub async fn mark_read(&mut self, id: &str) -> Result<(), DomainError> {
        if let Err(e) = self.repository.mark_read(id).await {
            self.error = Some("Failed to mark notification as read".to_string());
            return Err(e);
        }
        self.refresh().await
    }

    pub async fn mark_all_read(&mut self) -> Result<(), DomainError> {
        if let Err(e) = self.repository.mark_all_read().await {
            self.error = Some("Failed to mark all notifications as read".to_string());
            return Err(e);
        }
        self.refresh().await
    }
}
