// src/application/repository.rs
use crate::domain::{
    Comment, DomainError, Idea, IdeaDraft, NewComment, NewSkill, Notification, Profile, Skill,
};
use async_trait::async_trait;

#[async_trait]
pub trait IdeaRepository: Send + Sync {
    async fn list_ideas(&self) -> Result<Vec<Idea>, DomainError>;

    async fn get_idea(&self, id: &str) -> Result<Idea, DomainError>;

    /// Uploads as multipart when the draft carries a media file.
    async fn create_idea(&self, draft: &IdeaDraft) -> Result<Idea, DomainError>;

    async fn update_idea(&self, id: &str, draft: &IdeaDraft) -> Result<Idea, DomainError>;

    async fn delete_idea(&self, id: &str) -> Result<(), DomainError>;

    /// Returns the idea with the server's updated like count
    async fn like_idea(&self, id: &str) -> Result<Idea, DomainError>;

    async fn unlike_idea(&self, id: &str) -> Result<Idea, DomainError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments for one idea, newest first
    async fn list_comments(&self, idea_id: &str) -> Result<Vec<Comment>, DomainError>;

    async fn count_comments(&self, idea_id: &str) -> Result<u64, DomainError>;

    async fn add_comment(&self, idea_id: &str, comment: &NewComment)
        -> Result<Comment, DomainError>;

    async fn delete_comment(&self, comment_id: &str) -> Result<(), DomainError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn list_notifications(&self) -> Result<Vec<Notification>, DomainError>;

    async fn unread_count(&self) -> Result<u64, DomainError>;

    async fn mark_read(&self, id: &str) -> Result<(), DomainError>;

    async fn mark_all_read(&self) -> Result<(), DomainError>;
}

#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn list_skills(&self) -> Result<Vec<Skill>, DomainError>;

    async fn add_skill(&self, skill: &NewSkill) -> Result<Skill, DomainError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile(&self) -> Result<Profile, DomainError>;

    async fn update_profile(&self, profile: &Profile) -> Result<Profile, DomainError>;
}

/// Small persistent string map, the local-storage of this client.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), DomainError>;

    fn remove(&mut self, key: &str) -> Result<(), DomainError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DomainError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), DomainError> {
        (**self).remove(key)
    }
}
