// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashSet;
use std::env;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{
    CommentRepository, IdeaRepository, NotificationRepository, ProfileRepository, SkillRepository,
};
use crate::domain::comment::ANONYMOUS_AUTHOR;
use crate::domain::{
    Comment, DomainError, Idea, IdeaDraft, NewComment, NewSkill, Notification, NotificationType,
    Profile, Skill,
};

/// Fixed instant all fixtures are dated from.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Idea created `minutes` after [`base_time`].
pub fn idea(id: &str, title: &str, description: &str, minutes: i64, likes: u32) -> Idea {
    Idea {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        created_at: base_time() + Duration::minutes(minutes),
        media_url: None,
        media_type: None,
        public_id: None,
        likes_count: likes,
    }
}

pub fn comment(id: &str, idea_id: &str, content: &str, minutes: i64) -> Comment {
    Comment {
        id: id.to_string(),
        idea_id: idea_id.to_string(),
        author: ANONYMOUS_AUTHOR.to_string(),
        content: content.to_string(),
        created_at: base_time() + Duration::minutes(minutes),
    }
}

pub fn notification(id: &str, read: bool) -> Notification {
    Notification {
        id: id.to_string(),
        kind: NotificationType::SkillAdded,
        title: format!("Notification {id}"),
        message: "Someone added a new skill".to_string(),
        created_at: base_time(),
        read,
    }
}

#[derive(Default)]
struct MockState {
    ideas: Vec<Idea>,
    comments: Vec<Comment>,
    notifications: Vec<Notification>,
    skills: Vec<Skill>,
    profile: Profile,
    failing: HashSet<String>,
    stalled: HashSet<String>,
    calls: Vec<String>,
    next_id: u64,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// In-memory stand-in for the REST API.
///
/// Implements every repository trait over shared state, so one instance can
/// back a board, a notification center and a profile editor at once. Any
/// operation can be switched to fail with [`MockApi::fail`].
///
/// # Examples
///
/// ```
/// use skillboard::util::testing::{idea, MockApi};
///
/// let api = MockApi::builder()
///     .with_idea(idea("1", "Teach knitting", "Weekly class", 0, 2))
///     .failing("delete_idea")
///     .build();
/// assert!(api.calls().is_empty());
/// ```
pub struct MockApi {
    state: Mutex<MockState>,
}

impl MockApi {
    pub fn builder() -> MockApiBuilder {
        MockApiBuilder::new()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call and fail it when configured to.
    fn enter(&self, op: &str) -> Result<MutexGuard<'_, MockState>, DomainError> {
        let mut state = self.lock();
        state.calls.push(op.to_string());
        if state.failing.contains(op) {
            debug!(op, "Mock operation failing");
            return Err(DomainError::Server {
                status: 500,
                message: String::new(),
            });
        }
        Ok(state)
    }

    pub fn fail(&self, op: &str) {
        self.lock().failing.insert(op.to_string());
    }

    /// Make the like and unlike calls hang until recovered.
    pub fn stall(&self, op: &str) {
        self.lock().stalled.insert(op.to_string());
    }

    pub fn recover(&self, op: &str) {
        let mut state = self.lock();
        state.failing.remove(op);
        state.stalled.remove(op);
    }

    /// Record the call and never complete when `op` is stalled.
    async fn pause_if_stalled(&self, op: &str) {
        {
            let mut state = self.lock();
            if !state.stalled.contains(op) {
                return;
            }
            state.calls.push(op.to_string());
        }
        debug!(op, "Mock operation stalled");
        std::future::pending::<()>().await;
    }

    /// Repository operations invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn ideas(&self) -> Vec<Idea> {
        self.lock().ideas.clone()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.lock().comments.clone()
    }

    /// Simulate another client reading a notification.
    pub fn mark_read_locally(&self, id: &str) {
        if let Some(n) = self.lock().notifications.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
    }

    /// Simulate likes arriving from other users.
    pub fn set_likes(&self, id: &str, likes: u32) {
        if let Some(idea) = self.lock().ideas.iter_mut().find(|i| i.id == id) {
            idea.likes_count = likes;
        }
    }
}

fn find_idea<'a>(ideas: &'a mut [Idea], id: &str) -> Result<&'a mut Idea, DomainError> {
    ideas
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| DomainError::NotFound(format!("idea {id}")))
}

#[async_trait]
impl IdeaRepository for MockApi {
    async fn list_ideas(&self) -> Result<Vec<Idea>, DomainError> {
        Ok(self.enter("list_ideas")?.ideas.clone())
    }

    async fn get_idea(&self, id: &str) -> Result<Idea, DomainError> {
        let mut state = self.enter("get_idea")?;
        find_idea(&mut state.ideas, id).map(|i| i.clone())
    }

    async fn create_idea(&self, draft: &IdeaDraft) -> Result<Idea, DomainError> {
        let mut state = self.enter("create_idea")?;
        let minutes = state.ideas.len() as i64;
        let id = state.next_id("idea");
        let created = idea(&id, &draft.title, &draft.description, minutes, 0);
        state.ideas.push(created.clone());
        Ok(created)
    }

    async fn update_idea(&self, id: &str, draft: &IdeaDraft) -> Result<Idea, DomainError> {
        let mut state = self.enter("update_idea")?;
        let existing = find_idea(&mut state.ideas, id)?;
        existing.title = draft.title.clone();
        existing.description = draft.description.clone();
        Ok(existing.clone())
    }

    async fn delete_idea(&self, id: &str) -> Result<(), DomainError> {
        let mut state = self.enter("delete_idea")?;
        find_idea(&mut state.ideas, id)?;
        state.ideas.retain(|i| i.id != id);
        state.comments.retain(|c| c.idea_id != id);
        Ok(())
    }

    async fn like_idea(&self, id: &str) -> Result<Idea, DomainError> {
        self.pause_if_stalled("like_idea").await;
        let mut state = self.enter("like_idea")?;
        let existing = find_idea(&mut state.ideas, id)?;
        existing.likes_count += 1;
        Ok(existing.clone())
    }

    async fn unlike_idea(&self, id: &str) -> Result<Idea, DomainError> {
        self.pause_if_stalled("unlike_idea").await;
        let mut state = self.enter("unlike_idea")?;
        let existing = find_idea(&mut state.ideas, id)?;
        existing.likes_count = existing.likes_count.saturating_sub(1);
        Ok(existing.clone())
    }
}

#[async_trait]
impl CommentRepository for MockApi {
    async fn list_comments(&self, idea_id: &str) -> Result<Vec<Comment>, DomainError> {
        let state = self.enter("list_comments")?;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.idea_id == idea_id)
            .cloned()
            .collect())
    }

    async fn count_comments(&self, idea_id: &str) -> Result<u64, DomainError> {
        let state = self.enter("count_comments")?;
        Ok(state.comments.iter().filter(|c| c.idea_id == idea_id).count() as u64)
    }

    async fn add_comment(
        &self,
        idea_id: &str,
        comment: &NewComment,
    ) -> Result<Comment, DomainError> {
        let mut state = self.enter("add_comment")?;
        let id = state.next_id("comment");
        let created = Comment {
            id,
            idea_id: idea_id.to_string(),
            author: comment.author.clone(),
            content: comment.content.clone(),
            created_at: base_time() + Duration::minutes(state.comments.len() as i64),
        };
        state.comments.push(created.clone());
        Ok(created)
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<(), DomainError> {
        let mut state = self.enter("delete_comment")?;
        let before = state.comments.len();
        state.comments.retain(|c| c.id != comment_id);
        if state.comments.len() == before {
            return Err(DomainError::NotFound(format!("comment {comment_id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for MockApi {
    async fn list_notifications(&self) -> Result<Vec<Notification>, DomainError> {
        Ok(self.enter("list_notifications")?.notifications.clone())
    }

    async fn unread_count(&self) -> Result<u64, DomainError> {
        let state = self.enter("unread_count")?;
        Ok(state.notifications.iter().filter(|n| !n.read).count() as u64)
    }

    async fn mark_read(&self, id: &str) -> Result<(), DomainError> {
        let mut state = self.enter("mark_read")?;
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("notification {id}")))?;
        notification.read = true;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<(), DomainError> {
        let mut state = self.enter("mark_all_read")?;
        state.notifications.iter_mut().for_each(|n| n.read = true);
        Ok(())
    }
}

#[async_trait]
impl SkillRepository for MockApi {
    async fn list_skills(&self) -> Result<Vec<Skill>, DomainError> {
        Ok(self.enter("list_skills")?.skills.clone())
    }

    async fn add_skill(&self, skill: &NewSkill) -> Result<Skill, DomainError> {
        let mut state = self.enter("add_skill")?;
        let id = state.next_id("skill");
        let created = Skill {
            id,
            title: skill.title.clone(),
            description: skill.description.clone(),
            category: skill.category.clone(),
            level: skill.level,
            followers_count: 0,
            created_at: Some(base_time()),
            likes_count: 0,
        };
        state.skills.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl ProfileRepository for MockApi {
    async fn get_profile(&self) -> Result<Profile, DomainError> {
        Ok(self.enter("get_profile")?.profile.clone())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<Profile, DomainError> {
        let mut state = self.enter("update_profile")?;
        state.profile = profile.clone();
        Ok(profile.clone())
    }
}

/// Builder for MockApi
pub struct MockApiBuilder {
    state: MockState,
}

impl MockApiBuilder {
    pub fn new() -> Self {
        Self {
            state: MockState::default(),
        }
    }

    pub fn with_idea(mut self, idea: Idea) -> Self {
        self.state.ideas.push(idea);
        self
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.state.comments.push(comment);
        self
    }

    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.state.notifications.push(notification);
        self
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.state.skills.push(skill);
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.state.profile = profile;
        self
    }

    /// Make the named repository operation fail from the start
    pub fn failing(mut self, op: &str) -> Self {
        self.state.failing.insert(op.to_string());
        self
    }

    pub fn build(self) -> MockApi {
        MockApi {
            state: Mutex::new(self.state),
        }
    }
}

impl Default for MockApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "mio", "mockito", "rustls"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init() {
        init_test_setup().expect("Failed to initialize test setup");
    }

    #[tokio::test]
    async fn given_idea_added_when_liking_twice_then_count_increments() {
        let api = MockApi::builder()
            .with_idea(idea("1", "Pottery", "Wheel basics", 0, 5))
            .build();

        api.like_idea("1").await.unwrap();
        let liked = api.like_idea("1").await.unwrap();

        assert_eq!(liked.likes_count, 7);
    }

    #[tokio::test]
    async fn given_zero_likes_when_unliking_then_count_stays_zero() {
        let api = MockApi::builder()
            .with_idea(idea("1", "Pottery", "Wheel basics", 0, 0))
            .build();

        let unliked = api.unlike_idea("1").await.unwrap();

        assert_eq!(unliked.likes_count, 0);
    }

    #[tokio::test]
    async fn given_failing_operation_when_called_then_errors_until_recovered() {
        let api = MockApi::builder().failing("list_ideas").build();

        assert!(api.list_ideas().await.is_err());
        api.recover("list_ideas");
        assert!(api.list_ideas().await.unwrap().is_empty());
        assert_eq!(api.calls(), vec!["list_ideas", "list_ideas"]);
    }

    #[tokio::test]
    async fn given_missing_idea_when_deleting_then_returns_not_found() {
        let api = MockApi::builder().build();

        let result = api.delete_idea("nope").await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn given_comments_on_two_ideas_when_counting_then_counts_per_idea() {
        let api = MockApi::builder()
            .with_comment(comment("c1", "1", "Great", 0))
            .with_comment(comment("c2", "1", "Agreed", 1))
            .with_comment(comment("c3", "2", "Hmm", 2))
            .build();

        assert_eq!(api.count_comments("1").await.unwrap(), 2);
        assert_eq!(api.count_comments("2").await.unwrap(), 1);
    }
}
