// src/application/board.rs
use crate::application::comment_thread::CommentThread;
use crate::application::list_state::{ListState, SortKey};
use crate::application::{CommentRepository, IdeaRepository, KeyValueStore, LikeMarks};
use crate::domain::{Comment, DomainError, Idea, IdeaDraft, NewComment};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("A like request for idea {0} is already in flight")]
    LikeInFlight(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message for the user, the toast of the web client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    pub ideas: ListState<Idea>,
    pub threads: HashMap<String, CommentThread>,
    pub likes_in_flight: HashSet<String>,
    pub notice: Option<Notice>,
}

impl BoardState {
    pub fn thread(&self, idea_id: &str) -> Option<&CommentThread> {
        self.threads.get(idea_id)
    }
}

/// Everything that can change the board, applied in order by [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    IdeasFetched(Vec<Idea>),
    FetchFailed(String),
    IdeaSaved(String),
    IdeaRemoved(String),
    ActionFailed(String),
    LikeStarted(String),
    LikeSettled(Idea),
    LikeFailed { idea_id: String, message: String },
    ThreadExpanded(String),
    ThreadCollapsed(String),
    ThreadLoaded { idea_id: String, comments: Vec<Comment> },
    CommentAdded(Comment),
    CommentRemoved { idea_id: String, comment_id: String },
    CommentCountLoaded { idea_id: String, count: u64 },
}

/// Pure state transition. Each event runs to completion before the next one.
pub fn reduce(mut state: BoardState, event: BoardEvent) -> BoardState {
    match event {
        BoardEvent::IdeasFetched(ideas) => {
            state.ideas.replace(ideas);
        }
        BoardEvent::FetchFailed(message) => {
            state.ideas.record_failure(message.clone());
            state.notice = Some(Notice::error(message));
        }
        BoardEvent::IdeaSaved(message) => {
            state.notice = Some(Notice::success(message));
        }
        BoardEvent::IdeaRemoved(idea_id) => {
            state.ideas.remove(&idea_id);
            state.threads.remove(&idea_id);
            state.notice = Some(Notice::success("Idea deleted successfully!"));
        }
        BoardEvent::ActionFailed(message) => {
            state.notice = Some(Notice::error(message));
        }
        BoardEvent::LikeStarted(idea_id) => {
            state.likes_in_flight.insert(idea_id);
        }
        BoardEvent::LikeSettled(idea) => {
            state.likes_in_flight.remove(&idea.id);
            state.ideas.replace_item(idea);
        }
        BoardEvent::LikeFailed { idea_id, message } => {
            state.likes_in_flight.remove(&idea_id);
            state.notice = Some(Notice::error(message));
        }
        BoardEvent::ThreadExpanded(idea_id) => {
            state.threads.entry(idea_id).or_default().expand();
        }
        BoardEvent::ThreadCollapsed(idea_id) => {
            if let Some(thread) = state.threads.get_mut(&idea_id) {
                thread.collapse();
            }
        }
        BoardEvent::ThreadLoaded { idea_id, comments } => {
            state.threads.entry(idea_id).or_default().load(comments);
        }
        BoardEvent::CommentAdded(comment) => {
            state
                .threads
                .entry(comment.idea_id.clone())
                .or_default()
                .push_created(comment);
        }
        BoardEvent::CommentRemoved {
            idea_id,
            comment_id,
        } => {
            if let Some(thread) = state.threads.get_mut(&idea_id) {
                thread.remove(&comment_id);
            }
        }
        BoardEvent::CommentCountLoaded { idea_id, count } => {
            state
                .threads
                .entry(idea_id)
                .or_default()
                .set_server_count(count);
        }
    }
    state
}

/// Clears the in-flight mark when the request settles or its future is dropped.
struct PendingLike<'a> {
    in_flight: &'a mut HashSet<String>,
    idea_id: &'a str,
}

impl Drop for PendingLike<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(self.idea_id);
    }
}

/// Result of a completed like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    pub liked: bool,
    pub likes_count: u32,
}

/// The ideas board: talks to the server and feeds the outcomes through [`reduce`].
pub struct IdeaBoard<R, S>
where
    R: IdeaRepository + CommentRepository,
    S: KeyValueStore,
{
    repository: R,
    marks: LikeMarks<S>,
    state: BoardState,
}

impl<R, S> IdeaBoard<R, S>
where
    R: IdeaRepository + CommentRepository,
    S: KeyValueStore,
{
    pub fn new(repository: R, marks: LikeMarks<S>) -> Self {
        Self {
            repository,
            marks,
            state: BoardState::default(),
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn marks(&self) -> &LikeMarks<S> {
        &self.marks
    }

    pub fn dispatch(&mut self, event: BoardEvent) {
        debug!(?event, "Dispatching board event");
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    pub fn view(&self, term: &str, key: SortKey) -> Vec<&Idea> {
        self.state.ideas.view(term, key)
    }

    pub fn is_liked(&self, idea_id: &str) -> bool {
        self.marks.is_liked(idea_id).unwrap_or_else(|e| {
            warn!(idea_id, error = %e, "Could not read like mark");
            false
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&mut self) -> Result<(), DomainError> {
        match self.repository.list_ideas().await {
            Ok(ideas) => {
                info!(count = ideas.len(), "Fetched ideas");
                self.dispatch(BoardEvent::IdeasFetched(ideas));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Error fetching ideas");
                self.dispatch(BoardEvent::FetchFailed(
                    "Error loading ideas. Please try again later.".to_string(),
                ));
                Err(e)
            }
        }
    }

    /// Reload after a write the server already accepted. A failed reload keeps
    /// the old snapshot and its error notice, but does not fail the write.
    async fn refresh_after_write(&mut self) {
        if let Err(e) = self.fetch().await {
            warn!(error = %e, "Saved, but reloading ideas failed");
        }
    }

    /// Create, then reload the list so the snapshot mirrors the server.
    #[instrument(level = "debug", skip(self))]
    pub async fn create(&mut self, draft: &IdeaDraft) -> Result<Idea, DomainError> {
        let idea = match self.repository.create_idea(draft).await {
            Ok(idea) => idea,
            Err(e) => {
                self.dispatch(BoardEvent::ActionFailed(e.user_message("share your idea")));
                return Err(e);
            }
        };
        self.dispatch(BoardEvent::IdeaSaved(
            "Your idea has been shared!".to_string(),
        ));
        self.refresh_after_write().await;
        Ok(idea)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn update(&mut self, idea_id: &str, draft: &IdeaDraft) -> Result<Idea, DomainError> {
        let idea = match self.repository.update_idea(idea_id, draft).await {
            Ok(idea) => idea,
            Err(e) => {
                self.dispatch(BoardEvent::ActionFailed(e.user_message("update your idea")));
                return Err(e);
            }
        };
        self.dispatch(BoardEvent::IdeaSaved(
            "Your idea has been updated!".to_string(),
        ));
        self.refresh_after_write().await;
        Ok(idea)
    }

    /// Removes the idea locally only after the server confirmed the delete.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&mut self, idea_id: &str) -> Result<(), DomainError> {
        match self.repository.delete_idea(idea_id).await {
            Ok(()) => {
                self.dispatch(BoardEvent::IdeaRemoved(idea_id.to_string()));
                Ok(())
            }
            Err(e) => {
                self.dispatch(BoardEvent::ActionFailed(e.user_message("delete idea")));
                Err(e)
            }
        }
    }

    /// Like when unmarked, unlike when marked.
    ///
    /// The displayed count always comes from the server response. A toggle
    /// for an idea recorded as pending in the state is rejected. Dropping the
    /// returned future mid-request clears the pending mark.
    #[instrument(level = "debug", skip(self))]
    pub async fn toggle_like(&mut self, idea_id: &str) -> Result<LikeOutcome, BoardError> {
        if self.state.likes_in_flight.contains(idea_id) {
            return Err(BoardError::LikeInFlight(idea_id.to_string()));
        }
        let liked = self.marks.is_liked(idea_id)?;
        self.dispatch(BoardEvent::LikeStarted(idea_id.to_string()));

        let result = {
            let _pending = PendingLike {
                in_flight: &mut self.state.likes_in_flight,
                idea_id,
            };
            if liked {
                self.repository.unlike_idea(idea_id).await
            } else {
                self.repository.like_idea(idea_id).await
            }
        };

        let idea = match result {
            Ok(idea) => idea,
            Err(e) => {
                let action = if liked { "unlike idea" } else { "like idea" };
                self.dispatch(BoardEvent::LikeFailed {
                    idea_id: idea_id.to_string(),
                    message: e.user_message(action),
                });
                return Err(e.into());
            }
        };

        if let Err(e) = self.marks.set(idea_id, !liked) {
            self.dispatch(BoardEvent::LikeFailed {
                idea_id: idea_id.to_string(),
                message: e.user_message("save like"),
            });
            return Err(e.into());
        }

        let outcome = LikeOutcome {
            liked: !liked,
            likes_count: idea.likes_count,
        };
        info!(idea_id, liked = outcome.liked, likes = outcome.likes_count, "Like toggled");
        self.dispatch(BoardEvent::LikeSettled(idea));
        Ok(outcome)
    }

    /// Expand a thread, fetching its comments the first time only.
    #[instrument(level = "debug", skip(self))]
    pub async fn expand_thread(&mut self, idea_id: &str) -> Result<&CommentThread, DomainError> {
        self.dispatch(BoardEvent::ThreadExpanded(idea_id.to_string()));
        let needs_fetch = self
            .state
            .thread(idea_id)
            .map_or(true, CommentThread::needs_fetch);

        if needs_fetch {
            match self.repository.list_comments(idea_id).await {
                Ok(comments) => self.dispatch(BoardEvent::ThreadLoaded {
                    idea_id: idea_id.to_string(),
                    comments,
                }),
                Err(e) => {
                    self.dispatch(BoardEvent::ActionFailed(e.user_message("load comments")));
                    return Err(e);
                }
            }
        }

        self.state
            .thread(idea_id)
            .ok_or_else(|| DomainError::NotFound(format!("thread for idea {idea_id}")))
    }

    pub fn collapse_thread(&mut self, idea_id: &str) {
        self.dispatch(BoardEvent::ThreadCollapsed(idea_id.to_string()));
    }

    /// Seed the displayed count of a thread that has not been expanded yet.
    pub async fn load_comment_count(&mut self, idea_id: &str) -> Result<u64, DomainError> {
        let count = self.repository.count_comments(idea_id).await?;
        self.dispatch(BoardEvent::CommentCountLoaded {
            idea_id: idea_id.to_string(),
            count,
        });
        Ok(count)
    }

    /// Empty content is rejected before any request is made.
    #[instrument(level = "debug", skip(self, content))]
    pub async fn add_comment(
        &mut self,
        idea_id: &str,
        content: &str,
        author: Option<&str>,
    ) -> Result<Comment, DomainError> {
        let draft = match NewComment::new(content, author) {
            Ok(draft) => draft,
            Err(e) => {
                self.dispatch(BoardEvent::ActionFailed(e.user_message("add comment")));
                return Err(e);
            }
        };

        match self.repository.add_comment(idea_id, &draft).await {
            Ok(comment) => {
                self.dispatch(BoardEvent::CommentAdded(comment.clone()));
                Ok(comment)
            }
            Err(e) => {
                self.dispatch(BoardEvent::ActionFailed(e.user_message("add comment")));
                Err(e)
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete_comment(
        &mut self,
        idea_id: &str,
        comment_id: &str,
    ) -> Result<(), DomainError> {
        match self.repository.delete_comment(comment_id).await {
            Ok(()) => {
                self.dispatch(BoardEvent::CommentRemoved {
                    idea_id: idea_id.to_string(),
                    comment_id: comment_id.to_string(),
                });
                Ok(())
            }
            Err(e) => {
                self.dispatch(BoardEvent::ActionFailed(e.user_message("delete comment")));
                Err(e)
            }
        }
    }
}
