// src/application/comment_thread.rs
use crate::domain::Comment;

pub const NO_COMMENTS_PLACEHOLDER: &str = "No comments yet. Be the first to comment!";

/// Comments shown under one idea.
///
/// The list is fetched at most once (on first expand). While it is loaded the
/// displayed count is the list length, so it can never drift from what is shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentThread {
    comments: Vec<Comment>,
    loaded: bool,
    expanded: bool,
    server_count: Option<u64>,
}

impl CommentThread {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn needs_fetch(&self) -> bool {
        !self.loaded
    }

    pub fn expand(&mut self) {
        self.expanded = true;
    }

    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    /// Comments newest first
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn count(&self) -> u64 {
        if self.loaded {
            self.comments.len() as u64
        } else {
            self.server_count.unwrap_or(0)
        }
    }

    pub fn set_server_count(&mut self, count: u64) {
        self.server_count = Some(count);
    }

    pub fn load(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
        self.loaded = true;
    }

    /// Insert a server-acknowledged comment at the top of the thread.
    pub fn push_created(&mut self, comment: Comment) {
        if !self.loaded {
            self.server_count = Some(self.server_count.unwrap_or(0) + 1);
        }
        self.comments.insert(0, comment);
    }

    /// Drop one server-acknowledged deletion. Returns false if the comment is not shown.
    pub fn remove(&mut self, comment_id: &str) -> bool {
        let Some(position) = self.comments.iter().position(|c| c.id == comment_id) else {
            return false;
        };
        self.comments.remove(position);
        if !self.loaded {
            self.server_count = self.server_count.map(|n| n.saturating_sub(1));
        }
        true
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_COMMENTS_PLACEHOLDER)
    }
}
