// src/application/like_marks.rs
use crate::application::KeyValueStore;
use crate::domain::DomainError;
use tracing::debug;

const ANONYMOUS_NAMESPACE: &str = "anonymous";

/// Client-local "I liked this" flags, one per (user, item).
///
/// These never reconcile with the server: the last local write wins.
#[derive(Debug)]
pub struct LikeMarks<S: KeyValueStore> {
    store: S,
    namespace: String,
}

impl<S: KeyValueStore> LikeMarks<S> {
    pub fn new(store: S, username: Option<&str>) -> Self {
        let namespace = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(ANONYMOUS_NAMESPACE)
            .to_string();
        Self { store, namespace }
    }

    fn key(&self, item_id: &str) -> String {
        format!("liked:{}:{}", self.namespace, item_id)
    }

    pub fn is_liked(&self, item_id: &str) -> Result<bool, DomainError> {
        Ok(self.store.get(&self.key(item_id))?.as_deref() == Some("true"))
    }

    pub fn set(&mut self, item_id: &str, liked: bool) -> Result<(), DomainError> {
        let key = self.key(item_id);
        debug!(%key, liked, "Persisting like mark");
        if liked {
            self.store.set(&key, "true")
        } else {
            self.store.remove(&key)
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
