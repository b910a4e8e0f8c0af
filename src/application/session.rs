// src/application/session.rs
use crate::application::KeyValueStore;
use crate::domain::DomainError;
use tracing::info;

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";

/// Bearer token and username kept in local storage between runs.
#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn login(&mut self, token: &str, username: &str) -> Result<(), DomainError> {
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USERNAME_KEY, username)?;
        info!(username, "Session stored");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), DomainError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USERNAME_KEY)?;
        info!("Session cleared");
        Ok(())
    }

    pub fn token(&self) -> Result<Option<String>, DomainError> {
        self.store.get(TOKEN_KEY)
    }

    pub fn username(&self) -> Result<Option<String>, DomainError> {
        self.store.get(USERNAME_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(token)) if !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryStore;

    #[test]
    fn given_login_when_logging_out_then_token_and_username_are_cleared() {
        let mut session = Session::new(MemoryStore::new());
        session.login("jwt-123", "ana").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.username().unwrap().as_deref(), Some("ana"));

        session.logout().unwrap();

        assert!(!session.is_authenticated());
        assert!(session.token().unwrap().is_none());
        assert!(session.username().unwrap().is_none());
    }

    #[test]
    fn given_like_marks_in_store_when_logging_out_then_marks_survive() {
        let mut store = MemoryStore::new();
        store.set("liked:ana:i1", "true").unwrap();
        let mut session = Session::new(&mut store);
        session.login("t", "ana").unwrap();

        session.logout().unwrap();

        assert_eq!(store.get("liked:ana:i1").unwrap().as_deref(), Some("true"));
    }
}
