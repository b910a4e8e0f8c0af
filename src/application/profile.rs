// src/application/profile.rs
use crate::application::ProfileRepository;
use crate::domain::{DomainError, Profile, ProfileChanges};
use tracing::info;

pub struct ProfileEditor<R: ProfileRepository> {
    repository: R,
    profile: Option<Profile>,
}

impl<R: ProfileRepository> ProfileEditor<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            profile: None,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub async fn load(&mut self) -> Result<&Profile, DomainError> {
        let profile = self.repository.get_profile().await?;
        Ok(self.profile.insert(profile))
    }

    /// Apply `changes` on top of the current profile (loading it first if needed) and PUT it.
    pub async fn save(&mut self, changes: ProfileChanges) -> Result<&Profile, DomainError> {
        if changes.is_empty() {
            return Err(DomainError::InvalidInput(
                "Nothing to update".to_string(),
            ));
        }
        let mut profile = match self.profile.take() {
            Some(profile) => profile,
            None => self.repository.get_profile().await?,
        };
        let previous = profile.clone();
        changes.apply_to(&mut profile);

        match self.repository.update_profile(&profile).await {
            Ok(saved) => {
                info!(username = %saved.username, "Profile updated successfully");
                Ok(self.profile.insert(saved))
            }
            Err(e) => {
                self.profile = Some(previous);
                Err(e)
            }
        }
    }
}
