// src/application/skills.rs
use crate::application::list_state::ListState;
use crate::application::SkillRepository;
use crate::domain::{DomainError, NewSkill, Skill};
use tracing::{info, warn};

pub struct SkillCatalog<R: SkillRepository> {
    repository: R,
    skills: ListState<Skill>,
}

impl<R: SkillRepository> SkillCatalog<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            skills: ListState::new(),
        }
    }

    pub fn skills(&self) -> &ListState<Skill> {
        &self.skills
    }

    pub async fn refresh(&mut self) -> Result<(), DomainError> {
        match self.repository.list_skills().await {
            Ok(skills) => {
                info!(count = skills.len(), "Fetched skills");
                self.skills.replace(skills);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch skills");
                self.skills.record_failure("Failed to fetch skills");
                Err(e)
            }
        }
    }

    /// Add a skill and reload the catalog.
    pub async fn add(&mut self, skill: &NewSkill) -> Result<Skill, DomainError> {
        let created = self.repository.add_skill(skill).await.map_err(|e| {
            warn!(error = %e, "Failed to add skill");
            e
        })?;
        info!(id = %created.id, "Skill added successfully");
        self.refresh().await?;
        Ok(created)
    }
}
