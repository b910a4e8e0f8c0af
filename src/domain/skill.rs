// src/domain/skill.rs
use crate::domain::{wire, DomainError, Listable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SkillLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            "expert" => Ok(SkillLevel::Expert),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown skill level: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: SkillLevel,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(
        default,
        deserialize_with = "wire::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub likes_count: u32,
}

impl Listable for Skill {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn likes(&self) -> u32 {
        self.likes_count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSkill {
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: SkillLevel,
}

impl NewSkill {
    pub fn new(
        title: &str,
        description: &str,
        category: &str,
        level: SkillLevel,
    ) -> Result<Self, DomainError> {
        for (name, value) in [
            ("Title", title),
            ("Description", description),
            ("Category", category),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidInput(format!("{name} is required")));
            }
        }
        Ok(Self {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            category: category.trim().to_string(),
            level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_mixed_case_level_when_parsing_then_succeeds() {
        assert_eq!("Expert".parse::<SkillLevel>().unwrap(), SkillLevel::Expert);
        assert!("guru".parse::<SkillLevel>().is_err());
    }

    #[test]
    fn given_missing_category_when_creating_skill_then_names_the_field() {
        let err = NewSkill::new("Rust", "Systems", " ", SkillLevel::Advanced).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Category is required");
    }

    #[test]
    fn given_new_skill_when_serializing_then_level_is_screaming_case() {
        let skill = NewSkill::new("Rust", "Systems", "Programming", SkillLevel::Intermediate)
            .unwrap();
        let json = serde_json::to_string(&skill).unwrap();
        assert!(json.contains(r#""level":"INTERMEDIATE""#));
    }

    #[test]
    fn given_backend_skill_json_when_deserializing_then_accepts_numeric_id_and_local_time() {
        let json = r#"{"id":3,"title":"Rust","category":"Programming","level":"ADVANCED","createdAt":"2024-03-01T10:00:00"}"#;

        let skill: Skill = serde_json::from_str(json).unwrap();

        assert_eq!(skill.id, "3");
        assert_eq!(skill.level, SkillLevel::Advanced);
        assert_eq!(
            skill.created_at.map(|at| at.to_rfc3339()),
            Some("2024-03-01T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn given_null_created_at_when_deserializing_then_is_none() {
        let json = r#"{"id":"s1","title":"Rust","createdAt":null}"#;

        let skill: Skill = serde_json::from_str(json).unwrap();

        assert!(skill.created_at.is_none());
    }
}
