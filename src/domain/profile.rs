// src/domain/profile.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub followers_count: u32,
    pub following_count: u32,
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.profile_picture.is_none()
    }

    pub fn apply_to(self, profile: &mut Profile) {
        if let Some(full_name) = self.full_name {
            profile.full_name = full_name;
        }
        if let Some(email) = self.email {
            profile.email = email;
        }
        if let Some(bio) = self.bio {
            profile.bio = bio;
        }
        if let Some(picture) = self.profile_picture {
            profile.profile_picture = Some(picture).filter(|p| !p.is_empty());
        }
    }
}
