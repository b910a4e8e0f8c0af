pub mod comment;
pub mod error;
pub mod idea;
pub mod listable;
pub mod notification;
pub mod profile;
pub mod skill;
pub mod wire;

pub use comment::{Comment, NewComment};
pub use error::DomainError;
pub use idea::{Idea, IdeaDraft, Media, MediaType};
pub use listable::Listable;
pub use notification::{CountResponse, Notification, NotificationType};
pub use profile::{Profile, ProfileChanges};
pub use skill::{NewSkill, Skill, SkillLevel};
