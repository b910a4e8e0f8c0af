pub mod board;
pub mod comment_thread;
pub mod like_marks;
pub mod list_state;
pub mod notifications;
pub mod poller;
pub mod profile;
pub mod repository;
pub mod session;
pub mod skills;

pub use board::{BoardError, BoardEvent, BoardState, IdeaBoard, LikeOutcome};
pub use comment_thread::CommentThread;
pub use like_marks::LikeMarks;
pub use list_state::{ListState, SortKey};
pub use notifications::NotificationCenter;
pub use poller::{spawn_poller, watch_ideas, watch_unread_count, PollerHandle};
pub use profile::ProfileEditor;
pub use repository::{
    CommentRepository, IdeaRepository, KeyValueStore, NotificationRepository, ProfileRepository,
    SkillRepository,
};
pub use session::Session;
pub use skills::SkillCatalog;
