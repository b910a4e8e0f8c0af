use anyhow::{Context, Result};
use skillboard::infrastructure::{ApiClient, FileStore};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// File-backed key-value store living in a temporary directory
#[allow(dead_code)]
pub struct TestStorage {
    _temp_dir: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestStorage {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        let path = temp_dir.path().join("skillboard").join("storage.json");
        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    pub fn open(&self) -> Result<FileStore> {
        FileStore::open(&self.path)
    }
}

/// Client pointed at a mockito server
#[allow(dead_code)]
pub fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    ApiClient::new(&server.url(), Duration::from_secs(5)).expect("client builds")
}

/// Wire payloads as the server sends them
#[allow(dead_code)]
pub mod payloads {
    pub const IDEA_WITH_IMAGE: &str = r#"{
        "id": "65f1a2",
        "title": "Knitting circle",
        "description": "Weekly meetup",
        "createdAt": "2024-03-01T12:00:00Z",
        "mediaUrl": "https://res.cloudinary.com/demo/image/upload/knit.jpg",
        "mediaType": "image",
        "publicId": "knit",
        "likesCount": 4
    }"#;

    pub const IDEA_WITHOUT_LIKES: &str = r#"{
        "id": "65f1a3",
        "title": "Bread baking",
        "description": "Sourdough starter swap",
        "createdAt": "2024-03-02T09:30:00Z"
    }"#;

    pub fn idea(id: &str, title: &str, likes: u32) -> String {
        format!(
            r#"{{"id":"{id}","title":"{title}","description":"Desc","createdAt":"2024-03-01T12:00:00Z","likesCount":{likes}}}"#
        )
    }

    pub const COMMENTS: &str = r#"[
        {"id":"c2","ideaId":"65f1a2","author":"Ana","content":"Count me in","createdAt":"2024-03-01T13:00:00Z"},
        {"id":"c1","ideaId":"65f1a2","author":"","content":"Nice","createdAt":"2024-03-01T12:30:00Z"}
    ]"#;

    pub const NOTIFICATIONS: &str = r#"[
        {"id":"n1","type":"FOLLOW","title":"New follower","message":"ana followed you","createdAt":"2024-03-01T12:00:00Z","read":false},
        {"id":"n2","type":"SOMETHING_NEW","title":"Hello","message":"Unknown type","createdAt":"2024-03-01T12:00:00Z","read":true},
        {"id":3,"type":"SKILL_ADDED","title":"New skill","message":"Bo added Rust","createdAt":"2024-03-01T12:30:00.123456","read":false}
    ]"#;
}
