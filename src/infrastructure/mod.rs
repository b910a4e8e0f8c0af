pub mod config;
pub mod http;
pub mod renderer;
pub mod storage;

pub use config::Config;
pub use http::{ApiClient, Credentials};
pub use renderer::PageRenderer;
pub use storage::{FileStore, MemoryStore};
