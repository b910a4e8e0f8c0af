// src/infrastructure/http.rs
use crate::application::{
    CommentRepository, IdeaRepository, NotificationRepository, ProfileRepository, SkillRepository,
};
use crate::domain::{
    Comment, CountResponse, DomainError, Idea, IdeaDraft, NewComment, NewSkill, Notification,
    Profile, Skill,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
    username: Option<String>,
}

/// Authenticated session returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub username: String,
}

/// HTTP client for the skill-sharing REST API.
///
/// Every request carries the bearer token when one is set. Non-2xx responses
/// become [`DomainError::Server`] with the `message` (or `error`) field of a
/// JSON body when the server sent one.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "Sending request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DomainError> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        let status = response.status();
        debug!(%status, url = %response.url(), "Response received");

        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        warn!(%status, %url, %body, "API request failed");

        if status == StatusCode::NOT_FOUND {
            return Err(DomainError::NotFound(url));
        }
        Err(DomainError::Server {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DomainError> {
        let response = self.send(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| DomainError::Decode(e.to_string()))
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), DomainError> {
        self.send(request).await.map(|_| ())
    }

    async fn media_form(draft: &IdeaDraft, media: &Path) -> Result<Form, DomainError> {
        let bytes = tokio::fs::read(media).await.map_err(|e| {
            DomainError::InvalidInput(format!("Cannot read media file {}: {e}", media.display()))
        })?;
        let file_name = media
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());
        let mime = mime_guess::from_path(media).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.essence_str())
            .map_err(|e| DomainError::InvalidInput(format!("Invalid media type: {e}")))?;

        Ok(Form::new()
            .text("title", draft.title.clone())
            .text("description", draft.description.clone())
            .part("media", part))
    }

    /// Exchange username and password for a bearer token.
    #[instrument(level = "debug", skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Credentials, DomainError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(DomainError::InvalidInput(
                "Username and password are required".to_string(),
            ));
        }
        let request = self
            .request(Method::POST, "auth/login")
            .json(&LoginRequest { username, password });
        let response: LoginResponse = self.send_json(request).await?;
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::Decode("login response carried no token".to_string()))?;

        Ok(Credentials {
            token,
            username: response.username.unwrap_or_else(|| username.to_string()),
        })
    }
}

/// Pull a human readable message out of an error body.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["message", "error"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[async_trait]
impl IdeaRepository for ApiClient {
    #[instrument(level = "debug", skip(self))]
    async fn list_ideas(&self) -> Result<Vec<Idea>, DomainError> {
        self.send_json(self.request(Method::GET, "ideas")).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_idea(&self, id: &str) -> Result<Idea, DomainError> {
        self.send_json(self.request(Method::GET, &format!("ideas/{id}")))
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn create_idea(&self, draft: &IdeaDraft) -> Result<Idea, DomainError> {
        let request = match &draft.media {
            Some(media) => self
                .request(Method::POST, "ideas/with-media")
                .multipart(Self::media_form(draft, media).await?),
            None => self.request(Method::POST, "ideas").json(draft),
        };
        self.send_json(request).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn update_idea(&self, id: &str, draft: &IdeaDraft) -> Result<Idea, DomainError> {
        let request = match &draft.media {
            Some(media) => self
                .request(Method::POST, &format!("ideas/update/{id}"))
                .multipart(Self::media_form(draft, media).await?),
            None => self.request(Method::PUT, &format!("ideas/{id}")).json(draft),
        };
        self.send_json(request).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_idea(&self, id: &str) -> Result<(), DomainError> {
        self.send_empty(self.request(Method::DELETE, &format!("ideas/{id}")))
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn like_idea(&self, id: &str) -> Result<Idea, DomainError> {
        self.send_json(self.request(Method::POST, &format!("ideas/{id}/like")))
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn unlike_idea(&self, id: &str) -> Result<Idea, DomainError> {
        self.send_json(self.request(Method::POST, &format!("ideas/{id}/unlike")))
            .await
    }
}

#[async_trait]
impl CommentRepository for ApiClient {
    #[instrument(level = "debug", skip(self))]
    async fn list_comments(&self, idea_id: &str) -> Result<Vec<Comment>, DomainError> {
        self.send_json(self.request(Method::GET, &format!("comments/idea/{idea_id}")))
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn count_comments(&self, idea_id: &str) -> Result<u64, DomainError> {
        let response: CountResponse = self
            .send_json(self.request(Method::GET, &format!("comments/count/idea/{idea_id}")))
            .await?;
        Ok(response.count)
    }

    #[instrument(level = "debug", skip(self, comment))]
    async fn add_comment(
        &self,
        idea_id: &str,
        comment: &NewComment,
    ) -> Result<Comment, DomainError> {
        let request = self
            .request(Method::POST, &format!("comments/idea/{idea_id}"))
            .json(comment);
        self.send_json(request).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_comment(&self, comment_id: &str) -> Result<(), DomainError> {
        self.send_empty(self.request(Method::DELETE, &format!("comments/{comment_id}")))
            .await
    }
}

#[async_trait]
impl NotificationRepository for ApiClient {
    #[instrument(level = "debug", skip(self))]
    async fn list_notifications(&self) -> Result<Vec<Notification>, DomainError> {
        self.send_json(self.request(Method::GET, "notifications"))
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn unread_count(&self) -> Result<u64, DomainError> {
        let response: CountResponse = self
            .send_json(self.request(Method::GET, "notifications/unread-count"))
            .await?;
        Ok(response.count)
    }

    #[instrument(level = "debug", skip(self))]
    async fn mark_read(&self, id: &str) -> Result<(), DomainError> {
        self.send_empty(self.request(Method::PUT, &format!("notifications/{id}/read")))
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn mark_all_read(&self) -> Result<(), DomainError> {
        self.send_empty(self.request(Method::PUT, "notifications/read-all"))
            .await
    }
}

#[async_trait]
impl SkillRepository for ApiClient {
    #[instrument(level = "debug", skip(self))]
    async fn list_skills(&self) -> Result<Vec<Skill>, DomainError> {
        self.send_json(self.request(Method::GET, "skills")).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn add_skill(&self, skill: &NewSkill) -> Result<Skill, DomainError> {
        self.send_json(self.request(Method::POST, "skills").json(skill))
            .await
    }
}

#[async_trait]
impl ProfileRepository for ApiClient {
    #[instrument(level = "debug", skip(self))]
    async fn get_profile(&self) -> Result<Profile, DomainError> {
        self.send_json(self.request(Method::GET, "profile")).await
    }

    #[instrument(level = "debug", skip(self, profile))]
    async fn update_profile(&self, profile: &Profile) -> Result<Profile, DomainError> {
        self.send_json(self.request(Method::PUT, "profile").json(profile))
            .await
    }
}
