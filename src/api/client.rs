// SPDX-License-Identifier: MPL-2.0

use crate::api::types::{
    Comment, Conversation, ConversationId, Hashtag, Message, MessageKind, NewMessage, NewUser,
    Notification, NotificationId, Post, PostId, Session, Story, StoryId, StoryView, Token,
    UnreadCount, Upload, User, UserId, UserProfile,
};
use crate::config::{DEFAULT_API_BASE, REQUEST_TIMEOUT, USER_AGENT};
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed with status {status}: {detail}")]
    Http { status: u16, detail: String },
    #[error("not found")]
    NotFound,
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::InvalidResponse(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

/// The remote operations the synchronization core depends on.
///
/// `ApiClient` is the production implementation; components hold an
/// `Arc<dyn SocialApi>` so they can be driven without a server.
#[async_trait]
pub trait SocialApi: Send + Sync {
    async fn search_users(&self, query: &str, limit: u32) -> Result<Vec<User>, ClientError>;
    async fn get_profile(&self, username: &str) -> Result<UserProfile, ClientError>;

    async fn get_stories(&self) -> Result<Vec<Story>, ClientError>;
    async fn get_user_stories(&self, username: &str) -> Result<Vec<Story>, ClientError>;
    async fn create_story(&self, image: Upload, text_content: &str)
    -> Result<Story, ClientError>;
    async fn view_story(&self, story_id: StoryId) -> Result<(), ClientError>;
    async fn get_story_views(&self, story_id: StoryId) -> Result<Vec<StoryView>, ClientError>;

    async fn get_conversations(&self) -> Result<Vec<Conversation>, ClientError>;
    async fn get_or_create_conversation(&self, user_id: UserId)
    -> Result<Conversation, ClientError>;
    async fn get_messages(
        &self,
        conversation_id: ConversationId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Message>, ClientError>;
    async fn send_message(&self, receiver_id: UserId, content: &str)
    -> Result<Message, ClientError>;
    async fn send_image_message(
        &self,
        receiver_id: UserId,
        image: Upload,
    ) -> Result<Message, ClientError>;

    async fn get_notifications(&self) -> Result<Vec<Notification>, ClientError>;
    async fn unread_count(&self) -> Result<u64, ClientError>;
    async fn mark_notification_read(&self, id: NotificationId) -> Result<(), ClientError>;
    async fn mark_all_notifications_read(&self) -> Result<(), ClientError>;

    async fn like_post(&self, post_id: PostId) -> Result<(), ClientError>;
    async fn unlike_post(&self, post_id: PostId) -> Result<(), ClientError>;
    async fn follow_user(&self, username: &str) -> Result<(), ClientError>;
    async fn unfollow_user(&self, username: &str) -> Result<(), ClientError>;

    async fn get_feed(&self, skip: u32, limit: u32) -> Result<Vec<Post>, ClientError>;
    async fn create_post(&self, image: Upload, caption: &str) -> Result<Post, ClientError>;
    async fn get_comments(
        &self,
        post_id: PostId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Comment>, ClientError>;
    async fn create_comment(&self, post_id: PostId, content: &str)
    -> Result<Comment, ClientError>;

    async fn get_hashtag(&self, name: &str) -> Result<Hashtag, ClientError>;
    async fn get_hashtag_posts(
        &self,
        name: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Post>, ClientError>;
    async fn trending_hashtags(&self, limit: u32) -> Result<Vec<Hashtag>, ClientError>;
}

/// REST client for the Vistagram backend. Injects the bearer token into
/// every request once one is set.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new() -> Result<Self, ClientError> {
        let base = Url::parse(DEFAULT_API_BASE)
            .map_err(|e| ClientError::Validation(format!("invalid base URL: {e}")))?;
        Self::with_base_url(base)
    }

    pub fn with_base_url(base_url: Url) -> Result<Self, ClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Validation(format!(
                "invalid base URL: {base_url}"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    pub fn resume_session(&self, session: &Session) {
        *self.token.write() = Some(session.access_token.clone());
    }

    pub fn clear_session(&self) {
        *self.token.write() = None;
    }

    pub async fn register(&self, user: &NewUser<'_>) -> Result<User, ClientError> {
        if user.username.trim().is_empty() || user.password.is_empty() {
            return Err(ClientError::Validation(
                "username and password are required".into(),
            ));
        }
        self.send_json(self.request(Method::POST, &["auth", "register"])?.json(user))
            .await
    }

    /// Exchange credentials for a bearer token and keep it for later calls.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "username and password are required".into(),
            ));
        }

        let body = serde_json::json!({ "username": username, "password": password });
        let token: Token = self
            .send_json(self.request(Method::POST, &["auth", "login"])?.json(&body))
            .await?;

        let session = Session {
            username: username.to_string(),
            access_token: token.access_token,
        };
        self.resume_session(&session);

        Ok(session)
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.send_json(self.request(Method::GET, &["users", "me"])?)
            .await
    }

    /// Build the URL for `segments` below the base URL, keeping any path
    /// prefix. Segments are percent-encoded, so a `/`, `?` or `#` inside a
    /// username or tag stays part of that segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Validation(format!("invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        let url = self.endpoint(segments)?;
        let builder = self.http.request(method, url);
        Ok(match self.token.read().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::NotAuthenticated),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::Http {
                    status: status.as_u16(),
                    detail: error_detail(&body),
                })
            }
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = Self::check(request.send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        Self::check(request.send().await?).await?;
        Ok(())
    }
}

/// FastAPI-style error bodies carry a `detail` field; fall back to the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

fn image_part(image: Upload) -> Result<Part, ClientError> {
    Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(&image.mime)
        .map_err(|e| ClientError::Validation(format!("invalid mime type: {e}")))
}

#[async_trait]
impl SocialApi for ApiClient {
    async fn search_users(&self, query: &str, limit: u32) -> Result<Vec<User>, ClientError> {
        let request = self
            .request(Method::GET, &["search", "users"])?
            .query(&[("q", query)])
            .query(&[("limit", limit)]);
        self.send_json(request).await
    }

    async fn get_profile(&self, username: &str) -> Result<UserProfile, ClientError> {
        self.send_json(self.request(Method::GET, &["users", username])?)
            .await
    }

    async fn get_stories(&self) -> Result<Vec<Story>, ClientError> {
        self.send_json(self.request(Method::GET, &["stories"])?)
            .await
    }

    async fn get_user_stories(&self, username: &str) -> Result<Vec<Story>, ClientError> {
        self.send_json(self.request(Method::GET, &["stories", "user", username])?)
            .await
    }

    async fn create_story(
        &self,
        image: Upload,
        text_content: &str,
    ) -> Result<Story, ClientError> {
        let form = Form::new()
            .part("image", image_part(image)?)
            .text("text_content", text_content.to_string());
        self.send_json(self.request(Method::POST, &["stories"])?.multipart(form))
            .await
    }

    async fn view_story(&self, story_id: StoryId) -> Result<(), ClientError> {
        let id = story_id.to_string();
        self.send_empty(self.request(Method::POST, &["stories", &id, "view"])?)
            .await
    }

    async fn get_story_views(&self, story_id: StoryId) -> Result<Vec<StoryView>, ClientError> {
        let id = story_id.to_string();
        self.send_json(self.request(Method::GET, &["stories", &id, "views"])?)
            .await
    }

    async fn get_conversations(&self) -> Result<Vec<Conversation>, ClientError> {
        self.send_json(self.request(Method::GET, &["conversations"])?)
            .await
    }

    async fn get_or_create_conversation(
        &self,
        user_id: UserId,
    ) -> Result<Conversation, ClientError> {
        let body = serde_json::json!({ "user_id": user_id });
        self.send_json(self.request(Method::POST, &["conversations"])?.json(&body))
            .await
    }

    async fn get_messages(
        &self,
        conversation_id: ConversationId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Message>, ClientError> {
        let id = conversation_id.to_string();
        let request = self
            .request(Method::GET, &["conversations", &id, "messages"])?
            .query(&[("skip", skip), ("limit", limit)]);
        self.send_json(request).await
    }

    async fn send_message(
        &self,
        receiver_id: UserId,
        content: &str,
    ) -> Result<Message, ClientError> {
        let body = NewMessage {
            receiver_id,
            content,
            message_type: MessageKind::Text,
        };
        self.send_json(self.request(Method::POST, &["messages"])?.json(&body))
            .await
    }

    async fn send_image_message(
        &self,
        receiver_id: UserId,
        image: Upload,
    ) -> Result<Message, ClientError> {
        let form = Form::new()
            .text("receiver_id", receiver_id.to_string())
            .part("image", image_part(image)?);
        self.send_json(self.request(Method::POST, &["messages", "image"])?.multipart(form))
            .await
    }

    async fn get_notifications(&self) -> Result<Vec<Notification>, ClientError> {
        self.send_json(self.request(Method::GET, &["notifications"])?)
            .await
    }

    async fn unread_count(&self) -> Result<u64, ClientError> {
        let count: UnreadCount = self
            .send_json(self.request(Method::GET, &["notifications", "unread-count"])?)
            .await?;
        Ok(count.unread_count)
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<(), ClientError> {
        let id = id.to_string();
        self.send_empty(self.request(Method::POST, &["notifications", &id, "read"])?)
            .await
    }

    async fn mark_all_notifications_read(&self) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::POST, &["notifications", "mark-all-read"])?)
            .await
    }

    async fn like_post(&self, post_id: PostId) -> Result<(), ClientError> {
        let id = post_id.to_string();
        self.send_empty(self.request(Method::POST, &["posts", &id, "like"])?)
            .await
    }

    async fn unlike_post(&self, post_id: PostId) -> Result<(), ClientError> {
        let id = post_id.to_string();
        self.send_empty(self.request(Method::DELETE, &["posts", &id, "like"])?)
            .await
    }

    async fn follow_user(&self, username: &str) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::POST, &["users", username, "follow"])?)
            .await
    }

    async fn unfollow_user(&self, username: &str) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, &["users", username, "follow"])?)
            .await
    }

    async fn get_feed(&self, skip: u32, limit: u32) -> Result<Vec<Post>, ClientError> {
        let request = self
            .request(Method::GET, &["posts"])?
            .query(&[("skip", skip), ("limit", limit)]);
        self.send_json(request).await
    }

    async fn create_post(&self, image: Upload, caption: &str) -> Result<Post, ClientError> {
        let form = Form::new()
            .part("image", image_part(image)?)
            .text("caption", caption.to_string());
        self.send_json(self.request(Method::POST, &["posts"])?.multipart(form))
            .await
    }

    async fn get_comments(
        &self,
        post_id: PostId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Comment>, ClientError> {
        let id = post_id.to_string();
        let request = self
            .request(Method::GET, &["posts", &id, "comments"])?
            .query(&[("skip", skip), ("limit", limit)]);
        self.send_json(request).await
    }

    async fn create_comment(
        &self,
        post_id: PostId,
        content: &str,
    ) -> Result<Comment, ClientError> {
        let id = post_id.to_string();
        let body = serde_json::json!({ "content": content });
        self.send_json(
            self.request(Method::POST, &["posts", &id, "comments"])?
                .json(&body),
        )
        .await
    }

    async fn get_hashtag(&self, name: &str) -> Result<Hashtag, ClientError> {
        self.send_json(self.request(Method::GET, &["hashtags", name])?)
            .await
    }

    async fn get_hashtag_posts(
        &self,
        name: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Post>, ClientError> {
        let request = self
            .request(Method::GET, &["hashtags", name, "posts"])?
            .query(&[("skip", skip), ("limit", limit)]);
        self.send_json(request).await
    }

    async fn trending_hashtags(&self, limit: u32) -> Result<Vec<Hashtag>, ClientError> {
        let request = self
            .request(Method::GET, &["hashtags", "trending"])?
            .query(&[("limit", limit)]);
        self.send_json(request).await
    }
}
