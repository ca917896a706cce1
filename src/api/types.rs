// SPDX-License-Identifier: MPL-2.0

use crate::api::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type PostId = i64;
pub type StoryId = i64;
pub type ConversationId = i64;
pub type MessageId = i64;
pub type NotificationId = i64;

/// Logged-in username and bearer token, persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub full_name: &'a str,
    pub password: &'a str,
    pub bio: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub followers_count: u32,
    pub following_count: u32,
    pub posts_count: u32,
    #[serde(default)]
    pub is_following: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostImage {
    pub id: i64,
    pub post_id: PostId,
    pub image_url: String,
    #[serde(default)]
    pub order_index: u32,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,
    pub author: User,
    pub likes_count: u32,
    pub comments_count: u32,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub images: Vec<PostImage>,
    #[serde(default)]
    pub primary_image_url: Option<String>,
}

impl Post {
    /// Image paths in display order. Older posts only carry `image_url`.
    pub fn image_paths(&self) -> Vec<&str> {
        if self.images.is_empty() {
            return self.image_url.as_deref().into_iter().collect();
        }
        let mut images: Vec<&PostImage> = self.images.iter().collect();
        images.sort_by_key(|img| img.order_index);
        images.into_iter().map(|img| img.image_url.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,
    pub post_id: PostId,
    pub author: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    #[serde(default)]
    pub text_content: Option<String>,
    pub image_url: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub expires_at: DateTime<Utc>,
    pub author_id: UserId,
    pub author: User,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_expired: bool,
    #[serde(default)]
    pub views_count: u32,
    #[serde(default)]
    pub is_viewed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryView {
    pub id: i64,
    pub story_id: StoryId,
    pub viewer_id: UserId,
    #[serde(with = "timestamp")]
    pub viewed_at: DateTime<Utc>,
    pub viewer: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub message_type: MessageKind,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub sender: User,
    pub receiver: User,
}

impl Message {
    /// One-line preview for the conversation sidebar.
    pub fn preview(&self) -> String {
        match self.message_type {
            MessageKind::Image => "Photo".to_string(),
            MessageKind::Text => self.content.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMessage<'a> {
    pub receiver_id: UserId,
    pub content: &'a str,
    pub message_type: MessageKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub other_user: User,
    #[serde(default)]
    pub last_message: Option<Message>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Message,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub notification_type: NotificationKind,
    pub message: String,
    #[serde(default)]
    pub sender: Option<User>,
    #[serde(default)]
    pub related_post_id: Option<PostId>,
    #[serde(default)]
    pub related_comment_id: Option<i64>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Route the renderer should open when the notification is activated.
    pub fn route(&self) -> Option<String> {
        match self.notification_type {
            NotificationKind::Like | NotificationKind::Comment => {
                self.related_post_id.map(|id| format!("/post/{id}"))
            }
            NotificationKind::Follow => self
                .sender
                .as_ref()
                .map(|s| format!("/profile/{}", s.username)),
            NotificationKind::Message => Some("/messages".to_string()),
            NotificationKind::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnreadCount {
    pub unread_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hashtag {
    pub id: i64,
    pub name: String,
    pub posts_count: u32,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Binary attachment for multipart uploads.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}
