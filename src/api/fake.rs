// SPDX-License-Identifier: MPL-2.0

//! In-memory `SocialApi` used by the component tests. Records every call as
//! `"op:arg"` in issue order and can be told to fail or stall per call.

use crate::api::{
    ClientError, Comment, Conversation, ConversationId, Hashtag, Message, MessageKind,
    Notification, NotificationId, NotificationKind, Post, PostId, SocialApi, Story, StoryId,
    StoryView, Upload, User, UserId, UserProfile,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    delays: Mutex<HashMap<String, Duration>>,
    next_message_id: AtomicI64,
    pub stories: Mutex<Vec<Story>>,
    pub conversations: Mutex<Vec<Conversation>>,
    pub messages: Mutex<HashMap<ConversationId, Vec<Message>>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub posts: Mutex<Vec<Post>>,
    pub comments: Mutex<Vec<Comment>>,
    pub hashtags: Mutex<Vec<Hashtag>>,
    pub profiles: Mutex<Vec<UserProfile>>,
    pub unread: Mutex<u64>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_message_id: AtomicI64::new(1000),
            ..Self::default()
        })
    }

    /// Make every call to `op` fail with a network error.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.lock().remove(op);
    }

    /// Stall the exact call `"op:arg"` for `delay` before answering.
    pub fn delay(&self, call: &str, delay: Duration) {
        self.delays.lock().insert(call.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, op: &str) -> Vec<String> {
        let prefix = format!("{op}:");
        self.calls
            .lock()
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .cloned()
            .collect()
    }

    async fn record(&self, op: &'static str, arg: impl ToString) -> Result<(), ClientError> {
        let call = format!("{op}:{}", arg.to_string());
        self.calls.lock().push(call.clone());

        let delay = self.delays.lock().get(&call).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().contains(op) {
            return Err(ClientError::Network(format!("{op} unavailable")));
        }
        Ok(())
    }
}

pub fn ts(offset: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + offset, 0).unwrap()
}

pub fn user(id: UserId, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: username.to_uppercase(),
        bio: None,
        profile_picture: None,
        is_active: true,
        created_at: ts(0),
    }
}

pub fn story(id: StoryId, author: &User, is_viewed: bool) -> Story {
    Story {
        id,
        text_content: None,
        image_url: format!("/uploads/stories/{id}.jpg"),
        created_at: ts(id),
        expires_at: ts(id + 86_400),
        author_id: author.id,
        author: author.clone(),
        is_active: true,
        is_expired: false,
        views_count: 0,
        is_viewed,
    }
}

pub fn message(id: i64, conversation_id: ConversationId, from: &User, to: &User) -> Message {
    Message {
        id,
        conversation_id,
        sender_id: from.id,
        receiver_id: to.id,
        content: Some(format!("message {id}")),
        message_type: MessageKind::Text,
        image_url: None,
        is_read: false,
        created_at: ts(id),
        sender: from.clone(),
        receiver: to.clone(),
    }
}

pub fn conversation(id: ConversationId, other: &User, unread_count: u32) -> Conversation {
    Conversation {
        id,
        other_user: other.clone(),
        last_message: None,
        unread_count,
        created_at: ts(0),
        updated_at: ts(id),
    }
}

pub fn post(id: PostId, is_liked: bool, likes_count: u32) -> Post {
    let author = user(1, "alice");
    Post {
        id,
        caption: Some(format!("post {id} #sunset")),
        image_url: Some(format!("/uploads/{id}.jpg")),
        created_at: ts(id),
        author_id: author.id,
        author,
        likes_count,
        comments_count: 0,
        is_liked,
        images: Vec::new(),
        primary_image_url: None,
    }
}

pub fn notification(id: NotificationId, kind: NotificationKind, is_read: bool) -> Notification {
    Notification {
        id,
        notification_type: kind,
        message: format!("notification {id}"),
        sender: Some(user(2, "bob")),
        related_post_id: Some(10),
        related_comment_id: None,
        is_read,
        created_at: ts(id),
    }
}

pub fn profile(
    id: UserId,
    username: &str,
    is_following: bool,
    followers_count: u32,
) -> UserProfile {
    UserProfile {
        user: user(id, username),
        followers_count,
        following_count: 0,
        posts_count: 0,
        is_following,
    }
}

pub fn hashtag(name: &str, posts_count: u32) -> Hashtag {
    Hashtag {
        id: 1,
        name: name.to_string(),
        posts_count,
        created_at: ts(0),
    }
}

fn page<T: Clone>(items: &[T], skip: u32, limit: u32) -> Vec<T> {
    items
        .iter()
        .skip(skip as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl SocialApi for FakeApi {
    async fn search_users(&self, query: &str, limit: u32) -> Result<Vec<User>, ClientError> {
        self.record("search_users", query).await?;
        let results = (0..limit.min(2) as i64)
            .map(|i| user(i + 1, &format!("{query}{i}")))
            .collect();
        Ok(results)
    }

    async fn get_profile(&self, username: &str) -> Result<UserProfile, ClientError> {
        self.record("get_profile", username).await?;
        self.profiles
            .lock()
            .iter()
            .find(|p| p.user.username == username)
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn get_stories(&self) -> Result<Vec<Story>, ClientError> {
        self.record("get_stories", "").await?;
        Ok(self.stories.lock().clone())
    }

    async fn get_user_stories(&self, username: &str) -> Result<Vec<Story>, ClientError> {
        self.record("get_user_stories", username).await?;
        Ok(self
            .stories
            .lock()
            .iter()
            .filter(|s| s.author.username == username)
            .cloned()
            .collect())
    }

    async fn create_story(
        &self,
        image: Upload,
        text_content: &str,
    ) -> Result<Story, ClientError> {
        self.record("create_story", &image.file_name).await?;
        let mut created = story(
            self.next_message_id.fetch_add(1, Ordering::SeqCst),
            &user(99, "me"),
            false,
        );
        created.text_content = (!text_content.is_empty()).then(|| text_content.to_string());
        created.image_url = format!("/uploads/stories/{}", image.file_name);
        self.stories.lock().push(created.clone());
        Ok(created)
    }

    async fn view_story(&self, story_id: StoryId) -> Result<(), ClientError> {
        self.record("view_story", story_id).await
    }

    async fn get_story_views(&self, story_id: StoryId) -> Result<Vec<StoryView>, ClientError> {
        self.record("get_story_views", story_id).await?;
        let viewer = user(3, "carol");
        Ok(vec![StoryView {
            id: 1,
            story_id,
            viewer_id: viewer.id,
            viewed_at: ts(50),
            viewer,
        }])
    }

    async fn get_conversations(&self) -> Result<Vec<Conversation>, ClientError> {
        self.record("get_conversations", "").await?;
        Ok(self.conversations.lock().clone())
    }

    async fn get_or_create_conversation(
        &self,
        user_id: UserId,
    ) -> Result<Conversation, ClientError> {
        self.record("get_or_create_conversation", user_id).await?;
        let mut conversations = self.conversations.lock();
        if let Some(existing) = conversations.iter().find(|c| c.other_user.id == user_id) {
            return Ok(existing.clone());
        }
        let created = conversation(
            conversations.len() as i64 + 1,
            &user(user_id, "new"),
            0,
        );
        conversations.push(created.clone());
        Ok(created)
    }

    async fn get_messages(
        &self,
        conversation_id: ConversationId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Message>, ClientError> {
        self.record("get_messages", conversation_id).await?;
        let messages = self.messages.lock();
        Ok(messages
            .get(&conversation_id)
            .map(|m| page(m, skip, limit))
            .unwrap_or_default())
    }

    async fn send_message(
        &self,
        receiver_id: UserId,
        content: &str,
    ) -> Result<Message, ClientError> {
        self.record("send_message", content).await?;
        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        let conversation_id = self
            .conversations
            .lock()
            .iter()
            .find(|c| c.other_user.id == receiver_id)
            .map(|c| c.id)
            .unwrap_or_default();
        let mut sent = message(id, conversation_id, &user(99, "me"), &user(receiver_id, "peer"));
        sent.content = Some(content.to_string());
        Ok(sent)
    }

    async fn send_image_message(
        &self,
        receiver_id: UserId,
        image: Upload,
    ) -> Result<Message, ClientError> {
        self.record("send_image_message", &image.file_name).await?;
        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        let mut sent = message(id, 0, &user(99, "me"), &user(receiver_id, "peer"));
        sent.content = None;
        sent.message_type = MessageKind::Image;
        sent.image_url = Some(format!("/uploads/messages/{}", image.file_name));
        Ok(sent)
    }

    async fn get_notifications(&self) -> Result<Vec<Notification>, ClientError> {
        self.record("get_notifications", "").await?;
        Ok(self.notifications.lock().clone())
    }

    async fn unread_count(&self) -> Result<u64, ClientError> {
        self.record("unread_count", "").await?;
        Ok(*self.unread.lock())
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<(), ClientError> {
        self.record("mark_notification_read", id).await
    }

    async fn mark_all_notifications_read(&self) -> Result<(), ClientError> {
        self.record("mark_all_notifications_read", "").await
    }

    async fn like_post(&self, post_id: PostId) -> Result<(), ClientError> {
        self.record("like_post", post_id).await
    }

    async fn unlike_post(&self, post_id: PostId) -> Result<(), ClientError> {
        self.record("unlike_post", post_id).await
    }

    async fn follow_user(&self, username: &str) -> Result<(), ClientError> {
        self.record("follow_user", username).await
    }

    async fn unfollow_user(&self, username: &str) -> Result<(), ClientError> {
        self.record("unfollow_user", username).await
    }

    async fn get_feed(&self, skip: u32, limit: u32) -> Result<Vec<Post>, ClientError> {
        self.record("get_feed", skip).await?;
        Ok(page(&self.posts.lock(), skip, limit))
    }

    async fn create_post(&self, image: Upload, caption: &str) -> Result<Post, ClientError> {
        self.record("create_post", &image.file_name).await?;
        let mut created = post(self.next_message_id.fetch_add(1, Ordering::SeqCst), false, 0);
        created.caption = (!caption.is_empty()).then(|| caption.to_string());
        created.image_url = Some(format!("/uploads/{}", image.file_name));
        self.posts.lock().insert(0, created.clone());
        Ok(created)
    }

    async fn get_comments(
        &self,
        post_id: PostId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Comment>, ClientError> {
        self.record("get_comments", post_id).await?;
        Ok(page(&self.comments.lock(), skip, limit))
    }

    async fn create_comment(
        &self,
        post_id: PostId,
        content: &str,
    ) -> Result<Comment, ClientError> {
        self.record("create_comment", content).await?;
        let author = user(99, "me");
        Ok(Comment {
            id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
            content: content.to_string(),
            created_at: ts(500),
            author_id: author.id,
            post_id,
            author,
        })
    }

    async fn get_hashtag(&self, name: &str) -> Result<Hashtag, ClientError> {
        self.record("get_hashtag", name).await?;
        self.hashtags
            .lock()
            .iter()
            .find(|h| h.name == name)
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn get_hashtag_posts(
        &self,
        name: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Post>, ClientError> {
        self.record("get_hashtag_posts", format!("{name}@{skip}")).await?;
        Ok(page(&self.posts.lock(), skip, limit))
    }

    async fn trending_hashtags(&self, limit: u32) -> Result<Vec<Hashtag>, ClientError> {
        self.record("trending_hashtags", limit).await?;
        Ok(self
            .hashtags
            .lock()
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
