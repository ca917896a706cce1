// SPDX-License-Identifier: MPL-2.0

mod client;
#[cfg(test)]
pub(crate) mod fake;
mod timestamp;
mod types;

pub use client::{ApiClient, ClientError, SocialApi};
pub use types::{
    Comment, Conversation, ConversationId, Hashtag, Message, MessageId, MessageKind, NewUser,
    Notification, NotificationId, NotificationKind, Post, PostId, PostImage, Session, Story,
    StoryId, StoryView, Token, UnreadCount, Upload, User, UserId, UserProfile,
};
