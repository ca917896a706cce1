// SPDX-License-Identifier: MPL-2.0

//! Conversation index plus the message thread of the selected conversation.

use crate::api::{ClientError, Conversation, ConversationId, Message, SocialApi, Upload, UserId};
use crate::config::MESSAGE_PAGE_SIZE;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct MessagesView {
    api: Arc<dyn SocialApi>,
    conversations: Vec<Conversation>,
    selected: Option<ConversationId>,
    thread: Vec<Message>,
    page_size: u32,
    loading: bool,
    sending: bool,
}

impl MessagesView {
    pub fn new(api: Arc<dyn SocialApi>) -> Self {
        Self {
            api,
            conversations: Vec::new(),
            selected: None,
            thread: Vec::new(),
            page_size: MESSAGE_PAGE_SIZE,
            loading: true,
            sending: false,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn selected(&self) -> Option<&Conversation> {
        let id = self.selected?;
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn selected_id(&self) -> Option<ConversationId> {
        self.selected
    }

    pub fn thread(&self) -> &[Message] {
        &self.thread
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Route of the current selection, e.g. `/messages/4`.
    pub fn route(&self) -> String {
        match self.selected {
            Some(id) => format!("/messages/{id}"),
            None => "/messages".to_string(),
        }
    }

    /// Mount: load the index, then select `initial` (from the route) if known.
    pub async fn open(&mut self, initial: Option<ConversationId>) {
        self.refresh_conversations().await;
        self.loading = false;

        if let Some(id) = initial {
            if self.conversations.iter().any(|c| c.id == id) {
                self.select_conversation(id).await;
            } else {
                debug!(conversation_id = id, "conversation from route not in index");
            }
        }
    }

    /// Reload the index. Failures leave the previous index in place.
    pub async fn refresh_conversations(&mut self) {
        match self.api.get_conversations().await {
            Ok(conversations) => self.conversations = conversations,
            Err(e) => warn!("failed to load conversations: {e}"),
        }
    }

    /// Point the selection at `id` and replace the thread with a fresh fetch.
    /// Unread counters are left alone.
    pub async fn select_conversation(&mut self, id: ConversationId) {
        self.selected = Some(id);

        match self.api.get_messages(id, 0, self.page_size).await {
            Ok(messages) => {
                debug!(conversation_id = id, count = messages.len(), "thread loaded");
                self.thread = messages;
            }
            Err(e) => warn!(conversation_id = id, "failed to load messages: {e}"),
        }
    }

    /// Open (or create) the conversation with `user_id` and select it.
    pub async fn start_with(&mut self, user_id: UserId) -> Result<ConversationId, ClientError> {
        let conversation = self.api.get_or_create_conversation(user_id).await?;
        let id = conversation.id;
        if !self.conversations.iter().any(|c| c.id == id) {
            self.conversations.insert(0, conversation);
        }
        self.select_conversation(id).await;
        Ok(id)
    }

    /// Push a sent message to the end of the active thread.
    pub fn append_sent(&mut self, message: Message) {
        self.thread.push(message);
    }

    pub async fn send_text(&mut self, content: &str) -> Result<(), ClientError> {
        if content.trim().is_empty() {
            return Err(ClientError::Validation("message is empty".into()));
        }
        let receiver = self.receiver()?;

        self.sending = true;
        let result = self.api.send_message(receiver, content).await;
        self.sending = false;

        self.finish_send(result?).await;
        Ok(())
    }

    pub async fn send_image(&mut self, image: Upload) -> Result<(), ClientError> {
        if image.bytes.is_empty() {
            return Err(ClientError::Validation("image is empty".into()));
        }
        let receiver = self.receiver()?;

        self.sending = true;
        let result = self.api.send_image_message(receiver, image).await;
        self.sending = false;

        self.finish_send(result?).await;
        Ok(())
    }

    fn receiver(&self) -> Result<UserId, ClientError> {
        self.selected()
            .map(|c| c.other_user.id)
            .ok_or_else(|| ClientError::Validation("no conversation selected".into()))
    }

    // The thread append and the sidebar refresh are independent: a failed
    // refresh only leaves the preview stale.
    async fn finish_send(&mut self, message: Message) {
        self.append_sent(message);
        self.refresh_conversations().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{self, FakeApi};

    fn seeded() -> Arc<FakeApi> {
        let api = FakeApi::new();
        let me = fake::user(99, "me");
        let bob = fake::user(2, "bob");
        *api.conversations.lock() = vec![fake::conversation(1, &bob, 2)];
        api.messages.lock().insert(
            1,
            vec![fake::message(1, 1, &bob, &me), fake::message(2, 1, &me, &bob)],
        );
        api
    }

    #[tokio::test]
    async fn test_select_fetches_thread_and_keeps_unread() {
        let api = seeded();
        let mut view = MessagesView::new(api.clone());

        view.open(None).await;
        assert!(!view.is_loading());
        view.select_conversation(1).await;

        assert_eq!(api.calls_to("get_messages"), vec!["get_messages:1"]);
        assert_eq!(view.thread().len(), 2);
        assert_eq!(view.selected().map(|c| c.unread_count), Some(2));
        assert!(api.calls_to("mark_notification_read").is_empty());
        assert_eq!(view.route(), "/messages/1");
    }

    #[tokio::test]
    async fn test_open_selects_conversation_from_route() {
        let api = seeded();
        let mut view = MessagesView::new(api.clone());

        view.open(Some(1)).await;
        assert_eq!(view.selected_id(), Some(1));
        assert_eq!(view.thread().len(), 2);

        let mut other = MessagesView::new(api.clone());
        other.open(Some(42)).await;
        assert_eq!(other.selected_id(), None);
    }

    #[tokio::test]
    async fn test_reselect_replaces_thread() {
        let api = seeded();
        let mut view = MessagesView::new(api.clone());
        view.open(Some(1)).await;
        view.append_sent(fake::message(3, 1, &fake::user(99, "me"), &fake::user(2, "bob")));

        view.select_conversation(1).await;
        assert_eq!(view.thread().len(), 2);
    }

    #[tokio::test]
    async fn test_append_sent_survives_failed_refresh() {
        let api = seeded();
        let mut view = MessagesView::new(api.clone());
        view.open(Some(1)).await;

        api.fail("get_conversations");
        view.send_text("hello bob").await.unwrap();

        assert_eq!(view.thread().len(), 3);
        assert_eq!(
            view.thread().last().and_then(|m| m.content.as_deref()),
            Some("hello bob")
        );
        assert_eq!(view.conversations().len(), 1);
        assert!(!view.is_sending());
    }

    #[tokio::test]
    async fn test_send_refreshes_conversation_index() {
        let api = seeded();
        let mut view = MessagesView::new(api.clone());
        view.open(Some(1)).await;

        view.send_text("hi").await.unwrap();
        assert_eq!(api.calls_to("get_conversations").len(), 2);
    }

    #[tokio::test]
    async fn test_send_validation_blocks_request() {
        let api = seeded();
        let mut view = MessagesView::new(api.clone());
        view.open(None).await;

        assert!(matches!(
            view.send_text("hi").await,
            Err(ClientError::Validation(_))
        ));
        view.select_conversation(1).await;
        assert!(matches!(
            view.send_text("  \n").await,
            Err(ClientError::Validation(_))
        ));
        assert!(api.calls_to("send_message").is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_leaves_thread_untouched() {
        let api = seeded();
        api.fail("send_message");
        let mut view = MessagesView::new(api.clone());
        view.open(Some(1)).await;

        assert!(view.send_text("lost").await.is_err());
        assert_eq!(view.thread().len(), 2);
        assert_eq!(api.calls_to("get_conversations").len(), 1);
    }

    #[tokio::test]
    async fn test_send_image_appends_image_message() {
        let api = seeded();
        let mut view = MessagesView::new(api.clone());
        view.open(Some(1)).await;

        view.send_image(Upload {
            bytes: vec![0xff, 0xd8],
            file_name: "cat.jpg".into(),
            mime: "image/jpeg".into(),
        })
        .await
        .unwrap();

        let last = view.thread().last().unwrap();
        assert_eq!(last.preview(), "Photo");
        assert_eq!(api.calls_to("send_image_message"), vec!["send_image_message:cat.jpg"]);
    }

    #[tokio::test]
    async fn test_start_with_new_user_selects_it() {
        let api = seeded();
        let mut view = MessagesView::new(api.clone());
        view.open(None).await;

        let id = view.start_with(7).await.unwrap();
        assert_eq!(view.selected_id(), Some(id));
        assert_eq!(view.conversations()[0].other_user.id, 7);
    }
}
