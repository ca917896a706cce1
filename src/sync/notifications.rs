// SPDX-License-Identifier: MPL-2.0

use crate::api::{Notification, NotificationId, SocialApi};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationsState {
    Loading,
    Ready,
    Failed(String),
}

/// The notification list. Read marks are applied locally first and never
/// rolled back.
pub struct NotificationsView {
    api: Arc<dyn SocialApi>,
    items: Vec<Notification>,
    state: NotificationsState,
}

impl NotificationsView {
    pub fn new(api: Arc<dyn SocialApi>) -> Self {
        Self {
            api,
            items: Vec::new(),
            state: NotificationsState::Loading,
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn state(&self) -> &NotificationsState {
        &self.state
    }

    pub fn unread(&self) -> usize {
        self.items.iter().filter(|n| !n.is_read).count()
    }

    pub async fn load(&mut self) {
        match self.api.get_notifications().await {
            Ok(items) => {
                self.items = items;
                self.state = NotificationsState::Ready;
            }
            Err(e) => {
                warn!("failed to load notifications: {e}");
                self.state = NotificationsState::Failed("Failed to load notifications".into());
            }
        }
    }

    /// Returns `None` when `id` is not in the list.
    pub fn mark_read(&mut self, id: NotificationId) -> Option<JoinHandle<()>> {
        let item = self.items.iter_mut().find(|n| n.id == id)?;
        item.is_read = true;

        let api = Arc::clone(&self.api);
        Some(tokio::spawn(async move {
            if let Err(e) = api.mark_notification_read(id).await {
                warn!(notification_id = id, "failed to mark notification as read: {e}");
            }
        }))
    }

    pub fn mark_all_read(&mut self) -> JoinHandle<()> {
        for item in &mut self.items {
            item.is_read = true;
        }

        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            if let Err(e) = api.mark_all_notifications_read().await {
                warn!("failed to mark all notifications as read: {e}");
            }
        })
    }
}
