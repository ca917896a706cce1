// SPDX-License-Identifier: MPL-2.0

//! Periodic unread-notification count for the badge.
//!
//! Polling is scoped: `UnreadPoller::start` hands back a `PollHandle` and the
//! timer lives exactly as long as that handle.

use crate::api::SocialApi;
use crate::config::UNREAD_POLL_INTERVAL;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

pub struct UnreadPoller;

impl UnreadPoller {
    /// Fetch the count now and then once per `period`. Must be called from
    /// within a Tokio runtime.
    pub fn start(api: Arc<dyn SocialApi>, period: Duration) -> PollHandle {
        let (tx, rx) = watch::channel(0u64);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match api.unread_count().await {
                    Ok(count) => {
                        debug!(count, "unread count refreshed");
                        tx.send_if_modified(|current| {
                            if *current == count {
                                return false;
                            }
                            *current = count;
                            true
                        });
                    }
                    Err(e) => warn!("failed to load unread count: {e}"),
                }
            }
        });

        PollHandle { task, rx }
    }

    pub fn start_default(api: Arc<dyn SocialApi>) -> PollHandle {
        Self::start(api, UNREAD_POLL_INTERVAL)
    }
}

/// Owns the polling task. Dropping the handle stops polling.
pub struct PollHandle {
    task: JoinHandle<()>,
    rx: watch::Receiver<u64>,
}

impl PollHandle {
    /// Last successfully fetched count (0 until the first success).
    pub fn count(&self) -> u64 {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.rx.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop polling; call on teardown of the owning view.
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Badge text: nothing for zero, capped at "99+".
pub fn badge_label(count: u64) -> Option<String> {
    match count {
        0 => None,
        1..=99 => Some(count.to_string()),
        _ => Some("99+".to_string()),
    }
}
