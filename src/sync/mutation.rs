// SPDX-License-Identifier: MPL-2.0

//! Optimistic like/follow toggles.
//!
//! The displayed value flips and the counter moves by one before the request
//! is even sent. Each toggle records a `MutationIntent`; a newer toggle
//! supersedes the outstanding intent, and a superseded request's completion
//! never touches the displayed value.

use crate::api::{ClientError, Post, PostId, SocialApi, UserProfile};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleTarget {
    Like(PostId),
    Follow(String),
}

impl ToggleTarget {
    async fn send(&self, api: &dyn SocialApi, active: bool) -> Result<(), ClientError> {
        match (self, active) {
            (ToggleTarget::Like(post_id), true) => api.like_post(*post_id).await,
            (ToggleTarget::Like(post_id), false) => api.unlike_post(*post_id).await,
            (ToggleTarget::Follow(username), true) => api.follow_user(username).await,
            (ToggleTarget::Follow(username), false) => api.unfollow_user(username).await,
        }
    }
}

/// A boolean plus the counter it drives (liked + likes, following + followers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleValue {
    pub active: bool,
    pub count: u32,
}

impl ToggleValue {
    pub fn flipped(self) -> Self {
        if self.active {
            Self {
                active: false,
                count: self.count.saturating_sub(1),
            }
        } else {
            Self {
                active: true,
                count: self.count.saturating_add(1),
            }
        }
    }
}

/// What to do with the optimistic value when its request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollbackPolicy {
    /// Log and keep the optimistic value.
    #[default]
    Keep,
    /// Restore the value from before the failed toggle, if it is still the
    /// latest one.
    Revert,
}

#[derive(Debug, Clone, Copy)]
struct MutationIntent {
    seq: u64,
    previous: ToggleValue,
}

#[derive(Debug)]
struct ToggleInner {
    value: ToggleValue,
    pending: Option<MutationIntent>,
    seq: u64,
}

pub struct OptimisticToggle {
    api: Arc<dyn SocialApi>,
    target: ToggleTarget,
    policy: RollbackPolicy,
    inner: Arc<Mutex<ToggleInner>>,
}

impl OptimisticToggle {
    pub fn new(api: Arc<dyn SocialApi>, target: ToggleTarget, initial: ToggleValue) -> Self {
        Self {
            api,
            target,
            policy: RollbackPolicy::default(),
            inner: Arc::new(Mutex::new(ToggleInner {
                value: initial,
                pending: None,
                seq: 0,
            })),
        }
    }

    pub fn for_post(api: Arc<dyn SocialApi>, post: &Post) -> Self {
        Self::new(
            api,
            ToggleTarget::Like(post.id),
            ToggleValue {
                active: post.is_liked,
                count: post.likes_count,
            },
        )
    }

    pub fn for_profile(api: Arc<dyn SocialApi>, profile: &UserProfile) -> Self {
        Self::new(
            api,
            ToggleTarget::Follow(profile.user.username.clone()),
            ToggleValue {
                active: profile.is_following,
                count: profile.followers_count,
            },
        )
    }

    pub fn with_policy(mut self, policy: RollbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn target(&self) -> &ToggleTarget {
        &self.target
    }

    pub fn value(&self) -> ToggleValue {
        self.inner.lock().value
    }

    pub fn is_pending(&self) -> bool {
        self.inner.lock().pending.is_some()
    }

    /// Flip now, send the matching set/unset request in the background.
    ///
    /// The returned handle resolves once the request has completed and its
    /// outcome has been applied.
    pub fn toggle(&self) -> JoinHandle<()> {
        let (seq, desired) = {
            let mut inner = self.inner.lock();
            let previous = inner.value;
            inner.value = previous.flipped();
            inner.seq += 1;

            if let Some(outstanding) = inner.pending {
                debug!(mutation = ?self.target, seq = outstanding.seq, "superseding mutation");
            }
            let seq = inner.seq;
            inner.pending = Some(MutationIntent { seq, previous });
            (seq, inner.value.active)
        };

        let api = Arc::clone(&self.api);
        let inner = Arc::clone(&self.inner);
        let mutation = self.target.clone();
        let policy = self.policy;

        tokio::spawn(async move {
            let result = mutation.send(api.as_ref(), desired).await;

            let mut inner = inner.lock();
            let latest = inner.pending.is_some_and(|p| p.seq == seq);

            if let Err(e) = result {
                warn!(?mutation, desired, "optimistic mutation failed: {e}");
                if latest
                    && policy == RollbackPolicy::Revert
                    && let Some(intent) = inner.pending
                {
                    inner.value = intent.previous;
                }
            }

            if latest {
                inner.pending = None;
            }
        })
    }
}
