// SPDX-License-Identifier: MPL-2.0

use crate::api::{SocialApi, UserProfile};
use crate::sync::mutation::{OptimisticToggle, ToggleValue};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileState {
    Loading,
    Ready,
    NotFound,
}

/// A user's profile page with its follow button.
pub struct ProfileView {
    api: Arc<dyn SocialApi>,
    username: String,
    profile: Option<UserProfile>,
    follow: Option<OptimisticToggle>,
    state: ProfileState,
}

impl ProfileView {
    pub fn new(api: Arc<dyn SocialApi>, username: &str) -> Self {
        Self {
            api,
            username: username.trim_start_matches('@').to_string(),
            profile: None,
            follow: None,
            state: ProfileState::Loading,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    /// Follow state as currently displayed, including unconfirmed toggles.
    pub fn follow_state(&self) -> Option<ToggleValue> {
        self.follow.as_ref().map(OptimisticToggle::value)
    }

    /// Any failure lands in `NotFound`.
    pub async fn load(&mut self) {
        self.state = ProfileState::Loading;

        match self.api.get_profile(&self.username).await {
            Ok(profile) => {
                self.follow = Some(OptimisticToggle::for_profile(
                    Arc::clone(&self.api),
                    &profile,
                ));
                self.profile = Some(profile);
                self.state = ProfileState::Ready;
            }
            Err(e) => {
                warn!(username = %self.username, "failed to load profile: {e}");
                self.profile = None;
                self.follow = None;
                self.state = ProfileState::NotFound;
            }
        }
    }

    /// Flip follow/unfollow. `None` until a profile has loaded.
    pub fn toggle_follow(&self) -> Option<JoinHandle<()>> {
        self.follow.as_ref().map(OptimisticToggle::toggle)
    }
}
