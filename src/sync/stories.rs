// SPDX-License-Identifier: MPL-2.0

//! Story tray: groups the flat story list by author and drives the viewer.

use crate::api::{ClientError, SocialApi, Story, StoryId, StoryView, User, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// All active stories of one author, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryGroup {
    pub user: User,
    pub stories: Vec<Story>,
    pub has_unviewed: bool,
}

/// Group stories by author in a single pass.
///
/// Group order is the order in which each author first appears; within a
/// group the input order is kept.
pub fn group_by_author(stories: Vec<Story>) -> Vec<StoryGroup> {
    let mut groups: Vec<StoryGroup> = Vec::new();
    let mut index: HashMap<UserId, usize> = HashMap::new();

    for story in stories {
        let slot = *index.entry(story.author.id).or_insert_with(|| {
            groups.push(StoryGroup {
                user: story.author.clone(),
                stories: Vec::new(),
                has_unviewed: false,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.has_unviewed |= !story.is_viewed;
        group.stories.push(story);
    }

    groups
}

/// Position of the story viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerState {
    #[default]
    Closed,
    Viewing { group: usize, story: usize },
}

impl ViewerState {
    pub fn open(groups: &[StoryGroup], group: usize) -> Self {
        match groups.get(group) {
            Some(g) if !g.stories.is_empty() => ViewerState::Viewing { group, story: 0 },
            _ => ViewerState::Closed,
        }
    }

    pub fn next(self, groups: &[StoryGroup]) -> Self {
        let ViewerState::Viewing { group, story } = self else {
            return ViewerState::Closed;
        };
        let len = groups.get(group).map_or(0, |g| g.stories.len());

        if story + 1 < len {
            ViewerState::Viewing {
                group,
                story: story + 1,
            }
        } else if group + 1 < groups.len() {
            ViewerState::open(groups, group + 1)
        } else {
            ViewerState::Closed
        }
    }

    pub fn prev(self, groups: &[StoryGroup]) -> Self {
        let ViewerState::Viewing { group, story } = self else {
            return ViewerState::Closed;
        };

        if story > 0 {
            ViewerState::Viewing {
                group,
                story: story - 1,
            }
        } else if group > 0 {
            match groups.get(group - 1).map_or(0, |g| g.stories.len()) {
                0 => self,
                len => ViewerState::Viewing {
                    group: group - 1,
                    story: len - 1,
                },
            }
        } else {
            self
        }
    }

    pub fn story<'a>(&self, groups: &'a [StoryGroup]) -> Option<&'a Story> {
        match *self {
            ViewerState::Closed => None,
            ViewerState::Viewing { group, story } => groups.get(group)?.stories.get(story),
        }
    }
}

/// Owns the grouped stories and the viewer; fires "mark viewed" whenever the
/// viewer lands on an unviewed story.
pub struct StoryTray {
    api: Arc<dyn SocialApi>,
    groups: Vec<StoryGroup>,
    viewer: ViewerState,
    loading: bool,
}

impl StoryTray {
    pub fn new(api: Arc<dyn SocialApi>) -> Self {
        Self {
            api,
            groups: Vec::new(),
            viewer: ViewerState::Closed,
            loading: true,
        }
    }

    pub fn groups(&self) -> &[StoryGroup] {
        &self.groups
    }

    pub fn viewer(&self) -> ViewerState {
        self.viewer
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Refetch every visible story and rebuild the groups from scratch.
    pub async fn load(&mut self) {
        let result = self.api.get_stories().await;
        self.apply(result, "stories");
    }

    pub async fn load_for_user(&mut self, username: &str) {
        let result = self.api.get_user_stories(username).await;
        self.apply(result, username);
    }

    fn apply(&mut self, result: Result<Vec<Story>, ClientError>, source: &str) {
        self.loading = false;
        match result {
            Ok(stories) => {
                self.groups = group_by_author(stories);
                self.viewer = ViewerState::Closed;
                debug!(source, groups = self.groups.len(), "stories loaded");
            }
            Err(e) => warn!(source, "failed to load stories: {e}"),
        }
    }

    pub fn open(&mut self, group: usize) {
        let next = ViewerState::open(&self.groups, group);
        self.transition(next);
    }

    pub fn next(&mut self) {
        let next = self.viewer.next(&self.groups);
        self.transition(next);
    }

    pub fn prev(&mut self) {
        let next = self.viewer.prev(&self.groups);
        self.transition(next);
    }

    pub fn close(&mut self) {
        self.viewer = ViewerState::Closed;
    }

    pub fn current_story(&self) -> Option<&Story> {
        self.viewer.story(&self.groups)
    }

    pub fn current_group(&self) -> Option<&StoryGroup> {
        match self.viewer {
            ViewerState::Closed => None,
            ViewerState::Viewing { group, .. } => self.groups.get(group),
        }
    }

    /// One flag per story of the open group; filled up to the current story.
    pub fn progress(&self) -> Vec<bool> {
        match self.viewer {
            ViewerState::Closed => Vec::new(),
            ViewerState::Viewing { group, story } => self
                .groups
                .get(group)
                .map(|g| (0..g.stories.len()).map(|i| i <= story).collect())
                .unwrap_or_default(),
        }
    }

    /// Who has seen one of our stories.
    pub async fn viewers(&self, story_id: StoryId) -> Result<Vec<StoryView>, ClientError> {
        self.api.get_story_views(story_id).await
    }

    fn transition(&mut self, next: ViewerState) {
        if next == self.viewer {
            return;
        }
        self.viewer = next;

        if let Some(story) = self.current_story()
            && !story.is_viewed
        {
            self.mark_viewed(story.id);
        }
    }

    fn mark_viewed(&self, story_id: StoryId) {
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            if let Err(e) = api.view_story(story_id).await {
                warn!(story_id, "failed to mark story as viewed: {e}");
            }
        });
    }
}
