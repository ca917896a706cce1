// SPDX-License-Identifier: MPL-2.0

mod compose;
mod feed;
mod mutation;
mod notifications;
mod paging;
mod polling;
mod profile;
mod search;
mod stories;
mod threads;

pub use compose::{publish_post, publish_story};
pub use feed::{
    CommentsView, FeedView, HashtagState, HashtagView, LoadState, trending_hashtags,
};
pub use mutation::{OptimisticToggle, RollbackPolicy, ToggleTarget, ToggleValue};
pub use notifications::{NotificationsState, NotificationsView};
pub use paging::PagedList;
pub use polling::{PollHandle, UnreadPoller, badge_label};
pub use profile::{ProfileState, ProfileView};
pub use search::{SearchController, SearchState};
pub use stories::{StoryGroup, StoryTray, ViewerState, group_by_author};
pub use threads::MessagesView;
