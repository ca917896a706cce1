// SPDX-License-Identifier: MPL-2.0

//! Offset-paged post and comment lists: home feed, hashtag page, comments.

use crate::api::{ClientError, Comment, Hashtag, Post, PostId, SocialApi};
use crate::config::{COMMENT_PAGE_SIZE, FEED_PAGE_SIZE, TRENDING_LIMIT};
use crate::sync::paging::PagedList;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Home feed of posts from followed users.
pub struct FeedView {
    api: Arc<dyn SocialApi>,
    posts: PagedList<Post>,
    state: LoadState,
}

impl FeedView {
    pub fn new(api: Arc<dyn SocialApi>) -> Self {
        Self::with_page_size(api, FEED_PAGE_SIZE)
    }

    pub fn with_page_size(api: Arc<dyn SocialApi>, page_size: u32) -> Self {
        Self {
            api,
            posts: PagedList::new(page_size),
            state: LoadState::Loading,
        }
    }

    pub fn posts(&self) -> &[Post] {
        self.posts.items()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn has_more(&self) -> bool {
        self.posts.has_more()
    }

    pub async fn load(&mut self) {
        match self.api.get_feed(0, self.posts.page_size()).await {
            Ok(page) => {
                self.posts.replace(page);
                self.state = LoadState::Ready;
            }
            Err(e) => {
                warn!("failed to load feed: {e}");
                self.state = LoadState::Failed("Failed to load posts".to_string());
            }
        }
    }

    pub async fn load_more(&mut self) {
        let offset = self.posts.next_offset();
        match self.api.get_feed(offset, self.posts.page_size()).await {
            Ok(page) => {
                debug!(offset, count = page.len(), "feed page loaded");
                self.posts.append_page(page);
            }
            Err(e) => warn!(offset, "failed to load more posts: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashtagState {
    Loading,
    Ready,
    NotFound,
}

/// Posts tagged with one hashtag.
pub struct HashtagView {
    api: Arc<dyn SocialApi>,
    name: String,
    hashtag: Option<Hashtag>,
    posts: PagedList<Post>,
    state: HashtagState,
}

impl HashtagView {
    pub fn new(api: Arc<dyn SocialApi>, name: &str) -> Self {
        Self::with_page_size(api, name, FEED_PAGE_SIZE)
    }

    pub fn with_page_size(api: Arc<dyn SocialApi>, name: &str, page_size: u32) -> Self {
        Self {
            api,
            name: name.trim_start_matches('#').to_lowercase(),
            hashtag: None,
            posts: PagedList::new(page_size),
            state: HashtagState::Loading,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hashtag(&self) -> Option<&Hashtag> {
        self.hashtag.as_ref()
    }

    pub fn posts(&self) -> &[Post] {
        self.posts.items()
    }

    pub fn state(&self) -> &HashtagState {
        &self.state
    }

    pub fn has_more(&self) -> bool {
        self.posts.has_more()
    }

    /// Load the tag and its first page. Any failure lands in `NotFound`.
    pub async fn load(&mut self) {
        self.state = HashtagState::Loading;

        match self.fetch_first_page().await {
            Ok((hashtag, page)) => {
                self.hashtag = Some(hashtag);
                self.posts.replace(page);
                self.state = HashtagState::Ready;
            }
            Err(e) => {
                warn!(hashtag = %self.name, "failed to load hashtag: {e}");
                self.hashtag = None;
                self.posts.clear();
                self.state = HashtagState::NotFound;
            }
        }
    }

    async fn fetch_first_page(&self) -> Result<(Hashtag, Vec<Post>), ClientError> {
        let hashtag = self.api.get_hashtag(&self.name).await?;
        let page = self
            .api
            .get_hashtag_posts(&self.name, 0, self.posts.page_size())
            .await?;
        Ok((hashtag, page))
    }

    pub async fn load_more(&mut self) {
        let offset = self.posts.next_offset();
        match self
            .api
            .get_hashtag_posts(&self.name, offset, self.posts.page_size())
            .await
        {
            Ok(page) => self.posts.append_page(page),
            Err(e) => warn!(hashtag = %self.name, offset, "failed to load more posts: {e}"),
        }
    }
}

/// Trending hashtags for the sidebar; empty on failure.
pub async fn trending_hashtags(api: &dyn SocialApi) -> Vec<Hashtag> {
    match api.trending_hashtags(TRENDING_LIMIT).await {
        Ok(tags) => tags,
        Err(e) => {
            warn!("failed to load trending hashtags: {e}");
            Vec::new()
        }
    }
}

/// Collapsible comment list under a post.
pub struct CommentsView {
    api: Arc<dyn SocialApi>,
    post_id: PostId,
    comments: PagedList<Comment>,
    visible: bool,
}

impl CommentsView {
    pub fn new(api: Arc<dyn SocialApi>, post_id: PostId) -> Self {
        Self {
            api,
            post_id,
            comments: PagedList::new(COMMENT_PAGE_SIZE),
            visible: false,
        }
    }

    pub fn comments(&self) -> &[Comment] {
        self.comments.items()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show (fetching the first page) or hide the list.
    pub async fn toggle(&mut self) {
        if self.visible {
            self.visible = false;
            return;
        }

        match self
            .api
            .get_comments(self.post_id, 0, self.comments.page_size())
            .await
        {
            Ok(page) => {
                self.comments.replace(page);
                self.visible = true;
            }
            Err(e) => warn!(post_id = self.post_id, "failed to load comments: {e}"),
        }
    }

    pub async fn load_more(&mut self) {
        let offset = self.comments.next_offset();
        match self
            .api
            .get_comments(self.post_id, offset, self.comments.page_size())
            .await
        {
            Ok(page) => self.comments.append_page(page),
            Err(e) => warn!(post_id = self.post_id, offset, "failed to load comments: {e}"),
        }
    }

    /// Post a comment; the created comment goes to the top of the list.
    pub async fn add(&mut self, content: &str) -> Result<(), ClientError> {
        if content.trim().is_empty() {
            return Err(ClientError::Validation("comment is empty".into()));
        }
        let comment = self.api.create_comment(self.post_id, content).await?;
        self.comments.prepend(comment);
        Ok(())
    }
}
