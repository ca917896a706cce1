// SPDX-License-Identifier: MPL-2.0

use std::time::Duration;

pub const APP_ID: &str = "io.github.vistagram.Client";
pub const USER_AGENT: &str = "Vistagram/0.1 (Rust client)";

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Quiet period after the last keystroke before a user search fires.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
/// Queries shorter than this (in chars, after trimming) never hit the network.
pub const MIN_QUERY_CHARS: usize = 2;
pub const SEARCH_LIMIT: u32 = 10;

pub const UNREAD_POLL_INTERVAL: Duration = Duration::from_secs(30);

pub const FEED_PAGE_SIZE: u32 = 20;
pub const MESSAGE_PAGE_SIZE: u32 = 50;
pub const COMMENT_PAGE_SIZE: u32 = 50;
pub const TRENDING_LIMIT: u32 = 5;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
