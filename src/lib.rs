// SPDX-License-Identifier: MPL-2.0

//! Client synchronization core for Vistagram: debounced search, story
//! grouping, paginated message threads, optimistic toggles and unread polling.

pub mod api;
pub mod config;
pub mod runtime;
pub mod state;
pub mod sync;
pub mod text;
