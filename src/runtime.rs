// SPDX-License-Identifier: MPL-2.0

//! The binary's Tokio runtime.
//!
//! Views, toggles and the unread poller call `tokio::spawn`, so `main` runs
//! each command inside [`block_on`] and everything they spawn shares these
//! workers. Anything still running when `block_on` returns is dropped with
//! the process.

use once_cell::sync::Lazy;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::runtime::Runtime;

const MAX_WORKERS: usize = 4;

fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map_or(1, |n| n.get())
        .clamp(1, MAX_WORKERS)
}

static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_count())
        .enable_all()
        .thread_name_fn(|| {
            static NEXT: AtomicUsize = AtomicUsize::new(0);
            format!("vistagram-net-{}", NEXT.fetch_add(1, Ordering::Relaxed))
        })
        .build()
        .expect("failed to create async runtime")
});

/// Run one command to completion.
pub fn block_on<F: Future>(future: F) -> F::Output {
    RUNTIME.block_on(future)
}
