use crate::error::Result;

pub mod batch;
pub mod client;
pub mod poller;
pub mod request;

pub use batch::{BatchEntry, BatchResult};
pub use client::QuoteClient;
pub use poller::{poll, spawn_poller, PollRequest, PollerHandle};

pub type FetchResult<T> = Result<T>;

#[inline]
pub fn ensure_concurrency_limit(limit: usize) -> usize {
    limit.max(1)
}
