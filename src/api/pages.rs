//! Concurrent page fan-out for oversized remote collections.
//!
//! Spotify caps collection endpoints at 100 items per call. Given the total
//! reported by a prior metadata call, [`fetch_all`] issues every page request
//! at once, waits for all of them to settle, and reassembles the items in
//! ascending offset order. Completion order never leaks into the result:
//! playlist position is semantically meaningful.
//!
//! The contract is all-or-nothing. If any page fails, the whole fetch fails
//! with [`SpotifyError::PartialRetrieval`] carrying every failed offset, and
//! no partial collection is returned.

use std::future::Future;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::error::{Result, SpotifyError};

/// The API's fixed maximum page size.
pub const PAGE_SIZE: u32 = 100;

/// Offsets of the minimal page set covering `total` items.
///
/// Always at least one page: a zero-item collection still issues a single
/// request to confirm emptiness.
///
/// # Panics
///
/// Panics if `page_size` is zero.
pub fn page_offsets(total: u32, page_size: u32) -> Vec<u32> {
    assert!(page_size > 0, "page_size must be positive");
    let pages = total.div_ceil(page_size).max(1);
    (0..pages).map(|i| i * page_size).collect()
}

/// Fetch every page of a collection concurrently and reassemble in offset
/// order.
///
/// `fetch_page` is called once per offset; all resulting futures are awaited
/// together, so the pages are in flight concurrently on a single task. The
/// call settles only after every page has settled, even when some already
/// failed.
pub async fn fetch_all<T, F, Fut>(total: u32, page_size: u32, fetch_page: F) -> Result<Vec<T>>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let offsets = page_offsets(total, page_size);
    debug!(total, pages = offsets.len(), "fanning out page requests");

    let settled = join_all(offsets.iter().map(|&offset| fetch_page(offset))).await;

    let mut items = Vec::with_capacity(total as usize);
    let mut failed = Vec::new();
    for (&offset, result) in offsets.iter().zip(settled) {
        match result {
            Ok(page) => items.extend(page),
            Err(err) => {
                warn!(offset, error = %err, "page request failed");
                failed.push(offset);
            }
        }
    }

    if !failed.is_empty() {
        return Err(SpotifyError::PartialRetrieval { offsets: failed });
    }

    Ok(items)
}
