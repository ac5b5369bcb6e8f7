//! The crawl frontier
//!
//! A bounded FIFO of URLs waiting to be fetched, the set of every URL ever
//! accepted, the count of tasks currently held by workers and the global page
//! counter. All of it is only reachable through the atomic operations below;
//! the lock is held for in-memory bookkeeping only, never across I/O.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;
use url::Url;

/// Outcome of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Queued for fetching
    Accepted,
    /// The queue was at capacity; the URL is lost for this crawl
    RejectedFull,
    /// The URL was seen before
    RejectedDuplicate,
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<Url>,
    visited: HashSet<String>,
    in_flight: usize,
    closed: bool,
}

impl FrontierState {
    fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.in_flight == 0
    }
}

/// Shared work queue with dedup, drain detection and the page cap
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    capacity: usize,
    page_cap: usize,
    pages: AtomicUsize,
    available: Notify,
    drained: Notify,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of queued (not yet taken) URLs
    /// * `page_cap` - Maximum number of page slots handed out
    pub fn new(capacity: usize, page_cap: usize) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            capacity,
            page_cap,
            pages: AtomicUsize::new(0),
            available: Notify::new(),
            drained: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Offers a URL for fetching
    ///
    /// The duplicate check and the insertion into the visited set happen under
    /// one lock, so concurrent offers of the same URL accept it at most once.
    /// A URL rejected because the queue is full still counts as visited. Once
    /// the frontier is closed every offer is rejected as a duplicate.
    pub fn offer(&self, url: Url) -> Offer {
        let mut state = self.lock();

        if state.closed || !state.visited.insert(url.as_str().to_string()) {
            return Offer::RejectedDuplicate;
        }

        if state.queue.len() >= self.capacity {
            return Offer::RejectedFull;
        }

        state.queue.push_back(url);
        drop(state);

        self.available.notify_one();
        Offer::Accepted
    }

    /// Waits for the next URL
    ///
    /// Returns `None` once the frontier has been closed. A returned URL counts
    /// as in flight until [`Frontier::task_done`] is called for it.
    pub async fn take(&self) -> Option<Url> {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed {
                    return None;
                }
                if let Some(url) = state.queue.pop_front() {
                    state.in_flight += 1;
                    let more = !state.queue.is_empty();
                    drop(state);

                    if more {
                        self.available.notify_one();
                    }
                    return Some(url);
                }
            }

            notified.await;
        }
    }

    /// Marks a taken URL as fully handled
    ///
    /// Must be called after every link discovered on the page was offered,
    /// otherwise the crawl could be seen as drained while new work is about
    /// to arrive.
    pub fn task_done(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        let drained = state.is_drained();
        drop(state);

        if drained {
            self.drained.notify_waiters();
        }
    }

    /// Waits until the queue is empty and no worker holds a task
    pub async fn wait_drained(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let state = self.lock();
                if state.closed || state.is_drained() {
                    return;
                }
            }

            notified.await;
        }
    }

    /// Stops the frontier; every pending and future `take` returns `None`
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_waiters();
        self.drained.notify_waiters();
    }

    /// Claims the next page slot
    ///
    /// The check against the cap and the increment are one atomic step.
    ///
    /// # Returns
    ///
    /// * `Some(index)` - The 1-based sequence number of the claimed page
    /// * `None` - The page cap has been reached
    pub fn try_claim_page_slot(&self) -> Option<usize> {
        self.pages
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                (count < self.page_cap).then_some(count + 1)
            })
            .ok()
            .map(|previous| previous + 1)
    }

    /// Number of page slots claimed so far
    pub fn page_count(&self) -> usize {
        self.pages.load(Ordering::SeqCst)
    }

    pub fn page_cap(&self) -> usize {
        self.page_cap
    }

    /// Number of URLs waiting to be taken
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Number of distinct URLs ever offered
    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }
}
