//! Generic paginator over an append stream.
//!
//! The paginator turns a stream of appended items into a chain of
//! fixed-capacity pages with stable 1-based indices and locations
//! (`{root}/{index}`).
//!
//! # Page Chain
//!
//! Pages live in two places:
//!
//! ```text
//!   closed: [ page 1 | page 2 | ... | page n-1 ]   append-only, never mutated
//!   open:   page n                                  the only mutable slot
//! ```
//!
//! When the open page is full, the next append closes it, moves it to the end
//! of the closed list and opens page `n + 1`. All of this happens under one
//! write lock, so readers see either the chain before the append or after it.
//!
//! Readers receive `Arc<Page<T>>` snapshots. A closed page is shared as is.
//! The open page is owned by the chain and snapshotted on read; the snapshot
//! shares the page's full chunks and copies only its short tail. Appends and
//! page closes never copy items already stored.

use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use url::Url;

use trs_common::{Feed, TrsError, TrsResult};

use crate::link::page_location;
use crate::page::Page;

/// Paginator statistics.
#[derive(Debug, Default)]
pub struct PaginatorStats {
    /// Total items appended.
    pub items_appended: AtomicU64,
    /// Number of pages opened.
    pub pages_opened: AtomicU64,
    /// Number of pages closed.
    pub pages_closed: AtomicU64,
}

/// Where an appended item landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendReceipt {
    /// Index of the page that received the item.
    pub page_index: u64,
    /// Zero-based position of the item within that page.
    pub position: usize,
    /// Whether the append opened a new page.
    pub opened_page: bool,
}

struct PageChain<T> {
    closed: Vec<Arc<Page<T>>>,
    open: Option<Page<T>>,
}

impl<T> PageChain<T> {
    fn new() -> Self {
        Self {
            closed: Vec::new(),
            open: None,
        }
    }

    fn page_count(&self) -> u64 {
        self.closed.len() as u64 + u64::from(self.open.is_some())
    }
}

impl<T: Clone> PageChain<T> {
    fn snapshot(&self, index: u64) -> Option<Arc<Page<T>>> {
        let slot = usize::try_from(index.checked_sub(1)?).ok()?;
        match slot.cmp(&self.closed.len()) {
            std::cmp::Ordering::Less => self.closed.get(slot).cloned(),
            std::cmp::Ordering::Equal => self.open.as_ref().map(|page| Arc::new(page.clone())),
            std::cmp::Ordering::Greater => None,
        }
    }

    fn last(&self) -> Option<Arc<Page<T>>> {
        match &self.open {
            Some(page) => Some(Arc::new(page.clone())),
            None => self.closed.last().cloned(),
        }
    }
}

/// An ordered chain of fixed-capacity pages.
pub struct Paginator<T> {
    /// Feed this paginator backs, used in errors and logs.
    feed: Feed,
    /// Location under which page locations are derived.
    root: Url,
    /// Maximum items per page.
    capacity: usize,
    /// The page chain.
    chain: RwLock<PageChain<T>>,
    /// Paginator statistics.
    stats: PaginatorStats,
}

impl<T> Paginator<T> {
    /// Creates an empty paginator with no pages.
    ///
    /// Fails with `InvalidConfiguration` if `capacity` is zero.
    pub fn new(feed: Feed, root: Url, capacity: usize) -> TrsResult<Self> {
        if capacity == 0 {
            return Err(TrsError::invalid_configuration(format!(
                "{feed} page size must be positive"
            )));
        }

        Ok(Self {
            feed,
            root,
            capacity,
            chain: RwLock::new(PageChain::new()),
            stats: PaginatorStats::default(),
        })
    }

    /// Returns the feed this paginator backs.
    pub fn feed(&self) -> Feed {
        self.feed
    }

    /// Returns the root location pages are derived from.
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Returns the page capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of pages created so far.
    pub fn page_count(&self) -> u64 {
        self.chain.read().page_count()
    }

    /// Returns the total number of items appended.
    pub fn item_count(&self) -> u64 {
        self.stats.items_appended.load(Ordering::Acquire)
    }

    /// Returns the location of page `index`, whether or not it exists yet.
    pub fn location(&self, index: u64) -> Url {
        page_location(&self.root, index)
    }

    /// Returns paginator statistics.
    pub fn stats(&self) -> &PaginatorStats {
        &self.stats
    }
}

impl<T: Clone> Paginator<T> {
    /// Creates a paginator seeded from a fixed collection.
    ///
    /// The result always has at least one page: an empty collection yields a
    /// single empty page 1.
    pub fn from_items<I>(feed: Feed, root: Url, capacity: usize, items: I) -> TrsResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let paginator = Self::new(feed, root, capacity)?;
        for item in items {
            paginator.append(item);
        }

        let mut chain = paginator.chain.write();
        if chain.page_count() == 0 {
            chain.open = Some(paginator.open_page(1));
        }
        drop(chain);

        Ok(paginator)
    }

    /// Returns page `index`.
    ///
    /// Fails with `PageNotFound` if `index` is outside `[1, page_count()]`.
    pub fn page(&self, index: u64) -> TrsResult<Arc<Page<T>>> {
        let chain = self.chain.read();
        chain
            .snapshot(index)
            .ok_or_else(|| TrsError::page_not_found(self.feed, index, chain.page_count()))
    }

    /// Returns the newest page, if any.
    pub fn last_page(&self) -> Option<Arc<Page<T>>> {
        self.chain.read().last()
    }

    /// Returns a consistent snapshot of every page.
    pub fn pages(&self) -> Vec<Arc<Page<T>>> {
        let chain = self.chain.read();
        chain
            .closed
            .iter()
            .cloned()
            .chain(chain.open.as_ref().map(|page| Arc::new(page.clone())))
            .collect()
    }

    /// Appends an item, rolling to a new page if the current one is full.
    pub fn append(&self, item: T) -> AppendReceipt {
        match self.try_append_with(|_| Ok::<T, Infallible>(item)) {
            Ok(receipt) => receipt,
            Err(never) => match never {},
        }
    }

    /// Appends an item built by `make` while the chain is locked.
    ///
    /// `make` receives the index of the page the item will land on. Anything
    /// it does is serialized with every other append. If it fails, the chain
    /// is left untouched and the error is returned.
    pub fn try_append_with<E, F>(&self, make: F) -> Result<AppendReceipt, E>
    where
        F: FnOnce(u64) -> Result<T, E>,
    {
        let mut chain = self.chain.write();

        let rolls = chain.open.as_ref().map_or(true, |page| !page.has_room());
        let page_index = if rolls {
            chain.page_count() + 1
        } else {
            chain.page_count()
        };

        let item = make(page_index)?;

        let chain = &mut *chain;
        if rolls {
            if let Some(mut previous) = chain.open.take() {
                previous.close();
                self.stats.pages_closed.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "{} page {} closed with {} items",
                    self.feed,
                    previous.index(),
                    previous.len()
                );
                chain.closed.push(Arc::new(previous));
            }
        }

        let open = chain.open.get_or_insert_with(|| self.open_page(page_index));
        open.push(item);
        let position = open.len() - 1;

        self.stats.items_appended.fetch_add(1, Ordering::AcqRel);

        Ok(AppendReceipt {
            page_index,
            position,
            opened_page: rolls,
        })
    }

    /// Closes the open page, if any.
    ///
    /// After sealing every existing page is immutable; a later append opens a
    /// new page.
    pub fn seal(&self) {
        let mut chain = self.chain.write();
        if let Some(mut open) = chain.open.take() {
            open.close();
            self.stats.pages_closed.fetch_add(1, Ordering::Relaxed);
            chain.closed.push(Arc::new(open));
        }
    }

    fn open_page(&self, index: u64) -> Page<T> {
        self.stats.pages_opened.fetch_add(1, Ordering::Relaxed);
        debug!("{} page {} opened", self.feed, index);
        Page::open(index, self.location(index), self.capacity)
    }
}

impl<T> std::fmt::Debug for Paginator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("feed", &self.feed)
            .field("root", &self.root.as_str())
            .field("capacity", &self.capacity)
            .field("page_count", &self.page_count())
            .field("item_count", &self.item_count())
            .finish()
    }
}
