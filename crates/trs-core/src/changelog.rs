//! Append-only change log.
//!
//! Each ingested [`HistoryData`] record becomes a [`ChangeEvent`] with a fresh
//! order. Order allocation and the page append run inside the paginator's
//! write lock, so the order of events in the log always matches the order in
//! which they were issued, across page boundaries and under concurrent
//! producers.
//!
//! Pages link backward: page 1's `previous` is NIL, page `i`'s is the location
//! of page `i - 1`. Consumers enter at the newest page and walk back until
//! they reach an event they have already seen.

use std::sync::Arc;

use tracing::trace;
use url::Url;

use trs_common::{Feed, Order, TrsError, TrsResult};

use crate::event::{ChangeEvent, HistoryData};
use crate::link::{nil, ResourceLayout};
use crate::order::OrderAllocator;
use crate::page::{Iter, Page};
use crate::paginator::{Paginator, PaginatorStats};

/// One page of the change log.
#[derive(Debug, Clone)]
pub struct ChangeLogPage {
    page: Arc<Page<ChangeEvent>>,
    previous: Url,
}

impl ChangeLogPage {
    /// Returns the 1-based page index.
    pub fn index(&self) -> u64 {
        self.page.index()
    }

    /// Returns the page location.
    pub fn location(&self) -> &Url {
        self.page.location()
    }

    /// Returns the previous page's location, or NIL on page 1.
    pub fn previous(&self) -> &Url {
        &self.previous
    }

    /// Returns the events on this page in order.
    pub fn changes(&self) -> Iter<'_, ChangeEvent> {
        self.page.iter()
    }

    /// Returns the lowest order on this page.
    pub fn first_order(&self) -> Option<Order> {
        self.page.first().map(ChangeEvent::order)
    }

    /// Returns the highest order on this page.
    pub fn last_order(&self) -> Option<Order> {
        self.page.last().map(ChangeEvent::order)
    }

    /// Returns true if the page is closed and will never change again.
    pub fn is_closed(&self) -> bool {
        self.page.is_closed()
    }

    /// Returns the underlying page.
    pub fn page(&self) -> &Page<ChangeEvent> {
        &self.page
    }
}

/// The paged change log and its order allocator.
pub struct ChangeLogStore {
    /// Locations used for pages and event identifiers.
    layout: ResourceLayout,
    /// Event pages.
    paginator: Paginator<ChangeEvent>,
    /// Order source, only called under the paginator's write lock.
    allocator: OrderAllocator,
}

impl ChangeLogStore {
    /// Creates an empty change log whose first event gets [`Order::FIRST`].
    pub fn new(layout: ResourceLayout, page_size: usize) -> TrsResult<Self> {
        Self::with_allocator(layout, page_size, OrderAllocator::new())
    }

    /// Creates an empty change log drawing orders from `allocator`.
    pub fn with_allocator(
        layout: ResourceLayout,
        page_size: usize,
        allocator: OrderAllocator,
    ) -> TrsResult<Self> {
        let paginator = Paginator::new(Feed::ChangeLog, layout.changelog_uri().clone(), page_size)?;
        Ok(Self {
            layout,
            paginator,
            allocator,
        })
    }

    /// Returns the change log location.
    pub fn changelog_uri(&self) -> &Url {
        self.layout.changelog_uri()
    }

    /// Records a change and returns the order it was assigned.
    ///
    /// Equal records ingested twice produce two events with distinct orders.
    /// Fails only if the order space is exhausted, in which case nothing is
    /// appended.
    pub fn ingest(&self, data: HistoryData) -> TrsResult<Order> {
        let mut issued = Order::FIRST;

        self.paginator.try_append_with(|page_index| {
            let order = self
                .allocator
                .next()
                .ok_or_else(|| TrsError::internal("change event order space exhausted"))?;
            issued = order;

            trace!(
                "Ingested {} of {} as order {} on change log page {}",
                data.kind,
                data.resource,
                order,
                page_index
            );

            Ok::<_, TrsError>(ChangeEvent::stamp(data, order, self.layout.event_id(order)))
        })?;

        Ok(issued)
    }

    /// Returns the number of pages, 0 before the first ingestion.
    pub fn page_count(&self) -> u64 {
        self.paginator.page_count()
    }

    /// Returns the number of events ingested.
    pub fn event_count(&self) -> u64 {
        self.paginator.item_count()
    }

    /// Returns the page size.
    pub fn page_size(&self) -> usize {
        self.paginator.capacity()
    }

    /// Returns the highest order assigned so far.
    pub fn latest_order(&self) -> Option<Order> {
        self.allocator.last_issued()
    }

    /// Returns page `index`.
    ///
    /// Fails with `PageNotFound` if `index` is outside `[1, page_count()]`.
    pub fn page(&self, index: u64) -> TrsResult<ChangeLogPage> {
        let page = self.paginator.page(index)?;
        Ok(self.view(page))
    }

    /// Returns the newest page, if any event has been ingested.
    pub fn latest_page(&self) -> Option<ChangeLogPage> {
        self.paginator.last_page().map(|page| self.view(page))
    }

    /// Returns paginator statistics.
    pub fn stats(&self) -> &PaginatorStats {
        self.paginator.stats()
    }

    fn view(&self, page: Arc<Page<ChangeEvent>>) -> ChangeLogPage {
        let previous = match page.index() {
            0 | 1 => nil().clone(),
            index => self.paginator.location(index - 1),
        };
        ChangeLogPage { page, previous }
    }
}

impl std::fmt::Debug for ChangeLogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeLogStore")
            .field("changelog_uri", &self.changelog_uri().as_str())
            .field("page_count", &self.page_count())
            .field("event_count", &self.event_count())
            .field("allocator", &self.allocator)
            .finish()
    }
}
