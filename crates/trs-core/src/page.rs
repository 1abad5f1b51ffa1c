//! Fixed-capacity pages.
//!
//! A page is either open (still accepting items) or closed. Closing is a
//! one-way transition: once a successor page exists, the page is never
//! mutated again.
//!
//! # Storage
//!
//! Items are kept in frozen chunks of [`CHUNK_LEN`] plus a short tail:
//!
//! ```text
//!   chunks: [ Arc<[T]; 64> | Arc<[T]; 64> | ... ]   shared, never mutated
//!   tail:   Vec<T> (< 64 items)                     the only growing part
//! ```
//!
//! Cloning a page bumps the chunk reference counts and copies at most
//! `CHUNK_LEN - 1` tail items, however large the page is. Storage grows as
//! items arrive, so the capacity is only an upper bound.

use std::fmt;
use std::sync::Arc;

use url::Url;

/// Number of items per frozen chunk.
pub const CHUNK_LEN: usize = 64;

/// A fixed-capacity, indexed, addressable slice of a feed.
#[derive(Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// 1-based page index.
    index: u64,
    /// Canonical location of the page.
    location: Url,
    /// Maximum number of items.
    capacity: usize,
    /// Full chunks in append order.
    chunks: Vec<Arc<[T]>>,
    /// Items after the last full chunk.
    tail: Vec<T>,
    /// Total number of items.
    len: usize,
    /// Whether the page has been closed.
    closed: bool,
}

impl<T> Page<T> {
    /// Creates an empty open page.
    pub(crate) fn open(index: u64, location: Url, capacity: usize) -> Self {
        Self {
            index,
            location,
            capacity,
            chunks: Vec::new(),
            tail: Vec::new(),
            len: 0,
            closed: false,
        }
    }

    /// Returns the 1-based page index.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns the page location.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Returns the page capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the item at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&T> {
        let chunk = position / CHUNK_LEN;
        match self.chunks.get(chunk) {
            Some(items) => items.get(position % CHUNK_LEN),
            None => self.tail.get(position.checked_sub(self.chunks.len() * CHUNK_LEN)?),
        }
    }

    /// Returns the first item, if any.
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the last item, if any.
    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|position| self.get(position))
    }

    /// Returns an iterator over the items on this page.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            page: Some(self),
            front: 0,
            back: self.len,
        }
    }

    /// Returns the number of items on this page.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the page has no room left.
    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// Returns true if the page has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns true if the page can take another item.
    pub(crate) fn has_room(&self) -> bool {
        !self.closed && !self.is_full()
    }

    /// Adds an item to an open page with room.
    pub(crate) fn push(&mut self, item: T) {
        debug_assert!(self.has_room(), "push to page {} without room", self.index);
        self.tail.push(item);
        self.len += 1;
        if self.tail.len() == CHUNK_LEN {
            let chunk: Arc<[T]> = Arc::from(std::mem::take(&mut self.tail));
            self.chunks.push(chunk);
        }
    }

    /// Closes the page.
    pub(crate) fn close(&mut self) {
        self.closed = true;
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for Page<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("index", &self.index)
            .field("location", &self.location.as_str())
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("closed", &self.closed)
            .finish()
    }
}

/// Iterator over the items of a [`Page`].
pub struct Iter<'a, T> {
    page: Option<&'a Page<T>>,
    front: usize,
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    /// Returns an iterator that yields nothing.
    pub fn empty() -> Self {
        Self {
            page: None,
            front: 0,
            back: 0,
        }
    }

    /// Returns true if no items remain.
    pub fn is_empty(&self) -> bool {
        self.front >= self.back
    }
}

impl<T> Default for Iter<'_, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            page: self.page,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }
        let item = self.page?.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back.saturating_sub(self.front);
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }
        self.back -= 1;
        self.page?.get(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> std::iter::FusedIterator for Iter<'_, T> {}
