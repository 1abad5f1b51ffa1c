//! Immutable base snapshot.
//!
//! The base lists every resource known when the engine was built. It is
//! partitioned into pages once, sealed, and never touched again, so reads
//! need no coordination with ingestion.
//!
//! # Root Equivalence
//!
//! The base is also addressable at its canonical location (`{trs}/base`)
//! through the [`RootBaseDescriptor`]. The root always links forward to the
//! indexed location of page 1. When the whole snapshot fits in one page, the
//! root *is* page 1: it carries that page's members, and a lookup of page 1
//! returns the root. With more than one page, page 1 is returned under its own
//! indexed location and the root carries no members of its own.

use std::sync::Arc;

use tracing::info;
use url::Url;

use trs_common::{Feed, TrsResult};

use crate::link::nil;
use crate::page::{Iter, Page};
use crate::paginator::Paginator;

/// One indexed page of the base.
#[derive(Debug, Clone)]
pub struct BasePage {
    page: Arc<Page<Url>>,
    next: Url,
    cutoff_event: Url,
}

impl BasePage {
    /// Returns the 1-based page index.
    pub fn index(&self) -> u64 {
        self.page.index()
    }

    /// Returns the page location.
    pub fn location(&self) -> &Url {
        self.page.location()
    }

    /// Returns the next page's location, or NIL on the last page.
    pub fn next(&self) -> &Url {
        &self.next
    }

    /// Returns the resources listed on this page.
    pub fn members(&self) -> Iter<'_, Url> {
        self.page.iter()
    }

    /// Returns the identifier of the last change event reflected in the base.
    pub fn cutoff_event(&self) -> &Url {
        &self.cutoff_event
    }

    /// Returns the underlying page.
    pub fn page(&self) -> &Page<Url> {
        &self.page
    }
}

/// The base as seen from its canonical location.
#[derive(Debug, Clone)]
pub struct RootBaseDescriptor {
    location: Url,
    next: Url,
    cutoff_event: Url,
    members: Option<Arc<Page<Url>>>,
}

impl RootBaseDescriptor {
    /// Returns the canonical base location.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Returns the indexed location of page 1.
    pub fn next(&self) -> &Url {
        &self.next
    }

    /// Returns the members carried by the root.
    ///
    /// Non-empty only when the whole base fits in one page.
    pub fn members(&self) -> Iter<'_, Url> {
        match &self.members {
            Some(page) => page.iter(),
            None => Iter::empty(),
        }
    }

    /// Returns the identifier of the last change event reflected in the base.
    pub fn cutoff_event(&self) -> &Url {
        &self.cutoff_event
    }

    /// Returns true if the root stands in for the only base page.
    pub fn is_single_page(&self) -> bool {
        self.members.is_some()
    }
}

/// Result of a base lookup: either the root or an indexed page.
#[derive(Debug, Clone)]
pub enum BaseResource {
    /// The root descriptor, returned for page 1 of a single-page base.
    Root(RootBaseDescriptor),
    /// An indexed page.
    Page(BasePage),
}

impl BaseResource {
    /// Returns the resource location.
    pub fn location(&self) -> &Url {
        match self {
            Self::Root(root) => root.location(),
            Self::Page(page) => page.location(),
        }
    }

    /// Returns the forward link.
    pub fn next(&self) -> &Url {
        match self {
            Self::Root(root) => root.next(),
            Self::Page(page) => page.next(),
        }
    }

    /// Returns the listed members.
    pub fn members(&self) -> Iter<'_, Url> {
        match self {
            Self::Root(root) => root.members(),
            Self::Page(page) => page.members(),
        }
    }

    /// Returns the identifier of the last change event reflected in the base.
    pub fn cutoff_event(&self) -> &Url {
        match self {
            Self::Root(root) => root.cutoff_event(),
            Self::Page(page) => page.cutoff_event(),
        }
    }

    /// Returns true if this is the root descriptor.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root(_))
    }

    /// Returns the indexed page, if this is one.
    pub fn as_page(&self) -> Option<&BasePage> {
        match self {
            Self::Page(page) => Some(page),
            Self::Root(_) => None,
        }
    }
}

/// The paged, immutable base snapshot.
pub struct BaseSnapshotStore {
    /// Canonical base location.
    base_uri: Url,
    /// Sealed pages.
    paginator: Paginator<Url>,
    /// Last change event reflected in the base.
    cutoff_event: Url,
}

impl BaseSnapshotStore {
    /// Builds the base from the initial resource collection.
    ///
    /// Every entry of the collection is listed, repeats included, so the base
    /// has `max(1, ceil(n / page_size))` pages. Members keep their input order,
    /// but consumers must not rely on member order within a page.
    pub fn new<I>(base_uri: Url, page_size: usize, members: I) -> TrsResult<Self>
    where
        I: IntoIterator<Item = Url>,
    {
        let paginator = Paginator::from_items(Feed::Base, base_uri.clone(), page_size, members)?;
        paginator.seal();

        info!(
            "Built base at {} with {} members in {} pages",
            base_uri,
            paginator.item_count(),
            paginator.page_count()
        );

        Ok(Self {
            base_uri,
            paginator,
            cutoff_event: nil().clone(),
        })
    }

    /// Returns the canonical base location.
    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    /// Returns the number of base pages (always at least one).
    pub fn page_count(&self) -> u64 {
        self.paginator.page_count()
    }

    /// Returns the number of listed members.
    pub fn member_count(&self) -> u64 {
        self.paginator.item_count()
    }

    /// Returns the page size.
    pub fn page_size(&self) -> usize {
        self.paginator.capacity()
    }

    /// Returns the identifier of the last change event reflected in the base.
    pub fn cutoff_event(&self) -> &Url {
        &self.cutoff_event
    }

    /// Returns indexed page `index`.
    ///
    /// Fails with `PageNotFound` if `index` is outside `[1, page_count()]`.
    pub fn page(&self, index: u64) -> TrsResult<BasePage> {
        let page = self.paginator.page(index)?;
        let next = if index < self.page_count() {
            self.paginator.location(index + 1)
        } else {
            nil().clone()
        };

        Ok(BasePage {
            page,
            next,
            cutoff_event: self.cutoff_event.clone(),
        })
    }

    /// Returns the root descriptor.
    pub fn root_descriptor(&self) -> RootBaseDescriptor {
        let members = if self.page_count() == 1 {
            self.paginator.page(1).ok()
        } else {
            None
        };

        RootBaseDescriptor {
            location: self.base_uri.clone(),
            next: self.paginator.location(1),
            cutoff_event: self.cutoff_event.clone(),
            members,
        }
    }

    /// Looks up page `index`, answering page 1 of a single-page base with the
    /// root descriptor.
    pub fn resource(&self, index: u64) -> TrsResult<BaseResource> {
        if index == 1 && self.page_count() == 1 {
            return Ok(BaseResource::Root(self.root_descriptor()));
        }
        self.page(index).map(BaseResource::Page)
    }
}

impl std::fmt::Debug for BaseSnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseSnapshotStore")
            .field("base_uri", &self.base_uri.as_str())
            .field("page_count", &self.page_count())
            .field("member_count", &self.member_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::is_nil;

    fn base_uri() -> Url {
        Url::parse("http://host/trs/base").unwrap()
    }

    fn resources(n: usize) -> Vec<Url> {
        (0..n)
            .map(|i| Url::parse(&format!("http://host/r/{i}")).unwrap())
            .collect()
    }

    fn store(page_size: usize, n: usize) -> BaseSnapshotStore {
        BaseSnapshotStore::new(base_uri(), page_size, resources(n)).unwrap()
    }

    #[test]
    fn test_empty_base() {
        let store = store(5, 0);
        assert_eq!(store.page_count(), 1);
        assert_eq!(store.member_count(), 0);

        let page = store.page(1).unwrap();
        assert!(page.members().is_empty());
        assert!(page.page().is_closed());
        assert!(is_nil(page.next()));
    }

    #[test]
    fn test_paged_base() {
        let store = store(5, 7);
        assert_eq!(store.page_count(), 2);

        let first = store.page(1).unwrap();
        let second = store.page(2).unwrap();
        assert_eq!(first.members().len(), 5);
        assert_eq!(second.members().len(), 2);
        assert_eq!(first.location().as_str(), "http://host/trs/base/1");
        assert_eq!(second.location().as_str(), "http://host/trs/base/2");
    }

    #[test]
    fn test_forward_links() {
        let store = store(2, 5);
        assert_eq!(store.page_count(), 3);

        for index in 1..store.page_count() {
            let page = store.page(index).unwrap();
            let next = store.page(index + 1).unwrap();
            assert_eq!(page.next(), next.location());
        }
        assert!(is_nil(store.page(3).unwrap().next()));
    }

    #[test]
    fn test_every_page_is_closed() {
        let store = store(3, 10);
        for index in 1..=store.page_count() {
            assert!(store.page(index).unwrap().page().is_closed());
        }
    }

    #[test]
    fn test_repeated_entries_are_kept() {
        let mut members = resources(3);
        members.extend(resources(3));
        let store = BaseSnapshotStore::new(base_uri(), 5, members.clone()).unwrap();

        assert_eq!(store.member_count(), 6);
        assert_eq!(store.page_count(), 2);
        let listed: Vec<Url> = (1..=2)
            .flat_map(|index| store.page(index).unwrap().members().cloned().collect::<Vec<_>>())
            .collect();
        assert_eq!(listed, members);
    }

    #[test]
    fn test_huge_page_size() {
        let store = BaseSnapshotStore::new(base_uri(), usize::MAX, resources(3)).unwrap();
        assert_eq!(store.page_count(), 1);
        assert_eq!(store.member_count(), 3);
        assert_eq!(store.page_size(), usize::MAX);
        assert!(store.resource(1).unwrap().is_root());
        assert_eq!(store.root_descriptor().members().len(), 3);
    }

    #[test]
    fn test_page_out_of_range() {
        let store = store(5, 7);
        assert!(store.page(0).unwrap_err().is_not_found());
        assert!(store.page(3).unwrap_err().is_not_found());
        assert!(store.resource(3).unwrap_err().is_not_found());
    }

    #[test]
    fn test_root_single_page() {
        let store = store(5, 2);
        let root = store.root_descriptor();

        assert_eq!(root.location().as_str(), "http://host/trs/base");
        assert_eq!(root.next().as_str(), "http://host/trs/base/1");
        assert_eq!(root.members().len(), 2);
        assert!(root.is_single_page());
        assert!(is_nil(root.cutoff_event()));

        let resource = store.resource(1).unwrap();
        assert!(resource.is_root());
        assert_eq!(resource.location(), store.base_uri());
        assert!(resource.members().eq(store.page(1).unwrap().members()));
    }

    #[test]
    fn test_root_multi_page() {
        let store = store(5, 7);
        let root = store.root_descriptor();

        assert_eq!(root.location().as_str(), "http://host/trs/base");
        assert_eq!(root.next().as_str(), "http://host/trs/base/1");
        assert!(root.members().is_empty());
        assert!(!root.is_single_page());

        let resource = store.resource(1).unwrap();
        assert!(!resource.is_root());
        assert_eq!(resource.location().as_str(), "http://host/trs/base/1");
        assert_eq!(resource.next().as_str(), "http://host/trs/base/2");
        assert_eq!(resource.as_page().map(BasePage::index), Some(1));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = BaseSnapshotStore::new(base_uri(), 0, resources(1)).unwrap_err();
        assert!(err.is_configuration());
    }
}
