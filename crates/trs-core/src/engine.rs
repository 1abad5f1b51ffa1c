//! Engine facade.
//!
//! [`TrsEngine`] composes the immutable base and the growing change log behind
//! one thread-safe handle. It holds no lock of its own: the base needs none,
//! and the change log serializes its writers internally. Share it across
//! threads with `Arc<TrsEngine>`.

use tracing::{error, info};
use url::Url;

use trs_common::{EngineConfig, Order, TrsResult};

use crate::base::{BaseResource, BaseSnapshotStore, RootBaseDescriptor};
use crate::changelog::{ChangeLogPage, ChangeLogStore};
use crate::event::HistoryData;
use crate::link::{nil, ResourceLayout};
use crate::order::OrderAllocator;
use crate::paginator::PaginatorStats;

/// Entry point of a Tracked Resource Set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedResourceSet {
    /// Location of the tracked resource set.
    pub location: Url,
    /// Canonical base location.
    pub base: Url,
    /// Location of the newest change log page, or NIL while the log is empty.
    pub change_log: Url,
}

/// In-memory Tracked Resource Set engine.
pub struct TrsEngine {
    config: EngineConfig,
    layout: ResourceLayout,
    base: BaseSnapshotStore,
    changelog: ChangeLogStore,
}

impl TrsEngine {
    /// Creates an engine from `config`, seeding the base with `initial`.
    pub fn new<I>(config: EngineConfig, initial: I) -> TrsResult<Self>
    where
        I: IntoIterator<Item = Url>,
    {
        Self::with_allocator(config, initial, OrderAllocator::new())
    }

    /// Creates an engine from positional parameters.
    pub fn construct<I>(
        base_page_size: usize,
        changelog_page_size: usize,
        trs_uri: Url,
        initial: I,
    ) -> TrsResult<Self>
    where
        I: IntoIterator<Item = Url>,
    {
        let config = EngineConfig::default()
            .with_trs_uri(trs_uri)
            .with_base_page_size(base_page_size)
            .with_changelog_page_size(changelog_page_size);
        Self::new(config, initial)
    }

    /// Creates an engine whose change log draws orders from `allocator`.
    pub fn with_allocator<I>(
        config: EngineConfig,
        initial: I,
        allocator: OrderAllocator,
    ) -> TrsResult<Self>
    where
        I: IntoIterator<Item = Url>,
    {
        config.validate()?;

        let layout = ResourceLayout::new(&config.trs_uri)?;
        let base = BaseSnapshotStore::new(
            layout.base_uri().clone(),
            config.base_page_size,
            initial,
        )?;
        let changelog =
            ChangeLogStore::with_allocator(layout.clone(), config.changelog_page_size, allocator)?;

        info!(
            "TRS engine ready at {} (base: {} members in {} pages of {}, change log pages of {})",
            layout.trs_uri(),
            base.member_count(),
            base.page_count(),
            config.base_page_size,
            config.changelog_page_size
        );

        Ok(Self {
            config,
            layout,
            base,
            changelog,
        })
    }

    /// Returns the configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the location layout.
    pub fn layout(&self) -> &ResourceLayout {
        &self.layout
    }

    // =========================================================================
    // Base
    // =========================================================================

    /// Returns the number of base pages (always at least one).
    pub fn base_page_count(&self) -> u64 {
        self.base.page_count()
    }

    /// Returns base page `index`.
    ///
    /// With a single base page, index 1 answers with the root descriptor.
    pub fn get_base_resource(&self, index: u64) -> TrsResult<BaseResource> {
        self.base.resource(index)
    }

    /// Returns the base as seen from its canonical location.
    pub fn root_base_descriptor(&self) -> RootBaseDescriptor {
        self.base.root_descriptor()
    }

    /// Returns the base store.
    pub fn base(&self) -> &BaseSnapshotStore {
        &self.base
    }

    // =========================================================================
    // Change log
    // =========================================================================

    /// Records a detected change.
    ///
    /// Never blocks on readers for longer than one append and never fails
    /// towards the producer; a change that cannot be recorded is logged.
    pub fn on_history_data(&self, data: HistoryData) {
        if let Err(e) = self.ingest(data) {
            error!("Dropped change event: {}", e);
        }
    }

    /// Records a detected change and returns the order it was assigned.
    pub fn ingest(&self, data: HistoryData) -> TrsResult<Order> {
        self.changelog.ingest(data)
    }

    /// Returns the number of change log pages, 0 before the first change.
    pub fn changelog_page_count(&self) -> u64 {
        self.changelog.page_count()
    }

    /// Returns change log page `index`.
    pub fn get_change_log(&self, index: u64) -> TrsResult<ChangeLogPage> {
        self.changelog.page(index)
    }

    /// Returns the newest change log page, if any.
    pub fn latest_change_log(&self) -> Option<ChangeLogPage> {
        self.changelog.latest_page()
    }

    /// Returns the number of change events recorded.
    pub fn event_count(&self) -> u64 {
        self.changelog.event_count()
    }

    /// Returns the highest order assigned so far.
    pub fn latest_order(&self) -> Option<Order> {
        self.changelog.latest_order()
    }

    /// Returns change log paginator statistics.
    pub fn changelog_stats(&self) -> &PaginatorStats {
        self.changelog.stats()
    }

    /// Returns the tracked resource set entry point.
    pub fn tracked_resource_set(&self) -> TrackedResourceSet {
        let change_log = self
            .changelog
            .latest_page()
            .map_or_else(|| nil().clone(), |page| page.location().clone());

        TrackedResourceSet {
            location: self.layout.trs_uri().clone(),
            base: self.layout.base_uri().clone(),
            change_log,
        }
    }
}

impl std::fmt::Debug for TrsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrsEngine")
            .field("trs_uri", &self.layout.trs_uri().as_str())
            .field("base", &self.base)
            .field("changelog", &self.changelog)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ChangeKind;
    use crate::link::is_nil;
    use std::sync::Arc;
    use std::thread;

    fn trs_uri() -> Url {
        Url::parse("http://host/trs/").unwrap()
    }

    fn resources(n: usize) -> Vec<Url> {
        (0..n)
            .map(|i| Url::parse(&format!("http://host/r/{i}")).unwrap())
            .collect()
    }

    fn engine(n: usize) -> TrsEngine {
        TrsEngine::construct(5, 5, trs_uri(), resources(n)).unwrap()
    }

    #[test]
    fn test_empty_construction() {
        let engine = engine(0);

        assert_eq!(engine.base_page_count(), 1);
        assert_eq!(engine.changelog_page_count(), 0);

        let base = engine.get_base_resource(1).unwrap();
        assert!(base.is_root());
        assert!(base.members().is_empty());
        assert_eq!(base.location().as_str(), "http://host/trs/base");
        assert_eq!(base.next().as_str(), "http://host/trs/base/1");
    }

    #[test]
    fn test_construct_matches_new() {
        let config = EngineConfig::new("http://host/trs/")
            .unwrap()
            .with_base_page_size(5)
            .with_changelog_page_size(5);
        let engine = TrsEngine::new(config.clone(), resources(3)).unwrap();

        assert_eq!(engine.config(), &config);
        assert_eq!(engine.config(), self::engine(3).config());
    }

    #[test]
    fn test_invalid_configuration() {
        let err = TrsEngine::construct(0, 5, trs_uri(), resources(1)).unwrap_err();
        assert!(err.is_configuration());

        let err = TrsEngine::construct(5, 0, trs_uri(), resources(1)).unwrap_err();
        assert!(err.is_configuration());

        let err = TrsEngine::construct(5, 5, nil().clone(), resources(1)).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_multi_page_base() {
        let engine = engine(7);
        assert_eq!(engine.base_page_count(), 2);

        let first = engine.get_base_resource(1).unwrap();
        assert!(!first.is_root());
        assert_eq!(first.members().len(), 5);
        assert_eq!(first.location().as_str(), "http://host/trs/base/1");

        let second = engine.get_base_resource(2).unwrap();
        assert_eq!(second.members().len(), 2);
        assert!(is_nil(second.next()));

        let root = engine.root_base_descriptor();
        assert!(root.members().is_empty());
        assert_eq!(root.next(), first.location());
    }

    #[test]
    fn test_base_lookup_out_of_range() {
        let engine = engine(7);
        assert!(engine.get_base_resource(0).unwrap_err().is_not_found());
        assert!(engine.get_base_resource(3).unwrap_err().is_not_found());
    }

    #[test]
    fn test_history_data_builds_log() {
        let engine = engine(0);
        for r in resources(7) {
            engine.on_history_data(HistoryData::created(r));
        }

        assert_eq!(engine.changelog_page_count(), 2);
        assert_eq!(engine.event_count(), 7);
        assert_eq!(engine.latest_order(), Some(Order::new(7)));

        let first = engine.get_change_log(1).unwrap();
        let second = engine.get_change_log(2).unwrap();
        assert_eq!(first.changes().len(), 5);
        assert_eq!(second.changes().len(), 2);
        assert!(is_nil(first.previous()));
        assert_eq!(second.previous(), first.location());
        assert!(engine.get_change_log(3).unwrap_err().is_not_found());
    }

    #[test]
    fn test_base_unaffected_by_ingestion() {
        let engine = engine(3);
        engine.on_history_data(HistoryData::deleted(resources(1).remove(0)));

        assert_eq!(engine.base_page_count(), 1);
        assert_eq!(engine.get_base_resource(1).unwrap().members().len(), 3);
    }

    #[test]
    fn test_tracked_resource_set() {
        let engine = engine(0);

        let trs = engine.tracked_resource_set();
        assert_eq!(trs.location.as_str(), "http://host/trs/");
        assert_eq!(trs.base.as_str(), "http://host/trs/base");
        assert!(is_nil(&trs.change_log));

        for r in resources(6) {
            engine.on_history_data(HistoryData::now(r, ChangeKind::Modification));
        }
        assert_eq!(
            engine.tracked_resource_set().change_log.as_str(),
            "http://host/trs/changelog/2"
        );
    }

    #[test]
    fn test_exhausted_orders_are_dropped() {
        let config = EngineConfig::default()
            .with_trs_uri(trs_uri())
            .with_changelog_page_size(5);
        let engine = TrsEngine::with_allocator(
            config,
            Vec::new(),
            OrderAllocator::starting_at(Order::new(u64::MAX - 1)),
        )
        .unwrap();

        engine.on_history_data(HistoryData::created(resources(1).remove(0)));
        engine.on_history_data(HistoryData::created(resources(1).remove(0)));

        assert_eq!(engine.event_count(), 1);
        assert_eq!(engine.latest_order(), Some(Order::new(u64::MAX - 1)));
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let engine = Arc::new(engine(12));

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    for r in resources(100) {
                        engine.on_history_data(HistoryData::modified(r));
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let count = engine.changelog_page_count();
                        for index in 1..=count {
                            let page = engine.get_change_log(index).unwrap();
                            assert!(page.changes().len() <= 5);
                            let orders: Vec<_> = page.changes().map(|e| e.order()).collect();
                            assert!(orders.windows(2).all(|w| w[0] < w[1]));
                        }
                        assert_eq!(engine.base_page_count(), 3);
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }

        assert_eq!(engine.event_count(), 400);
        assert_eq!(engine.changelog_page_count(), 80);
    }
}
