//! # trs-core
//!
//! In-memory pagination and ordering engine for a Tracked Resource Set.
//!
//! A Tracked Resource Set lets remote consumers synchronize a resource
//! collection in two steps: fetch the paged **base** snapshot once, then poll
//! the paged, strictly ordered **change log** to catch up incrementally. This
//! crate maintains both sequences in memory:
//!
//! - The base is built once at construction and never changes.
//! - The change log grows by one event per `on_history_data` call. Every
//!   event gets a unique, strictly increasing `Order`.
//! - Both are split into fixed-capacity pages with stable 1-based indices and
//!   locations derived from the TRS URI.
//!
//! # Architecture
//!
//! ```text
//!                     +-------------+
//!   producers ------> |  TrsEngine  | <------ readers
//!                     +------+------+
//!                            |
//!            +---------------+----------------+
//!            |                                |
//!   +--------v----------+          +----------v--------+
//!   | BaseSnapshotStore |          |  ChangeLogStore   |
//!   |  (immutable)      |          |  + OrderAllocator |
//!   +--------+----------+          +----------+--------+
//!            |                                |
//!   +--------v----------+          +----------v--------+
//!   | Paginator<Url>    |          | Paginator<Event>  |
//!   +-------------------+          +-------------------+
//! ```
//!
//! ## Page Links
//!
//! Base pages link forward (`next`), change log pages link backward
//! (`previous`). The end of either chain is marked with the [`nil`] sentinel,
//! never with an absent value.
//!
//! ```text
//! base:      /base/1 --next--> /base/2 --next--> NIL
//! changelog: NIL <--previous-- /changelog/1 <--previous-- /changelog/2
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Change events and the history records they are stamped from.
pub mod event;

/// Location layout and the NIL sentinel.
pub mod link;

/// Order allocation for change events.
pub mod order;

/// Fixed-capacity pages.
pub mod page;

/// Generic paginator over an append stream.
pub mod paginator;

/// Immutable base snapshot.
pub mod base;

/// Append-only change log.
pub mod changelog;

/// Engine facade.
pub mod engine;

// Re-exports for convenience
pub use base::{BasePage, BaseResource, BaseSnapshotStore, RootBaseDescriptor};
pub use changelog::{ChangeLogPage, ChangeLogStore};
pub use engine::{TrackedResourceSet, TrsEngine};
pub use event::{ChangeEvent, ChangeKind, HistoryData, UnknownChangeKind};
pub use link::{is_nil, nil, ResourceLayout};
pub use order::OrderAllocator;
pub use page::Page;
pub use paginator::{AppendReceipt, Paginator, PaginatorStats};
pub use trs_common::{EngineConfig, ErrorCode, Feed, Order, Timestamp, TrsError, TrsResult};
