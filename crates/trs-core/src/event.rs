//! Change events and the history records they are stamped from.
//!
//! Producers describe a detected mutation with a [`HistoryData`] record. The
//! change log turns it into a [`ChangeEvent`] by assigning an order and an
//! identifier; nothing else about the record changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use trs_common::{Order, Timestamp};

/// The kind of mutation a change event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// The resource was created.
    Creation,
    /// The resource was modified.
    Modification,
    /// The resource was deleted.
    Deletion,
}

impl ChangeKind {
    /// Returns the short verb form (`create`, `modify`, `delete`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Creation => "create",
            Self::Modification => "modify",
            Self::Deletion => "delete",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown change kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown change kind '{0}' (expected create, modify or delete)")]
pub struct UnknownChangeKind(pub String);

impl FromStr for ChangeKind {
    type Err = UnknownChangeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" | "creation" | "created" => Ok(Self::Creation),
            "modify" | "modification" | "modified" | "update" => Ok(Self::Modification),
            "delete" | "deletion" | "deleted" => Ok(Self::Deletion),
            _ => Err(UnknownChangeKind(s.to_string())),
        }
    }
}

/// A detected resource mutation, as reported by a producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryData {
    /// The resource that changed.
    pub resource: Url,
    /// What happened to it.
    pub kind: ChangeKind,
    /// When the change was observed.
    pub timestamp: Timestamp,
}

impl HistoryData {
    /// Creates a history record observed at `timestamp`.
    pub fn new(resource: Url, kind: ChangeKind, timestamp: Timestamp) -> Self {
        Self {
            resource,
            kind,
            timestamp,
        }
    }

    /// Creates a history record observed now.
    pub fn now(resource: Url, kind: ChangeKind) -> Self {
        Self::new(resource, kind, Timestamp::now())
    }

    /// Creates a creation record observed now.
    pub fn created(resource: Url) -> Self {
        Self::now(resource, ChangeKind::Creation)
    }

    /// Creates a modification record observed now.
    pub fn modified(resource: Url) -> Self {
        Self::now(resource, ChangeKind::Modification)
    }

    /// Creates a deletion record observed now.
    pub fn deleted(resource: Url) -> Self {
        Self::now(resource, ChangeKind::Deletion)
    }
}

/// A change log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    id: Url,
    resource: Url,
    kind: ChangeKind,
    order: Order,
    timestamp: Timestamp,
}

impl ChangeEvent {
    /// Stamps a history record with its order and identifier.
    pub(crate) fn stamp(data: HistoryData, order: Order, id: Url) -> Self {
        Self {
            id,
            resource: data.resource,
            kind: data.kind,
            order,
            timestamp: data.timestamp,
        }
    }

    /// Returns the event identifier.
    pub fn id(&self) -> &Url {
        &self.id
    }

    /// Returns the resource that changed.
    pub fn resource(&self) -> &Url {
        &self.resource
    }

    /// Returns the kind of change.
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Returns the event order.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Returns when the change was observed.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
