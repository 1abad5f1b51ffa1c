//! Engine error types.
//!
//! Every failure the engine reports is local and deterministic: a lookup for a
//! page that does not exist, or a configuration that cannot produce a valid
//! engine. Nothing here is retried internally.

use std::fmt;
use thiserror::Error;

use crate::types::Feed;

/// Error codes for categorizing errors.
///
/// These codes can be used for programmatic error handling (for example when
/// an endpoint layer maps errors to response statuses) and are stable across
/// versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // General errors (0x0000 - 0x00FF)
    /// Internal error (bug).
    Internal = 0x0001,

    // I/O errors (0x0100 - 0x01FF)
    /// General I/O error.
    Io = 0x0100,

    // Lookup errors (0x0200 - 0x02FF)
    /// Requested page does not exist.
    PageNotFound = 0x0200,

    // Configuration errors (0x0300 - 0x03FF)
    /// Configuration values are out of range or unusable.
    InvalidConfiguration = 0x0300,
    /// Configuration document could not be parsed or rendered.
    ConfigParse = 0x0301,
}

impl ErrorCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match (*self as u16) >> 8 {
            0x00 => "General",
            0x01 => "I/O",
            0x02 => "Lookup",
            0x03 => "Configuration",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The main error type for the TRS engine.
///
/// # Example
///
/// ```rust
/// use trs_common::error::{TrsError, TrsResult};
/// use trs_common::types::Feed;
///
/// fn lookup(index: u64, page_count: u64) -> TrsResult<()> {
///     Err(TrsError::page_not_found(Feed::ChangeLog, index, page_count))
/// }
///
/// assert!(lookup(3, 2).unwrap_err().is_not_found());
/// ```
#[derive(Debug, Error)]
pub enum TrsError {
    /// Internal error - this indicates a bug.
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },

    /// I/O error while reading configuration or seed files.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Requested page index is outside `[1, page_count]`.
    #[error("{feed} page {index} not found (page count is {page_count})")]
    PageNotFound {
        /// The feed that was queried.
        feed: Feed,
        /// The requested 1-based index.
        index: u64,
        /// Number of pages in the feed at the time of the lookup.
        page_count: u64,
    },

    /// Configuration cannot produce a valid engine.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// Configuration document could not be parsed or rendered.
    #[error("failed to parse configuration: {reason}")]
    ConfigParse {
        /// Parser message.
        reason: String,
    },
}

impl TrsError {
    /// Returns the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Internal { .. } => ErrorCode::Internal,
            Self::Io { .. } => ErrorCode::Io,
            Self::PageNotFound { .. } => ErrorCode::PageNotFound,
            Self::InvalidConfiguration { .. } => ErrorCode::InvalidConfiguration,
            Self::ConfigParse { .. } => ErrorCode::ConfigParse,
        }
    }

    /// Returns true if this error reports a missing page.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::PageNotFound { .. })
    }

    /// Returns true if this error was raised while building an engine.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration { .. } | Self::ConfigParse { .. }
        )
    }

    /// Creates a page not found error.
    #[must_use]
    pub const fn page_not_found(feed: Feed, index: u64, page_count: u64) -> Self {
        Self::PageNotFound {
            feed,
            index,
            page_count,
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Creates a configuration parse error.
    #[must_use]
    pub fn config_parse(reason: impl Into<String>) -> Self {
        Self::ConfigParse {
            reason: reason.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = TrsError::page_not_found(Feed::Base, 3, 2);
        assert_eq!(err.code(), ErrorCode::PageNotFound);
        assert_eq!(err.code().category(), "Lookup");

        let err = TrsError::invalid_configuration("page size must be positive");
        assert_eq!(err.code(), ErrorCode::InvalidConfiguration);
        assert_eq!(err.code().category(), "Configuration");
    }

    #[test]
    fn test_error_display() {
        let err = TrsError::page_not_found(Feed::ChangeLog, 0, 4);
        assert_eq!(err.to_string(), "changelog page 0 not found (page count is 4)");

        let err = TrsError::page_not_found(Feed::Base, 9, 1);
        assert_eq!(err.to_string(), "base page 9 not found (page count is 1)");
    }

    #[test]
    fn test_classification() {
        assert!(TrsError::page_not_found(Feed::Base, 0, 1).is_not_found());
        assert!(!TrsError::page_not_found(Feed::Base, 0, 1).is_configuration());
        assert!(TrsError::invalid_configuration("x").is_configuration());
        assert!(TrsError::config_parse("x").is_configuration());
        assert!(!TrsError::internal("x").is_not_found());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TrsError = io_err.into();
        assert_eq!(err.code(), ErrorCode::Io);
        assert_eq!(err.code().as_u16(), 0x0100);
    }
}
