//! System-wide constants for the TRS engine.
//!
//! Page size defaults and the fixed parts of the location layout derived from
//! a TRS URI.

// =============================================================================
// Page Sizes
// =============================================================================

/// Default number of members per base page.
pub const DEFAULT_BASE_PAGE_SIZE: usize = 100;

/// Default number of change events per change log page.
pub const DEFAULT_CHANGELOG_PAGE_SIZE: usize = 50;

// =============================================================================
// Location Layout
// =============================================================================

/// Default TRS URI used when no configuration is supplied.
pub const DEFAULT_TRS_URI: &str = "http://localhost:8080/trs/";

/// Path segment of the base resource, relative to the TRS URI.
pub const BASE_SEGMENT: &str = "base";

/// Path segment of the change log resource, relative to the TRS URI.
pub const CHANGELOG_SEGMENT: &str = "changelog";

/// The NIL sentinel (`rdf:nil`) used in place of an absent page link.
pub const NIL_URI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_defaults() {
        assert!(DEFAULT_BASE_PAGE_SIZE > 0);
        assert!(DEFAULT_CHANGELOG_PAGE_SIZE > 0);
    }

    #[test]
    fn test_segments_are_single_path_segments() {
        assert!(!BASE_SEGMENT.contains('/'));
        assert!(!CHANGELOG_SEGMENT.contains('/'));
        assert_ne!(BASE_SEGMENT, CHANGELOG_SEGMENT);
    }
}
