//! Location layout and the NIL sentinel.
//!
//! Every location the engine hands out is derived from the TRS URI:
//!
//! ```text
//! {trs}/                    tracked resource set
//! {trs}/base                base root
//! {trs}/base/{i}            base page i
//! {trs}/changelog           change log
//! {trs}/changelog/{i}       change log page i
//! {trs}/changelog#{order}   change event identifier
//! ```

use std::sync::OnceLock;

use url::Url;

use trs_common::constants::{BASE_SEGMENT, CHANGELOG_SEGMENT, NIL_URI};
use trs_common::{Feed, Order, TrsError, TrsResult};

/// Returns the NIL sentinel that terminates base and change log link chains.
pub fn nil() -> &'static Url {
    static NIL: OnceLock<Url> = OnceLock::new();
    NIL.get_or_init(|| Url::parse(NIL_URI).expect("NIL sentinel is a valid absolute URI"))
}

/// Returns true if `url` is the NIL sentinel.
pub fn is_nil(url: &Url) -> bool {
    url == nil()
}

/// Returns the location of page `index` under `root`, i.e. `{root}/{index}`.
///
/// `root` must be able to carry path segments; [`ResourceLayout`] guarantees
/// this for every root it produces.
pub fn page_location(root: &Url, index: u64) -> Url {
    let mut location = root.clone();
    location.set_query(None);
    location.set_fragment(None);
    if let Ok(mut segments) = location.path_segments_mut() {
        segments.pop_if_empty().push(&index.to_string());
    }
    location
}

/// The fixed set of locations derived from one TRS URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLayout {
    trs_uri: Url,
    base_uri: Url,
    changelog_uri: Url,
}

impl ResourceLayout {
    /// Derives the layout for `trs_uri`.
    ///
    /// A missing trailing slash is added, so `http://host/trs` and
    /// `http://host/trs/` produce the same layout.
    pub fn new(trs_uri: &Url) -> TrsResult<Self> {
        if trs_uri.cannot_be_a_base() {
            return Err(TrsError::invalid_configuration(format!(
                "TRS URI '{trs_uri}' cannot carry path segments"
            )));
        }

        let mut trs_uri = trs_uri.clone();
        if !trs_uri.path().ends_with('/') {
            let path = format!("{}/", trs_uri.path());
            trs_uri.set_path(&path);
        }

        let base_uri = join(&trs_uri, BASE_SEGMENT)?;
        let changelog_uri = join(&trs_uri, CHANGELOG_SEGMENT)?;

        Ok(Self {
            trs_uri,
            base_uri,
            changelog_uri,
        })
    }

    /// Returns the normalised TRS URI.
    pub fn trs_uri(&self) -> &Url {
        &self.trs_uri
    }

    /// Returns the canonical base location.
    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    /// Returns the change log location.
    pub fn changelog_uri(&self) -> &Url {
        &self.changelog_uri
    }

    /// Returns the root location of `feed`.
    pub fn feed_uri(&self, feed: Feed) -> &Url {
        match feed {
            Feed::Base => &self.base_uri,
            Feed::ChangeLog => &self.changelog_uri,
        }
    }

    /// Returns the location of page `index` of `feed`.
    pub fn page_location(&self, feed: Feed, index: u64) -> Url {
        page_location(self.feed_uri(feed), index)
    }

    /// Returns the identifier of the change event with the given order.
    pub fn event_id(&self, order: Order) -> Url {
        let mut id = self.changelog_uri.clone();
        id.set_fragment(Some(&order.to_string()));
        id
    }
}

fn join(trs_uri: &Url, segment: &str) -> TrsResult<Url> {
    trs_uri.join(segment).map_err(|e| {
        TrsError::invalid_configuration(format!(
            "cannot derive '{segment}' location from '{trs_uri}': {e}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(uri: &str) -> ResourceLayout {
        ResourceLayout::new(&Url::parse(uri).unwrap()).unwrap()
    }

    #[test]
    fn test_nil_is_stable() {
        assert_eq!(nil().as_str(), NIL_URI);
        assert!(is_nil(&Url::parse(NIL_URI).unwrap()));
        assert!(!is_nil(&Url::parse("http://host/trs/base").unwrap()));
    }

    #[test]
    fn test_layout_locations() {
        let layout = layout("http://host/trs/");
        assert_eq!(layout.trs_uri().as_str(), "http://host/trs/");
        assert_eq!(layout.base_uri().as_str(), "http://host/trs/base");
        assert_eq!(layout.changelog_uri().as_str(), "http://host/trs/changelog");
        assert_eq!(
            layout.page_location(Feed::Base, 1).as_str(),
            "http://host/trs/base/1"
        );
        assert_eq!(
            layout.page_location(Feed::ChangeLog, 12).as_str(),
            "http://host/trs/changelog/12"
        );
    }

    #[test]
    fn test_trailing_slash_normalised() {
        assert_eq!(layout("http://host/trs"), layout("http://host/trs/"));
    }

    #[test]
    fn test_page_location_ignores_trailing_slash_and_query() {
        let root = Url::parse("http://host/feed/?x=1#frag").unwrap();
        assert_eq!(page_location(&root, 3).as_str(), "http://host/feed/3");
    }

    #[test]
    fn test_event_id() {
        let layout = layout("http://host/trs/");
        assert_eq!(
            layout.event_id(Order::new(17)).as_str(),
            "http://host/trs/changelog#17"
        );
    }

    #[test]
    fn test_rejects_opaque_uri() {
        let err = ResourceLayout::new(&Url::parse("mailto:trs@example.org").unwrap()).unwrap_err();
        assert!(err.is_configuration());
    }
}
