//! Start page links

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HomeLink {
    pub title: &'static str,
    pub url: &'static str,
}

const QUICK_LINKS: &[HomeLink] = &[
    HomeLink { title: "MDN", url: "https://developer.mozilla.org/" },
    HomeLink { title: "GitHub", url: "https://github.com/" },
    HomeLink { title: "W3C", url: "https://www.w3.org/" },
    HomeLink { title: "ECMA", url: "https://tc39.es/" },
    HomeLink { title: "Wikipedia", url: "https://wikipedia.org/" },
    HomeLink { title: "Archive", url: "https://archive.org/" },
];

/// Links shown on the built-in start page, in display order.
pub fn quick_links() -> &'static [HomeLink] {
    QUICK_LINKS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_are_absolute() {
        assert_eq!(quick_links().len(), 6);
        for link in quick_links() {
            assert!(url::Url::parse(link.url).is_ok(), "{}", link.url);
        }
    }
}
