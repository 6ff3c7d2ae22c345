//! Tab data structure
//!
//! The serialized shape is the one stored in the session snapshot:
//! `{ id, title, url, favicon, incognito }`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::patch::{NewTab, TabPatch};

/// Sentinel URL for the built-in start page. Never handed to a content frame.
pub const HOME_URL: &str = "about:home";

/// Title given to tabs opened without one.
pub const DEFAULT_TITLE: &str = "New Tab";

/// Title of the tab seeded into a fresh session.
pub const HOME_TITLE: &str = "Start";

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier, fixed at creation
    pub id: String,
    /// Display title
    pub title: String,
    /// Current URL or [`HOME_URL`]
    pub url: String,
    /// Favicon reference if known
    #[serde(default)]
    pub favicon: Option<String>,
    /// Private browsing flag, carried through duplication
    #[serde(default)]
    pub incognito: bool,
}

/// Generate a fresh tab id.
pub fn new_tab_id() -> String {
    Uuid::new_v4().to_string()
}

impl Tab {
    pub fn new(seed: NewTab) -> Self {
        Self {
            id: new_tab_id(),
            title: seed.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            url: seed.url.unwrap_or_else(|| HOME_URL.to_string()),
            favicon: None,
            incognito: seed.incognito,
        }
    }

    /// The start page tab a fresh session begins with.
    pub fn home() -> Self {
        Self::new(NewTab::default().with_title(HOME_TITLE))
    }

    /// Copy every field except the id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_tab_id(),
            ..self.clone()
        }
    }

    /// The tab as it would look with `patch` applied.
    pub fn merged(&self, patch: &TabPatch) -> Self {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.clone();
        }
        if let Some(url) = &patch.url {
            next.url = url.clone();
        }
        if let Some(favicon) = &patch.favicon {
            next.favicon = favicon.clone();
        }
        if let Some(incognito) = patch.incognito {
            next.incognito = incognito;
        }
        next
    }

    /// Whether this tab shows the built-in start page.
    pub fn is_home(&self) -> bool {
        self.url == HOME_URL
    }

    /// Get display title (with fallback to URL)
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }

    /// Display title cut to `max` characters, the last one an ellipsis.
    pub fn truncated_title(&self, max: usize) -> String {
        let title = self.display_title();
        if max == 0 {
            return String::new();
        }
        if title.chars().count() <= max {
            return title.to_string();
        }

        let mut out: String = title.chars().take(max - 1).collect();
        out.push(ELLIPSIS);
        out
    }
}
