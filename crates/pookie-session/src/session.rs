//! Session data structure

use pookie_tabs::Tab;

use crate::theme::Theme;

pub const MIN_SIDEBAR_WIDTH: u32 = 200;
pub const MAX_SIDEBAR_WIDTH: u32 = 420;
pub const DEFAULT_SIDEBAR_WIDTH: u32 = 280;

/// All tabs of one browser window plus the view preferences around them.
///
/// Fields are public for reading; the store is the only place that mutates a
/// live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Ordered tabs, in display order
    pub tabs: Vec<Tab>,
    /// Active tab, `None` only when `tabs` is empty
    pub active_id: Option<String>,
    /// Sidebar width in pixels
    pub sidebar_width: u32,
    pub theme: Theme,
    /// Native webview surface instead of an iframe. Not persisted.
    pub use_webview: bool,
}

impl Session {
    /// A fresh session: one start page tab, active.
    pub fn new(use_webview: bool) -> Self {
        let home = Tab::home();
        Self {
            active_id: Some(home.id.clone()),
            tabs: vec![home],
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
            theme: Theme::default(),
            use_webview,
        }
    }

    pub fn clamp_sidebar_width(width: i64) -> u32 {
        width.clamp(MIN_SIDEBAR_WIDTH as i64, MAX_SIDEBAR_WIDTH as i64) as u32
    }

    pub fn position(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn contains(&self, tab_id: &str) -> bool {
        self.position(tab_id).is_some()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_id.as_deref().and_then(|id| self.tab(id))
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Append `tab`, re-rolling its id until it is unique, and make it active.
    /// Returns the id it ended up with.
    pub(crate) fn push_active(&mut self, mut tab: Tab) -> String {
        while self.contains(&tab.id) {
            tab.id = pookie_tabs::new_tab_id();
        }
        let id = tab.id.clone();
        self.tabs.push(tab);
        self.active_id = Some(id.clone());
        id
    }

    /// Checks the session invariants: active pointer consistency, unique ids,
    /// sidebar width range.
    pub fn is_consistent(&self) -> bool {
        let active_ok = match &self.active_id {
            None => self.tabs.is_empty(),
            Some(id) => self.contains(id),
        };

        let ids_unique = self
            .tabs
            .iter()
            .enumerate()
            .all(|(i, tab)| self.tabs[..i].iter().all(|other| other.id != tab.id));

        let width_ok = (MIN_SIDEBAR_WIDTH..=MAX_SIDEBAR_WIDTH).contains(&self.sidebar_width);

        active_ok && ids_unique && width_ok
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pookie_tabs::{HOME_TITLE, HOME_URL};

    #[test]
    fn test_new_session() {
        let session = Session::new(true);
        assert_eq!(session.tab_count(), 1);
        assert_eq!(session.tabs[0].url, HOME_URL);
        assert_eq!(session.tabs[0].title, HOME_TITLE);
        assert_eq!(session.active_tab(), Some(&session.tabs[0]));
        assert_eq!(session.sidebar_width, DEFAULT_SIDEBAR_WIDTH);
        assert_eq!(session.theme, Theme::Dark);
        assert!(session.use_webview);
        assert!(session.is_consistent());
    }

    #[test]
    fn test_clamp() {
        assert_eq!(Session::clamp_sidebar_width(1000), MAX_SIDEBAR_WIDTH);
        assert_eq!(Session::clamp_sidebar_width(0), MIN_SIDEBAR_WIDTH);
        assert_eq!(Session::clamp_sidebar_width(-5), MIN_SIDEBAR_WIDTH);
        assert_eq!(Session::clamp_sidebar_width(300), 300);
    }

    #[test]
    fn test_push_active_rerolls_taken_id() {
        let mut session = Session::default();
        let taken = session.tabs[0].clone();

        let id = session.push_active(taken.clone());
        assert_ne!(id, taken.id);
        assert_eq!(session.active_id.as_deref(), Some(id.as_str()));
        assert!(session.is_consistent());
    }

    #[test]
    fn test_inconsistent_sessions() {
        let mut session = Session::default();
        session.active_id = Some("missing".to_string());
        assert!(!session.is_consistent());

        let mut session = Session::default();
        session.tabs.clear();
        assert!(!session.is_consistent());
        session.active_id = None;
        assert!(session.is_consistent());

        let mut session = Session::default();
        session.sidebar_width = 100;
        assert!(!session.is_consistent());
    }
}
