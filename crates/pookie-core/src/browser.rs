//! Main browser state container
//!
//! The session store owns all tab state. The content frame and the chrome
//! only render it.

use std::sync::Arc;

use pookie_navigation::{quick_links, HomeLink, InputResolver};
use pookie_session::{FrameSync, SessionStore, Theme};
use pookie_storage::{Database, SnapshotStore};
use pookie_tabs::TabPatch;

use crate::config::Config;
use crate::Result;

/// URL handed to the host when a tab can't be found.
const BLANK_URL: &str = "about:blank";

/// Main browser instance
pub struct Browser {
    /// Configuration
    config: Config,
    /// Tab session state, persisted to the snapshot slot
    store: SessionStore,
    /// Active tab to content frame sync
    frame_sync: FrameSync,
    /// Input resolver for address bar
    input_resolver: InputResolver,
}

impl Browser {
    /// Initialize a new browser instance backed by the database file in
    /// `config`.
    pub fn new(config: Config) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Self::with_storage(config, Arc::new(db))
    }

    /// Initialize a browser instance on top of an arbitrary snapshot store.
    pub fn with_storage(config: Config, storage: Arc<dyn SnapshotStore>) -> Result<Self> {
        let input_resolver = InputResolver::with_search_engine(config.search_engine.clone())?;
        let store = SessionStore::with_slot(storage, &config.snapshot_key, config.use_webview);
        let frame_sync = FrameSync::with_embed_check_delay(store.clone(), config.embed_check_delay());

        Ok(Self {
            config,
            store,
            frame_sync,
            input_resolver,
        })
    }

    /// Restore the previous session, if one was saved. Returns whether a
    /// snapshot was applied.
    pub fn initialize(&self) -> bool {
        let restored = self.store.load();

        tracing::info!(
            restored,
            tabs = self.store.tabs().len(),
            slot = %self.config.snapshot_key,
            "Browser initialized"
        );

        restored
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn frame_sync(&self) -> &FrameSync {
        &self.frame_sync
    }

    // === Address bar ===

    /// Text the address bar shows for the active tab. The start page shows
    /// an empty field.
    pub fn address_text(&self) -> String {
        match self.store.active_tab() {
            Some(tab) if !tab.is_home() => tab.url,
            _ => String::new(),
        }
    }

    /// Resolve address bar input and navigate the active tab to it. Blank
    /// input or no active tab does nothing.
    pub fn submit_address(&self, raw: &str) -> bool {
        let Some(resolution) = self.input_resolver.resolve(raw) else {
            return false;
        };
        self.navigate_active(resolution.url())
    }

    // === Start page ===

    pub fn home_links(&self) -> &'static [HomeLink] {
        quick_links()
    }

    /// Navigate the active tab to a start page link.
    pub fn open_home_link(&self, url: &str) -> bool {
        self.navigate_active(url)
    }

    // === Chrome ===

    /// Flip between light and the dark themes. Returns the new theme.
    pub fn toggle_theme(&self) -> Theme {
        let theme = self.store.theme().toggled();
        self.store.set_theme(theme);
        theme
    }

    /// URL to hand the host for opening `tab_id` in its own window.
    pub fn external_url(&self, tab_id: &str) -> String {
        self.store
            .tab(tab_id)
            .map(|tab| tab.url)
            .unwrap_or_else(|| BLANK_URL.to_string())
    }

    /// Drop pending frame work and write the final snapshot.
    pub fn shutdown(&self) {
        self.frame_sync.cancel();
        self.store.flush();
        tracing::info!("Browser shut down");
    }

    fn navigate_active(&self, url: &str) -> bool {
        let Some(tab_id) = self.store.active_id() else {
            tracing::debug!(url, "No active tab to navigate");
            return false;
        };

        self.store.update_tab(&tab_id, TabPatch::navigate(url))
    }
}
