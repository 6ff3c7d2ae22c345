//! Content frame synchronization
//!
//! The content frame (iframe or native webview) is owned by the host. This
//! module decides what the frame should show for the active tab and feeds
//! titles the frame reports back into the store.
//!
//! Title reports go through a double comparison against the title seen at
//! navigation time and the tab's current title, so a title write that
//! re-renders the frame cannot trigger another write.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use pookie_tabs::TabPatch;

use crate::store::SessionStore;

/// Delay before deciding a silent frame was refused by the site.
pub const EMBED_CHECK_DELAY: Duration = Duration::from_millis(600);

/// Result of asking the frame for its document title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleRead {
    Title(String),
    /// Cross-origin document; the normal case, not a failure
    Denied,
}

/// The host's embedded renderer.
pub trait ContentFrame: Send + Sync {
    /// Start loading `url`. Completion is reported through [`FrameSync::on_load`].
    fn load(&self, url: &str);

    fn read_title(&self) -> TitleRead;

    /// Laid-out area in pixels; zero while hidden or collapsed.
    fn layout_area(&self) -> u64;
}

/// What the content area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameTarget {
    /// No tabs open
    Empty,
    /// Built-in start page, rendered by the shell
    Home,
    /// Page loaded in the content frame
    Remote(String),
}

/// A navigation started by [`FrameSync::sync`]. The generation ties later
/// load events and embed checks to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub generation: u64,
    pub target: FrameTarget,
}

/// Shown when a page loaded but stayed blank, most likely because the site
/// forbids embedding. Dismissible; offers opening `url` externally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedAdvisory {
    pub tab_id: String,
    pub url: String,
}

#[derive(Default)]
struct SyncState {
    generation: u64,
    /// `tab_id` and `url` describe what the frame currently shows
    synced: bool,
    tab_id: Option<String>,
    url: Option<String>,
    /// Last title known for the current navigation
    baseline: Option<String>,
    /// A readable title arrived for the current navigation
    content_seen: bool,
}

pub struct FrameSync {
    store: SessionStore,
    state: Arc<Mutex<SyncState>>,
    embed_check_delay: Duration,
}

impl FrameSync {
    pub fn new(store: SessionStore) -> Self {
        Self::with_embed_check_delay(store, EMBED_CHECK_DELAY)
    }

    pub fn with_embed_check_delay(store: SessionStore, embed_check_delay: Duration) -> Self {
        Self {
            store,
            state: Arc::new(Mutex::new(SyncState::default())),
            embed_check_delay,
        }
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Bring the frame in line with the active tab. Returns the new
    /// navigation if the active tab id or its URL changed since the last
    /// call, `None` otherwise. The start page is never sent to the frame.
    pub fn sync(&self, frame: &dyn ContentFrame) -> Option<Navigation> {
        let active = self.store.active_tab();

        let navigation = {
            let mut state = self.state.lock();
            let tab_id = active.as_ref().map(|t| t.id.clone());
            let url = active.as_ref().map(|t| t.url.clone());
            if state.synced && state.tab_id == tab_id && state.url == url {
                return None;
            }

            state.generation += 1;
            state.synced = true;
            state.tab_id = tab_id;
            state.url = url;
            state.baseline = active.as_ref().map(|t| t.title.clone());
            state.content_seen = false;

            let target = match &active {
                None => FrameTarget::Empty,
                Some(tab) if tab.is_home() => FrameTarget::Home,
                Some(tab) => FrameTarget::Remote(tab.url.clone()),
            };

            Navigation {
                generation: state.generation,
                target,
            }
        };

        tracing::debug!(
            generation = navigation.generation,
            target = ?navigation.target,
            "Frame navigation"
        );

        if let FrameTarget::Remote(url) = &navigation.target {
            frame.load(url);
        }

        Some(navigation)
    }

    /// Handle a load completion for `generation`. Writes the frame's title
    /// into the tab at most once per distinct title. Returns whether the
    /// store was updated.
    pub fn on_load(&self, generation: u64, frame: &dyn ContentFrame) -> bool {
        let title = match frame.read_title() {
            TitleRead::Title(title) if !title.is_empty() => title,
            TitleRead::Title(_) => return false,
            TitleRead::Denied => {
                tracing::trace!(generation, "Frame title not readable");
                return false;
            }
        };

        let tab_id = {
            let mut state = self.state.lock();
            if state.generation != generation {
                tracing::trace!(generation, current = state.generation, "Stale load event");
                return false;
            }
            state.content_seen = true;

            let Some(tab_id) = state.tab_id.clone() else {
                return false;
            };
            let current = self.store.tab(&tab_id).map(|t| t.title);
            if state.baseline.as_deref() == Some(title.as_str())
                || current.as_deref() == Some(title.as_str())
            {
                return false;
            }

            state.baseline = Some(title.clone());
            tab_id
        };

        tracing::debug!(tab_id = %tab_id, title = %title, "Frame reported title");
        self.store
            .update_tab(&tab_id, TabPatch::default().with_title(title))
    }

    /// Wait out the embed check delay, then decide whether the page for
    /// `generation` looks refused: still current, no readable title, and the
    /// frame occupies screen space. Superseded navigations yield `None`.
    pub async fn check_embedding(
        &self,
        generation: u64,
        frame: &dyn ContentFrame,
    ) -> Option<EmbedAdvisory> {
        tokio::time::sleep(self.embed_check_delay).await;

        let readable = matches!(frame.read_title(), TitleRead::Title(t) if !t.is_empty());

        let state = self.state.lock();
        if state.generation != generation {
            tracing::trace!(generation, "Embed check superseded");
            return None;
        }
        if state.content_seen || readable || frame.layout_area() == 0 {
            return None;
        }

        let advisory = EmbedAdvisory {
            tab_id: state.tab_id.clone()?,
            url: state.url.clone()?,
        };
        tracing::info!(tab_id = %advisory.tab_id, url = %advisory.url, "Page may refuse embedding");
        Some(advisory)
    }

    /// Invalidate the current navigation, dropping any pending check.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.synced = false;
        state.tab_id = None;
        state.url = None;
        state.baseline = None;
        state.content_seen = false;
    }
}

impl Clone for FrameSync {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            state: Arc::clone(&self.state),
            embed_check_delay: self.embed_check_delay,
        }
    }
}
