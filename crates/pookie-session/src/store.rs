//! Session Store
//!
//! The single owner of session state. Handles are cheap to clone and share
//! the same state, observers and storage.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pookie_storage::SnapshotStore;
use pookie_tabs::{NewTab, Tab, TabPatch};

use crate::session::Session;
use crate::snapshot::{decode_snapshot, encode_snapshot, SNAPSHOT_KEY};
use crate::theme::Theme;
use crate::Result;

type Observer = Arc<dyn Fn(&Session) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What a committed mutation has to do besides notifying observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Commit {
    /// Persisted fields changed; write the snapshot
    Persist,
    /// Only in-memory fields changed
    NotifyOnly,
}

struct StoreState {
    session: Session,
    /// Bumped on every committed mutation
    revision: u64,
}

pub struct SessionStore {
    state: Arc<RwLock<StoreState>>,
    /// Seed session; stands in for unusable snapshot fields on load
    defaults: Arc<Session>,
    observers: Arc<RwLock<Vec<(SubscriptionId, Observer)>>>,
    next_subscription: Arc<AtomicU64>,
    storage: Arc<dyn SnapshotStore>,
    slot: Arc<str>,
    /// Serializes snapshot writes so the last write carries the latest state
    write_lock: Arc<Mutex<()>>,
}

impl SessionStore {
    /// Create a store seeded with a fresh default session. Nothing is read
    /// from `storage` until [`SessionStore::load`].
    pub fn new(storage: Arc<dyn SnapshotStore>, use_webview: bool) -> Self {
        Self::with_slot(storage, SNAPSHOT_KEY, use_webview)
    }

    pub fn with_slot(storage: Arc<dyn SnapshotStore>, slot: &str, use_webview: bool) -> Self {
        let session = Session::new(use_webview);

        Self {
            defaults: Arc::new(session.clone()),
            state: Arc::new(RwLock::new(StoreState {
                session,
                revision: 0,
            })),
            observers: Arc::new(RwLock::new(Vec::new())),
            next_subscription: Arc::new(AtomicU64::new(1)),
            storage,
            slot: Arc::from(slot),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    // === Reads ===

    /// A copy of the current session.
    pub fn session(&self) -> Session {
        self.state.read().session.clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    pub fn tabs(&self) -> Vec<Tab> {
        self.state.read().session.tabs.clone()
    }

    pub fn tab(&self, tab_id: &str) -> Option<Tab> {
        self.state.read().session.tab(tab_id).cloned()
    }

    pub fn active_id(&self) -> Option<String> {
        self.state.read().session.active_id.clone()
    }

    pub fn active_tab(&self) -> Option<Tab> {
        self.state.read().session.active_tab().cloned()
    }

    pub fn sidebar_width(&self) -> u32 {
        self.state.read().session.sidebar_width
    }

    pub fn theme(&self) -> Theme {
        self.state.read().session.theme
    }

    pub fn use_webview(&self) -> bool {
        self.state.read().session.use_webview
    }

    // === Observers ===

    /// Register `observer`; it runs after every committed mutation with the
    /// new session, on the mutating thread, outside the store lock.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        let observer: Observer = Arc::new(observer);
        self.observers.write().push((id, observer));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(sub, _)| *sub != id);
        observers.len() != before
    }

    // === Tab operations ===

    /// Open a tab at the end of the list and make it active.
    pub fn add_tab(&self, seed: NewTab) -> String {
        let tab = Tab::new(seed);
        let id = self
            .commit("add_tab", |session| {
                Some((session.push_active(tab), Commit::Persist))
            })
            .unwrap_or_default();

        tracing::info!(tab_id = %id, "Opened tab");
        id
    }

    /// Close a tab. If it was active, focus moves to the tab that slides into
    /// its slot, else to the one before it.
    pub fn close_tab(&self, tab_id: &str) -> bool {
        let closed = self
            .commit("close_tab", |session| {
                let index = session.position(tab_id)?;
                session.tabs.remove(index);

                if session.active_id.as_deref() == Some(tab_id) {
                    session.active_id = session
                        .tabs
                        .get(index)
                        .or_else(|| index.checked_sub(1).and_then(|i| session.tabs.get(i)))
                        .map(|t| t.id.clone());
                }

                Some(((), Commit::Persist))
            })
            .is_some();

        if closed {
            tracing::info!(tab_id = %tab_id, "Closed tab");
        }
        closed
    }

    /// Copy a tab under a fresh id, append it and make it active.
    pub fn duplicate_tab(&self, tab_id: &str) -> Option<String> {
        let id = self.commit("duplicate_tab", |session| {
            let copy = session.tab(tab_id)?.duplicate();
            Some((session.push_active(copy), Commit::Persist))
        })?;

        tracing::info!(source_id = %tab_id, tab_id = %id, "Duplicated tab");
        Some(id)
    }

    /// Focus an existing tab. Unknown ids are rejected so the active pointer
    /// never dangles.
    pub fn switch_tab(&self, tab_id: &str) -> bool {
        self.commit("switch_tab", |session| {
            if session.active_id.as_deref() == Some(tab_id) || !session.contains(tab_id) {
                return None;
            }
            session.active_id = Some(tab_id.to_string());
            Some(((), Commit::Persist))
        })
        .is_some()
    }

    /// Merge `patch` into a tab. A patch that changes nothing is not a
    /// mutation: no observers, no write.
    pub fn update_tab(&self, tab_id: &str, patch: TabPatch) -> bool {
        self.commit("update_tab", |session| {
            let index = session.position(tab_id)?;
            let merged = session.tabs[index].merged(&patch);
            if merged == session.tabs[index] {
                return None;
            }
            session.tabs[index] = merged;
            Some(((), Commit::Persist))
        })
        .is_some()
    }

    // === View preferences ===

    pub fn set_sidebar_width(&self, width: i64) -> bool {
        let clamped = Session::clamp_sidebar_width(width);
        self.commit("set_sidebar_width", |session| {
            if session.sidebar_width == clamped {
                return None;
            }
            session.sidebar_width = clamped;
            Some(((), Commit::Persist))
        })
        .is_some()
    }

    pub fn set_theme(&self, theme: Theme) -> bool {
        self.commit("set_theme", |session| {
            if session.theme == theme {
                return None;
            }
            session.theme = theme;
            Some(((), Commit::Persist))
        })
        .is_some()
    }

    pub fn set_use_webview(&self, use_webview: bool) -> bool {
        self.commit("set_use_webview", |session| {
            if session.use_webview == use_webview {
                return None;
            }
            session.use_webview = use_webview;
            Some(((), Commit::NotifyOnly))
        })
        .is_some()
    }

    // === Persistence ===

    /// Replace the session with the stored snapshot, repairing whatever is
    /// missing or malformed. A missing or unreadable slot keeps the current
    /// session. Returns whether anything changed.
    pub fn load(&self) -> bool {
        let raw = match self.storage.read(&self.slot) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(slot = %self.slot, "No stored session");
                return false;
            }
            Err(e) => {
                tracing::warn!(slot = %self.slot, error = %e, "Failed to read stored session");
                return false;
            }
        };

        let defaults = Session {
            use_webview: self.use_webview(),
            ..(*self.defaults).clone()
        };
        let Some(restored) = decode_snapshot(&raw, &defaults) else {
            return false;
        };

        let changed = self
            .commit("load", |session| {
                if *session == restored {
                    return None;
                }
                *session = restored;
                Some(((), Commit::NotifyOnly))
            })
            .is_some();

        let session = self.session();
        tracing::info!(
            tab_count = session.tab_count(),
            active_id = ?session.active_id,
            "Restored session"
        );

        changed
    }

    /// Write the current snapshot. Failures are logged and dropped.
    pub fn flush(&self) {
        let _guard = self.write_lock.lock();
        let session = self.session();
        self.persist(&session);
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.try_persist(session) {
            tracing::warn!(slot = %self.slot, error = %e, "Failed to persist session");
        }
    }

    fn try_persist(&self, session: &Session) -> Result<()> {
        let raw = encode_snapshot(session)?;
        self.storage.write(&self.slot, &raw)?;
        Ok(())
    }

    /// Run `mutate` under the write lock. `None` from `mutate` means no-op and
    /// must leave the session untouched. On commit the revision advances, the
    /// snapshot is written if needed and observers run after the lock drops.
    fn commit<T>(
        &self,
        op: &'static str,
        mutate: impl FnOnce(&mut Session) -> Option<(T, Commit)>,
    ) -> Option<T> {
        let (value, commit, session) = {
            let mut state = self.state.write();
            let Some((value, commit)) = mutate(&mut state.session) else {
                tracing::trace!(op, "No-op");
                return None;
            };
            state.revision += 1;
            debug_assert!(state.session.is_consistent(), "{op} broke session invariants");
            (value, commit, state.session.clone())
        };

        tracing::debug!(op, commit = ?commit, "Session mutated");

        if commit == Commit::Persist {
            self.flush();
        }
        self.notify(&session);

        Some(value)
    }

    fn notify(&self, session: &Session) {
        let observers: Vec<Observer> = self
            .observers
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer(session);
        }
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            defaults: Arc::clone(&self.defaults),
            observers: Arc::clone(&self.observers),
            next_subscription: Arc::clone(&self.next_subscription),
            storage: Arc::clone(&self.storage),
            slot: Arc::clone(&self.slot),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}
